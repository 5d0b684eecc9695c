//! The simulation facade.
//!
//! [`RollerSim`] owns the curve, the optional spring, the physical
//! parameters, and the observable [`StateVector`], and implements the
//! [`CollisionSim`] contract so [`CollisionAdvance`] can drive it through
//! collisions. All discontinuous state changes (mode switches, collision
//! responses, parameter edits) happen here or in the components this
//! module calls after a step is accepted, never inside the evaluators.

use anyhow::Result;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::advance::{AdvanceSettings, CollisionAdvance, CollisionSim};
use crate::collision::{check_containment, resolve_collision, CollisionEvent, Containment};
use crate::dynamics::{body_kinematics, FreeDynamics, SimParams, TrackDynamics};
use crate::energy::{energy_info, EnergyInfo};
use crate::path::PathGeometry;
use crate::solvers::{ModifiedEuler, Rk4};
use crate::spring::Spring;
use crate::state::{var, Mode, StateVector, ENERGY_VARS, VAR_NAMES};
use crate::traits::Steppable;
use crate::transition::check_departure;

/// Which fixed-step integrator drives the dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    Rk4,
    ModifiedEuler,
}

enum SolverSlot {
    Rk4(Rk4<f64>),
    ModifiedEuler(ModifiedEuler<f64>),
}

impl SolverSlot {
    fn build(kind: SolverKind, dim: usize) -> Self {
        match kind {
            SolverKind::Rk4 => SolverSlot::Rk4(Rk4::new(dim)),
            SolverKind::ModifiedEuler => SolverSlot::ModifiedEuler(ModifiedEuler::new(dim)),
        }
    }

    fn kind(&self) -> SolverKind {
        match self {
            SolverSlot::Rk4(_) => SolverKind::Rk4,
            SolverSlot::ModifiedEuler(_) => SolverKind::ModifiedEuler,
        }
    }
}

#[derive(Clone)]
struct Snapshot {
    mode: Mode,
    time: f64,
    path_seed: f64,
    vars: StateVector,
}

pub struct RollerSim {
    geometry: Box<dyn PathGeometry>,
    spring: Option<Spring>,
    params: SimParams,
    advance_settings: AdvanceSettings,
    solver: SolverSlot,
    mode: Mode,
    time: f64,
    /// Seed for the nearest-point search, carried as committed state next
    /// to the mode. The evaluators never read it.
    path_seed: f64,
    pe_offset: f64,
    vars: StateVector,
    saved: Option<Snapshot>,
    collision_log: Vec<CollisionEvent>,
}

impl RollerSim {
    /// Builds a simulation with the body latched onto the curve at the
    /// point nearest to `start`, at rest.
    pub fn new(
        geometry: Box<dyn PathGeometry>,
        start: Vector2<f64>,
        params: SimParams,
    ) -> Result<Self> {
        params.validate()?;
        let (p, _) = geometry.nearest_point(start, None);

        let mut sim = Self {
            geometry,
            spring: None,
            params,
            advance_settings: AdvanceSettings::default(),
            solver: SolverSlot::build(SolverKind::Rk4, 5),
            mode: Mode::Track { p, v: 0.0 },
            time: 0.0,
            path_seed: p,
            pe_offset: 0.0,
            vars: StateVector::new(&VAR_NAMES),
            saved: None,
            collision_log: Vec::new(),
        };
        sim.refresh_vars(true);
        sim.refresh_computed();
        Ok(sim)
    }

    /// Advances the simulation by one tick of `dt`, isolating and
    /// resolving any collision inside it.
    pub fn advance(&mut self, dt: f64) -> Result<()> {
        self.collision_log.clear();
        let driver = CollisionAdvance::new(self.advance_settings);
        driver.advance(self, dt)
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// The observer surface: named values, sequence counters, computed flags.
    pub fn state(&self) -> &StateVector {
        &self.vars
    }

    pub fn geometry(&self) -> &dyn PathGeometry {
        self.geometry.as_ref()
    }

    pub fn params(&self) -> &SimParams {
        &self.params
    }

    pub fn spring(&self) -> Option<&Spring> {
        self.spring.as_ref()
    }

    pub fn solver_kind(&self) -> SolverKind {
        self.solver.kind()
    }

    pub fn advance_settings(&self) -> AdvanceSettings {
        self.advance_settings
    }

    /// Collision records from the most recent `advance` call.
    pub fn recent_collisions(&self) -> &[CollisionEvent] {
        &self.collision_log
    }

    pub fn energy(&self) -> EnergyInfo {
        energy_info(
            self.geometry.as_ref(),
            self.spring.as_ref(),
            &self.params,
            &self.mode,
            self.pe_offset,
        )
    }

    /// Replaces the physical parameters. An explicit edit: the energy
    /// variables are marked discontinuous even if their values hold.
    pub fn set_params(&mut self, params: SimParams) -> Result<()> {
        params.validate()?;
        self.params = params;
        self.vars.bump_seq(&ENERGY_VARS);
        self.refresh_vars(true);
        Ok(())
    }

    pub fn set_spring(&mut self, spring: Option<Spring>) {
        self.spring = spring;
        self.vars.bump_seq(&ENERGY_VARS);
        self.refresh_vars(true);
    }

    /// Display calibration for reported potential energy. Never feeds
    /// back into the dynamics.
    pub fn set_pe_offset(&mut self, offset: f64) {
        self.pe_offset = offset;
        self.vars.bump_seq(&ENERGY_VARS);
        self.refresh_vars(true);
    }

    pub fn set_solver(&mut self, kind: SolverKind) {
        if kind != self.solver.kind() {
            self.solver = SolverSlot::build(kind, self.mode.dimension());
        }
    }

    pub fn set_advance_settings(&mut self, settings: AdvanceSettings) {
        self.advance_settings = settings;
    }

    /// Places the body directly into a new dynamic state: a user edit,
    /// reported as a jump on every affected variable.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = match mode {
            Mode::Track { p, v } => {
                let p = self.geometry.domain().contain(p);
                self.path_seed = p;
                Mode::Track { p, v }
            }
            free => free,
        };
        self.refresh_vars(false);
        self.refresh_computed();
    }

    /// Writes the current mode, time, and derived quantities into the
    /// observable state vector. `continuous` is false for jumps.
    fn refresh_vars(&mut self, continuous: bool) {
        let (pos, vel) = body_kinematics(self.geometry.as_ref(), &self.mode);

        if let Mode::Track { p, v } = self.mode {
            self.vars.set_value(var::TRACK_P, p, continuous);
            self.vars.set_value(var::TRACK_V, v, continuous);
        }
        self.vars.set_value(var::X, pos.x, continuous);
        self.vars.set_value(var::Y, pos.y, continuous);
        self.vars.set_value(var::VX, vel.x, continuous);
        self.vars.set_value(var::VY, vel.y, continuous);
        self.vars.set_value(var::MODE, self.mode.flag(), continuous);
        self.vars.set_value(var::TIME, self.time, true);

        let energy = energy_info(
            self.geometry.as_ref(),
            self.spring.as_ref(),
            &self.params,
            &self.mode,
            self.pe_offset,
        );
        self.vars.set_value(var::KE, energy.kinetic, continuous);
        self.vars.set_value(var::PE, energy.potential, continuous);
        self.vars.set_value(var::TE, energy.total, continuous);
    }

    /// Keeps the computed flags aligned with the active mode: whichever
    /// mode's coordinates are mirrors, not integrated state, are derived.
    fn refresh_computed(&mut self) {
        let on_track = matches!(self.mode, Mode::Track { .. });
        self.vars
            .set_computed(&[var::X, var::Y, var::VX, var::VY], on_track);
        self.vars
            .set_computed(&[var::TRACK_P, var::TRACK_V], !on_track);
        self.vars.set_computed(&[var::MODE], true);
        self.vars.set_computed(&ENERGY_VARS, true);
    }
}

impl CollisionSim for RollerSim {
    fn checkpoint(&mut self) {
        self.saved = Some(Snapshot {
            mode: self.mode,
            time: self.time,
            path_seed: self.path_seed,
            vars: self.vars.clone(),
        });
    }

    fn rollback(&mut self) {
        if let Some(saved) = &self.saved {
            self.mode = saved.mode;
            self.time = saved.time;
            self.path_seed = saved.path_seed;
            self.vars = saved.vars.clone();
        }
    }

    fn integrate(&mut self, dt: f64) {
        let dim = self.mode.dimension();
        let mut storage = [0.0f64; 5];
        let buf = &mut storage[..dim];
        self.mode.pack(self.time, buf);

        match self.mode {
            Mode::Track { .. } => {
                let system = TrackDynamics {
                    geometry: self.geometry.as_ref(),
                    spring: self.spring.as_ref(),
                    params: &self.params,
                };
                match &mut self.solver {
                    SolverSlot::Rk4(solver) => solver.step(&system, buf, dt),
                    SolverSlot::ModifiedEuler(solver) => solver.step(&system, buf, dt),
                }
            }
            Mode::Free { .. } => {
                let system = FreeDynamics {
                    spring: self.spring.as_ref(),
                    params: &self.params,
                };
                match &mut self.solver {
                    SolverSlot::Rk4(solver) => solver.step(&system, buf, dt),
                    SolverSlot::ModifiedEuler(solver) => solver.step(&system, buf, dt),
                }
            }
        }

        let (mode, time) = self.mode.unpack(buf);
        self.mode = mode;
        self.time = time;
        self.refresh_vars(true);
    }

    fn settle(&mut self) -> Result<()> {
        match self.mode {
            Mode::Track { p, v } => {
                let contained = self.geometry.domain().contain(p);
                if contained != p {
                    // a wrap is a numeric jump observers must not
                    // interpolate across, even though motion is continuous
                    self.mode = Mode::Track { p: contained, v };
                    self.refresh_vars(false);
                }
                if let Some(free) = check_departure(
                    self.geometry.as_ref(),
                    self.spring.as_ref(),
                    &self.params,
                    contained,
                    v,
                )? {
                    self.path_seed = contained;
                    self.mode = free;
                    self.refresh_vars(false);
                }
            }
            Mode::Free { x, y, .. } => {
                if let Containment::OutOfRange { x: clamped } = check_containment(
                    self.geometry.as_ref(),
                    x,
                    y,
                    self.time,
                    self.path_seed,
                ) {
                    // ran off the end of an open curve: terminal clamp
                    self.mode = Mode::Free {
                        x: clamped,
                        y,
                        vx: 0.0,
                        vy: 0.0,
                    };
                    self.refresh_vars(false);
                }
            }
        }
        self.refresh_computed();
        Ok(())
    }

    fn find_collision(&self) -> Option<CollisionEvent> {
        match self.mode {
            Mode::Free { x, y, .. } => {
                match check_containment(self.geometry.as_ref(), x, y, self.time, self.path_seed) {
                    Containment::Penetrating(event) => Some(event),
                    _ => None,
                }
            }
            Mode::Track { .. } => None,
        }
    }

    fn handle_collision(&mut self, event: CollisionEvent) {
        let (x, y, vx, vy) = match self.mode {
            Mode::Free { x, y, vx, vy } => (x, y, vx, vy),
            // only free bodies collide; a track-mode call is a stale event
            Mode::Track { .. } => return,
        };

        // resolve against the rolled-back, collision-free position; the
        // detection-time sample in the event is kept for telemetry only
        let at_contact = CollisionEvent {
            time: self.time,
            x,
            y,
            ..event
        };
        let resolution = resolve_collision(
            self.geometry.as_ref(),
            &self.params,
            &at_contact,
            vx,
            vy,
        );

        self.path_seed = resolution.path_param;
        self.mode = resolution.mode;
        self.collision_log.push(CollisionEvent {
            impulse: Some(resolution.impulse),
            ..at_contact
        });
        self.refresh_vars(false);
        self.refresh_computed();
    }
}

#[cfg(test)]
mod tests {
    use super::{RollerSim, SolverKind};
    use crate::dynamics::{SimParams, TrackDynamics};
    use crate::path::sampled::SampledPath;
    use crate::path::shapes::{HumpPath, LoopPath, RampPath};
    use crate::path::{unit_tangent, PathGeometry};
    use crate::state::{var, Mode};
    use crate::traits::DynamicalSystem;
    use nalgebra::Vector2;

    fn hump_sim(params: SimParams) -> RollerSim {
        let path = SampledPath::with_samples(&HumpPath::default(), 8001).expect("path");
        RollerSim::new(Box::new(path), Vector2::new(0.0, 0.0), params).expect("sim")
    }

    fn flat_sim(params: SimParams) -> RollerSim {
        let path = SampledPath::new(&RampPath {
            slope: 0.0,
            half_width: 20.0,
        })
        .expect("path");
        RollerSim::new(Box::new(path), Vector2::new(0.0, 0.0), params).expect("sim")
    }

    #[test]
    fn starts_at_rest_on_the_nearest_track_point() {
        let sim = hump_sim(SimParams::default());
        match *sim.mode() {
            Mode::Track { p, v } => {
                assert!(p.abs() < 1e-6);
                assert_eq!(v, 0.0);
            }
            Mode::Free { .. } => panic!("expected track mode"),
        }
        assert_eq!(sim.state().value(var::MODE), 0.0);
        assert!(sim.state().is_computed(var::X));
        assert!(!sim.state().is_computed(var::TRACK_P));
    }

    #[test]
    fn undamped_oscillation_conserves_energy() {
        let params = SimParams {
            damping: 0.0,
            ..SimParams::default()
        };
        let mut sim = hump_sim(params);
        sim.set_mode(Mode::Track { p: 0.4, v: 0.0 });
        let initial = sim.energy().total;

        for _ in 0..5000 {
            sim.advance(0.002).expect("advance");
            let total = sim.energy().total;
            assert!(
                (total - initial).abs() < 0.01 * initial.max(1.0),
                "energy drifted from {} to {} at t = {}",
                initial,
                total,
                sim.time()
            );
        }
    }

    #[test]
    fn damping_never_adds_energy() {
        let params = SimParams {
            damping: 0.5,
            ..SimParams::default()
        };
        let mut sim = hump_sim(params);
        sim.set_mode(Mode::Track { p: 0.4, v: 0.0 });
        let scale = sim.energy().total.max(1.0);
        let mut previous = sim.energy().total;

        for _ in 0..3000 {
            sim.advance(0.002).expect("advance");
            let total = sim.energy().total;
            assert!(
                total <= previous + 1e-4 * scale,
                "energy rose from {} to {} at t = {}",
                previous,
                total,
                sim.time()
            );
            previous = total;
        }
    }

    #[test]
    fn departure_is_deterministic() {
        let run = || {
            let mut sim = hump_sim(SimParams::default());
            sim.set_mode(Mode::Track { p: 0.0, v: 6.5 });
            let mut first_free = None;
            let mut remaining_after_departure = 100;
            for step in 0..2000 {
                sim.advance(0.005).expect("advance");
                if first_free.is_none() && matches!(sim.mode(), Mode::Free { .. }) {
                    first_free = Some(step);
                }
                if first_free.is_some() {
                    remaining_after_departure -= 1;
                    if remaining_after_departure == 0 {
                        break;
                    }
                }
            }
            (first_free, sim.state().values())
        };

        let (first_a, state_a) = run();
        let (first_b, state_b) = run();
        assert!(first_a.is_some(), "body should leave the track");
        assert_eq!(first_a, first_b);
        assert_eq!(state_a, state_b);
    }

    #[test]
    fn elastic_bounce_recovers_the_drop_height() {
        let params = SimParams {
            elasticity: 1.0,
            stickiness: 0.1,
            damping: 0.0,
            ..SimParams::default()
        };
        let mut sim = flat_sim(params);
        sim.set_mode(Mode::Free {
            x: 0.0,
            y: 2.0,
            vx: 0.0,
            vy: 0.0,
        });
        let initial = sim.energy().total;

        let mut bounces = 0usize;
        let mut peak_since_bounce: f64 = 0.0;
        let mut peaks = Vec::new();
        for _ in 0..2000 {
            sim.advance(0.01).expect("advance");
            if !sim.recent_collisions().is_empty() {
                bounces += sim.recent_collisions().len();
                if bounces > 1 {
                    peaks.push(peak_since_bounce);
                }
                peak_since_bounce = 0.0;
            }
            peak_since_bounce = peak_since_bounce.max(sim.state().value(var::Y));
        }

        assert!(bounces >= 3, "expected repeated bounces, got {}", bounces);
        assert!(!peaks.is_empty());
        for peak in &peaks {
            assert!(
                (peak - 2.0).abs() < 0.02,
                "bounce peak {} should recover the 2.0 drop height",
                peak
            );
        }
        let total = sim.energy().total;
        assert!(
            (total - initial).abs() < 1e-3 * initial,
            "elastic bouncing should conserve energy"
        );
    }

    #[test]
    fn inelastic_impact_relatches_at_once() {
        let params = SimParams {
            elasticity: 0.0,
            stickiness: 0.1,
            damping: 0.0,
            ..SimParams::default()
        };
        let mut sim = flat_sim(params);
        sim.set_mode(Mode::Free {
            x: 0.0,
            y: 1.0,
            vx: 0.0,
            vy: 0.0,
        });

        for _ in 0..200 {
            sim.advance(0.01).expect("advance");
            if !sim.recent_collisions().is_empty() {
                match *sim.mode() {
                    Mode::Track { v, .. } => {
                        assert!(v.abs() < 1e-9, "normal impact leaves no speed, v = {}", v)
                    }
                    Mode::Free { .. } => panic!("inelastic impact must re-latch"),
                }
                return;
            }
        }
        panic!("the body never reached the curve");
    }

    #[test]
    fn lower_stickiness_means_more_bounces() {
        let bounces_with = |stickiness: f64| {
            let params = SimParams {
                elasticity: 0.5,
                stickiness,
                damping: 0.0,
                ..SimParams::default()
            };
            let path = SampledPath::new(&RampPath {
                slope: 1.0,
                half_width: 40.0,
            })
            .expect("path");
            let mut sim =
                RollerSim::new(Box::new(path), Vector2::new(0.0, 0.0), params).expect("sim");
            sim.set_mode(Mode::Free {
                x: -1.0,
                y: 1.0,
                vx: 0.0,
                vy: 0.0,
            });
            let mut bounces = 0usize;
            let mut relatched = false;
            for _ in 0..600 {
                sim.advance(0.005).expect("advance");
                bounces += sim.recent_collisions().len();
                if matches!(sim.mode(), Mode::Track { .. }) {
                    relatched = true;
                    break;
                }
            }
            (bounces, relatched)
        };

        // successive impacts on the incline see the ratio of post-impact
        // normal to total velocity shrink as gravity feeds the tangential
        // component: for e = 0.5 the first three contacts sit near
        // 0.45, 0.12, and 0.05, so each lower threshold buys one more bounce
        let (high, high_latched) = bounces_with(0.5);
        let (mid, mid_latched) = bounces_with(0.4);
        let (low, low_latched) = bounces_with(0.1);
        assert!(high_latched && mid_latched && low_latched);
        assert_eq!(high, 1);
        assert_eq!(mid, 2);
        assert_eq!(low, 3);
    }

    #[test]
    fn evaluator_position_rate_matches_geometry() {
        let path = SampledPath::with_samples(&HumpPath::default(), 8001).expect("path");
        let params = SimParams::default();
        let system = TrackDynamics {
            geometry: &path,
            spring: None,
            params: &params,
        };

        let (p, v) = (0.8, 1.3);
        let mut out = [0.0; 3];
        system.apply(0.0, &[p, v, 0.0], &mut out);
        assert_eq!(out[0], v);

        let dt = 1e-3;
        let stepped = path.position_at(p + out[0] * dt);
        let pt = path.slope_at(p);
        let predicted = path.position_at(p) + unit_tangent(pt.k) * (v * pt.direction * dt);
        assert!(
            (stepped - predicted).norm() < 1e-4,
            "evaluator and geometry disagree by {}",
            (stepped - predicted).norm()
        );
    }

    #[test]
    fn valley_oscillation_has_a_stable_period() {
        let params = SimParams {
            damping: 0.0,
            ..SimParams::default()
        };
        let mut sim = hump_sim(params);
        sim.set_mode(Mode::Track { p: 0.3, v: 0.0 });

        let dt = 0.002;
        let mut previous_v: f64 = 0.0;
        let mut previous_t = 0.0;
        let mut turning_times = Vec::new();
        let mut turning_points = Vec::new();
        for _ in 0..15000 {
            sim.advance(dt).expect("advance");
            let v = sim.state().value(var::TRACK_V);
            let t = sim.time();
            if previous_v != 0.0 && v.signum() != previous_v.signum() {
                let cross = previous_t + dt * previous_v / (previous_v - v);
                turning_times.push(cross);
                turning_points.push(sim.state().value(var::TRACK_P).abs());
            }
            previous_v = v;
            previous_t = t;
        }

        assert!(
            turning_times.len() >= 40,
            "expected 20+ oscillations, saw {} turning points",
            turning_times.len()
        );
        let half_periods: Vec<f64> = turning_times.windows(2).map(|w| w[1] - w[0]).collect();
        let mean = half_periods.iter().sum::<f64>() / half_periods.len() as f64;
        for hp in &half_periods {
            assert!(
                (hp - mean).abs() < 0.01 * mean,
                "half-period {} drifts from mean {}",
                hp,
                mean
            );
        }
        for p in &turning_points {
            assert!(
                (p - 0.3).abs() < 0.01 * 0.3 + 5e-4,
                "turning point {} should stay near 0.3",
                p
            );
        }
    }

    #[test]
    fn closed_loop_wraps_the_parameter() {
        let path = SampledPath::new(&LoopPath { radius: 2.0 }).expect("path");
        let tau = std::f64::consts::TAU;
        let mut sim = RollerSim::new(
            Box::new(path),
            Vector2::new(-0.2, 0.01),
            SimParams::default(),
        )
        .expect("sim");
        // starts just left of the bottom seam, so oscillation crosses it
        match *sim.mode() {
            Mode::Track { p, .. } => assert!(p > tau / 2.0, "start parameter {}", p),
            Mode::Free { .. } => panic!("expected track mode"),
        }

        for _ in 0..2000 {
            sim.advance(0.002).expect("advance");
            match *sim.mode() {
                Mode::Track { p, .. } => {
                    assert!((0.0..tau + 1e-9).contains(&p), "parameter {} out of domain", p)
                }
                Mode::Free { .. } => panic!("low-energy loop ride should stay on track"),
            }
        }
    }

    #[test]
    fn running_off_an_open_end_freezes_the_body() {
        let params = SimParams::default();
        let path = SampledPath::new(&RampPath {
            slope: 0.0,
            half_width: 2.0,
        })
        .expect("path");
        let mut sim = RollerSim::new(Box::new(path), Vector2::new(0.0, 0.0), params).expect("sim");
        sim.set_mode(Mode::Free {
            x: 1.9,
            y: 1.0,
            vx: 5.0,
            vy: 0.0,
        });
        sim.advance(0.2).expect("advance");
        match *sim.mode() {
            Mode::Free { x, vx, vy, .. } => {
                assert!((x - 2.0).abs() < 1e-9, "clamped to the end, x = {}", x);
                assert_eq!(vx, 0.0);
                assert_eq!(vy, 0.0);
            }
            Mode::Track { .. } => panic!("the clamp is not a re-latch"),
        }
    }

    #[test]
    fn jumps_bump_sequence_counters_and_edits_mark_energies() {
        let mut sim = hump_sim(SimParams::default());
        let seq_before = sim.state().seq(var::MODE);
        sim.set_mode(Mode::Free {
            x: 0.0,
            y: 3.0,
            vx: 0.0,
            vy: 0.0,
        });
        assert!(sim.state().seq(var::MODE) > seq_before);
        assert!(!sim.state().is_computed(var::X));
        assert!(sim.state().is_computed(var::TRACK_P));

        let pe_seq = sim.state().seq(var::PE);
        let p_seq = sim.state().seq(var::TRACK_P);
        let mut params = *sim.params();
        params.gravity = 4.9;
        sim.set_params(params).expect("params");
        assert!(sim.state().seq(var::PE) > pe_seq, "edits bump energy vars");
        assert_eq!(sim.state().seq(var::TRACK_P), p_seq, "coordinates saw no jump");
    }

    #[test]
    fn time_accumulates_continuously() {
        let mut sim = hump_sim(SimParams::default());
        for _ in 0..100 {
            sim.advance(0.01).expect("advance");
        }
        assert!((sim.time() - 1.0).abs() < 1e-9);
        assert_eq!(sim.state().seq(var::TIME), 0, "time never jumps");
        assert_eq!(sim.state().value(var::TIME), sim.time());
    }

    #[test]
    fn solver_choice_is_switchable() {
        let mut sim = hump_sim(SimParams::default());
        assert_eq!(sim.solver_kind(), SolverKind::Rk4);
        sim.set_solver(SolverKind::ModifiedEuler);
        assert_eq!(sim.solver_kind(), SolverKind::ModifiedEuler);
        sim.set_mode(Mode::Track { p: 0.2, v: 0.0 });
        sim.advance(0.01).expect("advance");
        match *sim.mode() {
            Mode::Track { p, .. } => assert!(p < 0.2, "body should fall toward the valley"),
            Mode::Free { .. } => panic!("expected track mode"),
        }
    }
}
