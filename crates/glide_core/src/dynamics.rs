//! Derivative evaluators for the two dynamic modes.
//!
//! Both evaluators are pure functions of their input buffers. Mode
//! transitions never happen here; they are decided after a step is
//! accepted, in `transition` and `collision`.

use anyhow::{bail, Result};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::path::{sin_slope, unit_tangent, PathGeometry};
use crate::spring::Spring;
use crate::state::Mode;
use crate::traits::DynamicalSystem;

/// Physical parameters of the simulation.
///
/// `mass > 0` is a documented precondition of the evaluators; it is
/// checked when parameters enter through [`SimParams::validate`], not on
/// every derivative call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SimParams {
    /// Gravity magnitude, pulling toward -y.
    pub gravity: f64,
    /// Viscous damping coefficient applied to the body's velocity.
    pub damping: f64,
    /// Body mass.
    pub mass: f64,
    /// Collision restitution in [0, 1]: 0 inelastic, 1 perfectly elastic.
    pub elasticity: f64,
    /// Re-latch threshold in (0, 1]: the ratio of post-impact normal to
    /// total velocity below which the body reattaches to the curve.
    pub stickiness: f64,
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            gravity: 9.8,
            damping: 0.0,
            mass: 1.0,
            elasticity: 0.8,
            stickiness: 0.1,
        }
    }
}

impl SimParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.mass > 0.0) {
            bail!("Mass must be positive, got {}.", self.mass);
        }
        if self.damping < 0.0 {
            bail!("Damping must be non-negative, got {}.", self.damping);
        }
        if !(0.0..=1.0).contains(&self.elasticity) {
            bail!("Elasticity must lie in [0, 1], got {}.", self.elasticity);
        }
        if !(self.stickiness > 0.0 && self.stickiness <= 1.0) {
            bail!("Stickiness must lie in (0, 1], got {}.", self.stickiness);
        }
        Ok(())
    }
}

/// Maps a mode to the body's 2D position and velocity. Pure: everything
/// comes from the arguments, nothing is cached between calls.
pub fn body_kinematics(
    geometry: &dyn PathGeometry,
    mode: &Mode,
) -> (Vector2<f64>, Vector2<f64>) {
    match *mode {
        Mode::Track { p, v } => {
            let pt = geometry.slope_at(p);
            let pos = geometry.position_at(p);
            let vel = unit_tangent(pt.k) * (v * pt.direction);
            (pos, vel)
        }
        Mode::Free { x, y, vx, vy } => (Vector2::new(x, y), Vector2::new(vx, vy)),
    }
}

/// Track-mode vector field over `[p, v, t]`.
pub struct TrackDynamics<'a> {
    pub geometry: &'a dyn PathGeometry,
    pub spring: Option<&'a Spring>,
    pub params: &'a SimParams,
}

impl DynamicalSystem<f64> for TrackDynamics<'_> {
    fn dimension(&self) -> usize {
        3
    }

    fn apply(&self, _elapsed: f64, x: &[f64], out: &mut [f64]) {
        let p = x[0];
        let v = x[1];
        let pt = self.geometry.slope_at(p);

        out[0] = v;

        let mut accel = -self.params.gravity * pt.direction * sin_slope(pt.k)
            - self.params.damping / self.params.mass * v;

        if let Some(spring) = self.spring {
            let pos = self.geometry.position_at(p);
            let tangent = unit_tangent(pt.k);
            let velocity = tangent * (v * pt.direction);
            let force = spring.force_on(pos, velocity);
            let f_tangent = force.dot(&tangent) * pt.direction;
            accel += f_tangent / self.params.mass;
        }

        out[1] = accel;
        out[2] = 1.0;
    }
}

/// Free-flight vector field over `[x, y, vx, vy, t]`.
pub struct FreeDynamics<'a> {
    pub spring: Option<&'a Spring>,
    pub params: &'a SimParams,
}

impl DynamicalSystem<f64> for FreeDynamics<'_> {
    fn dimension(&self) -> usize {
        5
    }

    fn apply(&self, _elapsed: f64, x: &[f64], out: &mut [f64]) {
        let pos = Vector2::new(x[0], x[1]);
        let vel = Vector2::new(x[2], x[3]);

        let spring_force = match self.spring {
            Some(spring) => spring.force_on(pos, vel),
            None => Vector2::zeros(),
        };

        out[0] = vel.x;
        out[1] = vel.y;
        out[2] = (spring_force.x - self.params.damping * vel.x) / self.params.mass;
        out[3] = -self.params.gravity + (spring_force.y - self.params.damping * vel.y) / self.params.mass;
        out[4] = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use super::{FreeDynamics, SimParams, TrackDynamics};
    use crate::path::sampled::SampledPath;
    use crate::path::shapes::RampPath;
    use crate::spring::Spring;
    use crate::traits::DynamicalSystem;
    use nalgebra::Vector2;

    fn ramp(slope: f64) -> SampledPath {
        SampledPath::new(&RampPath {
            slope,
            half_width: 4.0,
        })
        .expect("ramp should build")
    }

    #[test]
    fn params_validation_rejects_bad_values() {
        let mut params = SimParams::default();
        params.mass = 0.0;
        assert!(params.validate().is_err());
        params = SimParams::default();
        params.elasticity = 1.5;
        assert!(params.validate().is_err());
        params = SimParams::default();
        params.stickiness = 0.0;
        assert!(params.validate().is_err());
        assert!(SimParams::default().validate().is_ok());
    }

    #[test]
    fn incline_accelerates_downhill() {
        let path = ramp(1.0);
        let params = SimParams::default();
        let system = TrackDynamics {
            geometry: &path,
            spring: None,
            params: &params,
        };
        let mut out = [0.0; 3];
        system.apply(0.0, &[0.0, 0.0, 0.0], &mut out);
        // sin(45 deg) = 1/sqrt(2)
        let expected = -9.8 / 2.0f64.sqrt();
        assert!((out[1] - expected).abs() < 1e-6, "accel {}", out[1]);
        assert_eq!(out[0], 0.0);
        assert_eq!(out[2], 1.0);
    }

    #[test]
    fn flat_track_only_damps() {
        let path = ramp(0.0);
        let params = SimParams {
            damping: 0.5,
            mass: 2.0,
            ..SimParams::default()
        };
        let system = TrackDynamics {
            geometry: &path,
            spring: None,
            params: &params,
        };
        let mut out = [0.0; 3];
        system.apply(0.0, &[0.0, 4.0, 0.0], &mut out);
        assert_eq!(out[0], 4.0);
        assert!((out[1] + 0.5 / 2.0 * 4.0).abs() < 1e-9);
    }

    #[test]
    fn spring_pulls_along_the_track() {
        let path = ramp(0.0);
        let params = SimParams::default();
        // anchor far to the right on the track axis, stretched
        let spring = Spring::new(Vector2::new(10.0, 0.0), 0.0, 2.0, 0.0).expect("valid spring");
        let system = TrackDynamics {
            geometry: &path,
            spring: Some(&spring),
            params: &params,
        };
        let mut out = [0.0; 3];
        system.apply(0.0, &[0.0, 0.0, 0.0], &mut out);
        // spring force on the body at x=0 is +x with magnitude 20
        assert!((out[1] - 20.0).abs() < 1e-6, "accel {}", out[1]);
    }

    #[test]
    fn free_flight_is_newtonian() {
        let params = SimParams {
            damping: 0.25,
            ..SimParams::default()
        };
        let system = FreeDynamics {
            spring: None,
            params: &params,
        };
        let mut out = [0.0; 5];
        system.apply(0.0, &[0.0, 5.0, 2.0, -1.0, 0.0], &mut out);
        assert_eq!(out[0], 2.0);
        assert_eq!(out[1], -1.0);
        assert!((out[2] + 0.25 * 2.0).abs() < 1e-12);
        assert!((out[3] - (-9.8 + 0.25)).abs() < 1e-12);
        assert_eq!(out[4], 1.0);
    }

    #[test]
    fn evaluators_are_referentially_transparent() {
        let path = ramp(0.5);
        let params = SimParams::default();
        let system = TrackDynamics {
            geometry: &path,
            spring: None,
            params: &params,
        };
        let state = [1.0, -2.0, 3.0];
        let mut first = [0.0; 3];
        let mut second = [0.0; 3];
        system.apply(0.0, &state, &mut first);
        system.apply(0.0, &state, &mut second);
        assert_eq!(first, second);
    }
}
