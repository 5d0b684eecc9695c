//! Collision-aware step driver.
//!
//! [`CollisionAdvance`] owns the checkpoint / rollback discipline: a full
//! step is taken speculatively, and when the containment test fires
//! inside it, the step is rolled back and bisected to the largest
//! collision-free prefix. The collision response is applied exactly once
//! at that instant and the remainder of the interval continues normally.
//! All search loops are bounded; exceeding the cap is a reported fault,
//! never a hang.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::collision::CollisionEvent;
use crate::error::SimError;

/// The contract a simulation exposes to be driven through collisions.
///
/// One tick is: `checkpoint` → `integrate` → `settle` → `find_collision`,
/// with `rollback`/`integrate` replays during bisection and a single
/// `handle_collision` at the located contact instant.
pub trait CollisionSim {
    /// Saves the full state; `rollback` returns to the latest save.
    fn checkpoint(&mut self);
    fn rollback(&mut self);

    /// Integrates the current mode forward by `dt` (continuous update).
    fn integrate(&mut self, dt: f64);

    /// Post-integration housekeeping after a trial interval: parameter
    /// containment and the track-to-free stability test.
    fn settle(&mut self) -> Result<()>;

    /// Tests the current state for penetration.
    fn find_collision(&self) -> Option<CollisionEvent>;

    /// Applies the collision response at the current (collision-free)
    /// state. A discontinuous update.
    fn handle_collision(&mut self, event: CollisionEvent);
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdvanceSettings {
    /// Cap on bisection iterations per contact search, and on contacts
    /// handled within one step.
    pub max_bisections: usize,
    /// Fraction of the step interval below which the bisection bracket
    /// counts as converged.
    pub time_tolerance: f64,
}

impl Default for AdvanceSettings {
    fn default() -> Self {
        Self {
            max_bisections: 30,
            time_tolerance: 1e-7,
        }
    }
}

/// Drives a [`CollisionSim`] through full steps with contact isolation.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollisionAdvance {
    pub settings: AdvanceSettings,
}

impl CollisionAdvance {
    pub fn new(settings: AdvanceSettings) -> Self {
        Self { settings }
    }

    /// Advances the simulation by exactly `dt`.
    pub fn advance(&self, sim: &mut impl CollisionSim, dt: f64) -> Result<()> {
        if !(dt > 0.0) || !dt.is_finite() {
            bail!("Step size must be positive and finite, got {}.", dt);
        }

        let mut remaining = dt;
        let mut contacts = 0usize;

        while remaining > 0.0 {
            sim.checkpoint();
            sim.integrate(remaining);
            sim.settle()?;

            let event = match sim.find_collision() {
                None => break,
                Some(event) => event,
            };

            contacts += 1;
            if contacts > self.settings.max_bisections {
                return Err(SimError::BisectionStall {
                    t0: 0.0,
                    t1: remaining,
                    max_iterations: self.settings.max_bisections,
                }
                .into());
            }

            // bisect for the largest collision-free prefix of the interval
            let mut lo = 0.0;
            let mut hi = remaining;
            let mut last_event = event;
            let mut iterations = 0usize;
            while hi - lo > self.settings.time_tolerance * remaining {
                iterations += 1;
                if iterations > self.settings.max_bisections {
                    return Err(SimError::BisectionStall {
                        t0: lo,
                        t1: hi,
                        max_iterations: self.settings.max_bisections,
                    }
                    .into());
                }
                let mid = 0.5 * (lo + hi);
                sim.rollback();
                sim.integrate(mid);
                sim.settle()?;
                match sim.find_collision() {
                    Some(e) => {
                        last_event = e;
                        hi = mid;
                    }
                    None => lo = mid,
                }
            }
            tracing::trace!(lo, hi, iterations, "contact instant isolated");

            // land on the collision-free prefix and respond there
            sim.rollback();
            if lo > 0.0 {
                sim.integrate(lo);
                sim.settle()?;
            }
            sim.handle_collision(last_event);
            remaining -= lo;
        }

        Ok(())
    }
}
