//! The `glide_core` crate is a hybrid track-constrained / free-flight
//! dynamics engine: a point mass rides a one-dimensional curve under
//! gravity, damping, and an optional spring, leaves the curve when the
//! geometry can no longer supply the centripetal acceleration its speed
//! demands, flies ballistically in 2D, and reattaches through an
//! impulse-based collision response with a stickiness heuristic.
//!
//! Key components:
//! - **Traits**: `Scalar` (numeric abstraction), `DynamicalSystem` (the
//!   pure derivative evaluators), `Steppable` (fixed-step solvers).
//! - **Path**: the `PathGeometry` query trait plus a table-sampled
//!   adapter for closed-form parametric curves.
//! - **State**: the named, observer-facing `StateVector` and the
//!   `Mode` tagged union (`Track` vs `Free`).
//! - **Advance**: the collision-aware step driver with checkpoint,
//!   rollback, and bisection to the contact instant.

pub mod advance;
pub mod collision;
pub mod dynamics;
pub mod energy;
pub mod error;
pub mod path;
pub mod sim;
pub mod solvers;
pub mod spring;
pub mod state;
pub mod traits;
pub mod transition;
