use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

/// A trait for types that can be used as scalars by the numerical solvers.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A system of ordinary differential equations in first-order form.
///
/// Implementations must be pure functions of their inputs: multi-stage
/// solvers call `apply` several times per step with trial states that are
/// never committed, so the evaluator may not read or write any state of
/// its own between calls.
pub trait DynamicalSystem<T: Scalar> {
    /// Returns the dimension of the state space.
    fn dimension(&self) -> usize;

    /// Evaluates the vector field.
    ///
    /// `elapsed`: time offset since the state was last fully committed
    /// (zero at the start of a step, a stage offset inside one). The
    /// physics here does not depend on it, but collision-aware drivers do.
    /// `x`: current state. `out`: pre-zeroed buffer receiving dx/dt.
    fn apply(&self, elapsed: T, x: &[T], out: &mut [T]);
}

/// A fixed-step solver that can advance a system in time.
///
/// Time is carried inside the state vector (its derivative is exactly 1),
/// so `step` takes no separate time argument.
pub trait Steppable<T: Scalar> {
    /// Performs one step of size dt, updating `state` in place.
    fn step(&mut self, system: &impl DynamicalSystem<T>, state: &mut [T], dt: T);
}
