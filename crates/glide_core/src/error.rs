use thiserror::Error;

/// Structured simulation faults reported to the driver.
///
/// These are never swallowed inside the core; every fallible operation
/// surfaces them through its `Result`.
#[derive(Debug, Error)]
pub enum SimError {
    /// The collision bisection search failed to isolate the contact
    /// instant within the iteration cap.
    #[error(
        "collision search failed to converge within {max_iterations} bisections over [{t0}, {t1}]"
    )]
    BisectionStall {
        t0: f64,
        t1: f64,
        max_iterations: usize,
    },

    /// A direction cosine drifted outside the unit interval by more than
    /// the recoverable tolerance, indicating inconsistent geometry or state.
    #[error("direction cosine {value} out of range at path parameter {p}")]
    TrigDomain { value: f64, p: f64 },
}
