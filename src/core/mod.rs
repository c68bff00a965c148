mod encoding;
mod problem;
mod solution;

pub use encoding::*;
pub use problem::*;
pub use solution::*;

use std::time::Instant;

/// Solves job shop instances under a wall-clock deadline.
pub trait Solver {
    /// Computes a schedule for the given instance, stopping at the deadline.
    ///
    /// The returned schedule always satisfies [`Schedule::verify`].
    ///
    /// # Errors
    /// - If the deadline has already expired.
    /// - If the instance is malformed.
    fn solve<'a>(
        &mut self,
        instance: &'a Instance,
        deadline: Instant,
    ) -> Result<Solved<'a>, SolveError>;

    /// Returns the name of the solver.
    fn name(&self) -> &str;
}

/// Fails fast on configurations no search should start from.
///
/// # Errors
/// - If the deadline has already expired.
/// - If the instance is malformed.
pub(crate) fn check_configuration(
    instance: &Instance,
    deadline: Instant,
) -> Result<(), SolveError> {
    instance.verify()?;
    if deadline <= Instant::now() {
        return Err(SolveError::DeadlineExpired);
    }
    Ok(())
}
