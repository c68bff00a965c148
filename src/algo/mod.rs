mod descent;
mod greedy;
pub mod neighborhood;
mod random;
mod taboo;

pub use descent::DescentSolver;
pub use greedy::{est_lrpt, est_spt, lpt, lrpt, spt, srpt, Candidate, GreedySolver, PriorityRule};
pub use random::RandomSolver;
pub use taboo::TabooSolver;

use crate::core::Solver;

/// Builds every available solver under its registry name. The list is the
/// explicit configuration handed to the drivers at startup; there is no
/// global registry.
#[must_use]
pub fn solvers() -> Vec<Box<dyn Solver>> {
    vec![
        Box::new(GreedySolver::new("spt", spt)),
        Box::new(GreedySolver::new("lpt", lpt)),
        Box::new(GreedySolver::new("srpt", srpt)),
        Box::new(GreedySolver::new("lrpt", lrpt)),
        Box::new(GreedySolver::new("est_spt", est_spt)),
        Box::new(GreedySolver::new("est_lrpt", est_lrpt)),
        Box::new(RandomSolver::default()),
        Box::new(DescentSolver::default()),
        Box::new(TabooSolver::default()),
    ]
}

/// Looks a solver up by its registry name.
#[must_use]
pub fn solver_by_name(name: &str) -> Option<Box<dyn Solver>> {
    solvers().into_iter().find(|solver| solver.name() == name)
}
