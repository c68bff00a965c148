use super::neighborhood::{critical_blocks, neighbors};
use super::{spt, GreedySolver};
use crate::core::{
    ExitCause, Instance, ResourceOrder, Schedule, SolveError, Solved, Solver, check_configuration,
};
use std::time::Instant;

/// Steepest-descent local search over the Nowicki-Smutnicki neighborhood.
///
/// Every iteration decodes all block swaps of the current solution and moves
/// to the best strictly improving one; the search ends at a local optimum or
/// at the deadline. The makespan never increases, so the result is never
/// worse than the greedy seed.
#[derive(Clone, Copy, Debug)]
pub struct DescentSolver {
    seed: GreedySolver,
}

impl DescentSolver {
    /// Creates a descent solver seeded by the given constructive solver.
    #[must_use]
    pub const fn new(seed: GreedySolver) -> Self {
        Self { seed }
    }
}

impl Default for DescentSolver {
    fn default() -> Self {
        Self::new(GreedySolver::new("spt", spt))
    }
}

impl Solver for DescentSolver {
    fn solve<'a>(
        &mut self,
        instance: &'a Instance,
        deadline: Instant,
    ) -> Result<Solved<'a>, SolveError> {
        check_configuration(instance, deadline)?;

        let mut best = self.seed.initial_schedule(instance);

        loop {
            if Instant::now() >= deadline {
                return Ok(Solved {
                    schedule: best,
                    cause: ExitCause::Timeout,
                });
            }

            let order = ResourceOrder::from_schedule(&best);
            let mut improvement: Option<Schedule<'a>> = None;

            for block in critical_blocks(&order, &best) {
                for swap in neighbors(&block) {
                    let Some(candidate) = order.apply_swap(swap).decode() else {
                        continue;
                    };
                    let beats_iteration_best = improvement
                        .as_ref()
                        .map_or(true, |found| candidate.makespan() < found.makespan());
                    if candidate.makespan() < best.makespan() && beats_iteration_best {
                        improvement = Some(candidate);
                    }
                }
            }

            match improvement {
                Some(schedule) => best = schedule,
                None => {
                    return Ok(Solved {
                        schedule: best,
                        cause: ExitCause::LocalOptimum,
                    })
                }
            }
        }
    }

    fn name(&self) -> &str {
        "descent"
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data;
    use std::fs::File;
    use std::io::BufReader;
    use std::time::Duration;

    fn ft06() -> anyhow::Result<Instance> {
        data::parse(&mut BufReader::new(File::open("instances/ft06")?))
    }

    #[test]
    fn never_returns_worse_than_the_seed() -> anyhow::Result<()> {
        let instance = ft06()?;
        let seed = GreedySolver::new("spt", spt).initial_schedule(&instance);

        let deadline = Instant::now() + Duration::from_secs(2);
        let solved = DescentSolver::default().solve(&instance, deadline)?;

        assert!(solved.schedule.verify());
        assert!(solved.schedule.makespan() <= seed.makespan());
        Ok(())
    }

    #[test]
    fn stops_at_a_local_optimum_or_the_deadline() -> anyhow::Result<()> {
        let instance = ft06()?;
        let deadline = Instant::now() + Duration::from_secs(2);
        let solved = DescentSolver::default().solve(&instance, deadline)?;
        assert!(matches!(
            solved.cause,
            ExitCause::LocalOptimum | ExitCause::Timeout
        ));
        Ok(())
    }

    #[test]
    fn rejects_an_expired_deadline() -> anyhow::Result<()> {
        let instance = ft06()?;
        let result = DescentSolver::default().solve(&instance, Instant::now());
        assert_eq!(result.err(), Some(SolveError::DeadlineExpired));
        Ok(())
    }
}
