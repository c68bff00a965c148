use super::neighborhood::{critical_blocks, neighbors};
use super::{spt, GreedySolver};
use crate::core::{
    ExitCause, Instance, ResourceOrder, Schedule, SolveError, Solved, Solver, Swap,
    check_configuration,
};
use std::time::Instant;

/// Tabu search over the Nowicki-Smutnicki neighborhood.
///
/// Unlike descent, the current solution advances to the best non-tabu
/// neighbor even when it is worse, which lets the search leave local optima.
/// After each move the reverse swap is forbidden for `tenure` iterations so
/// the search cannot immediately undo it. The best solution ever seen is
/// tracked separately and is what gets returned.
#[derive(Clone, Copy, Debug)]
pub struct TabooSolver {
    max_iterations: usize,
    tenure: usize,
    seed: GreedySolver,
}

/// Expiry iterations for reversed moves, indexed by the two slots of a swap.
/// Slot `s` of machine `m` maps to row/column `m * num_jobs + s`.
struct TabooTable {
    num_jobs: usize,
    until: Vec<Vec<usize>>,
}

impl TabooTable {
    fn new(instance: &Instance) -> Self {
        let size = instance.num_machines() * instance.num_jobs();
        Self {
            num_jobs: instance.num_jobs(),
            until: vec![vec![0; size]; size],
        }
    }

    fn cell(&self, swap: Swap) -> (usize, usize) {
        let base = swap.machine * self.num_jobs;
        (base + swap.first, base + swap.second)
    }

    /// A candidate is allowed unless undoing it is still forbidden, that is
    /// unless the expiry recorded for its reverse move lies beyond the
    /// current iteration.
    fn allows(&self, swap: Swap, iteration: usize) -> bool {
        let (row, column) = self.cell(swap.reversed());
        self.until[row][column] <= iteration
    }

    /// Forbids the reverse of `swap` until `iteration + tenure`. With a zero
    /// tenure the entry expires immediately and never blocks anything.
    fn forbid_reverse(&mut self, swap: Swap, iteration: usize, tenure: usize) {
        let (row, column) = self.cell(swap.reversed());
        self.until[row][column] = iteration.saturating_add(tenure);
    }
}

impl TabooSolver {
    /// Creates a tabu solver with the given iteration cap and tenure, seeded
    /// by the given constructive solver.
    #[must_use]
    pub const fn new(max_iterations: usize, tenure: usize, seed: GreedySolver) -> Self {
        Self {
            max_iterations,
            tenure,
            seed,
        }
    }
}

impl Default for TabooSolver {
    fn default() -> Self {
        Self::new(10_000, 10, GreedySolver::new("spt", spt))
    }
}

impl Solver for TabooSolver {
    fn solve<'a>(
        &mut self,
        instance: &'a Instance,
        deadline: Instant,
    ) -> Result<Solved<'a>, SolveError> {
        check_configuration(instance, deadline)?;

        let mut best = self.seed.initial_schedule(instance);
        let mut current = best.clone();
        let mut table = TabooTable::new(instance);
        let mut iteration = 0;

        while iteration < self.max_iterations {
            if Instant::now() >= deadline {
                return Ok(Solved {
                    schedule: best,
                    cause: ExitCause::Timeout,
                });
            }
            iteration += 1;

            let order = ResourceOrder::from_schedule(&current);
            let mut chosen: Option<(Schedule<'a>, Swap)> = None;

            for block in critical_blocks(&order, &current) {
                for swap in neighbors(&block) {
                    if !table.allows(swap, iteration) {
                        continue;
                    }
                    let Some(candidate) = order.apply_swap(swap).decode() else {
                        continue;
                    };
                    if chosen
                        .as_ref()
                        .map_or(true, |(found, _)| candidate.makespan() < found.makespan())
                    {
                        chosen = Some((candidate, swap));
                    }
                }
            }

            // Every neighbor can be tabu or infeasible; such an iteration is
            // a no-op and the tabu entries keep aging out.
            let Some((candidate, swap)) = chosen else {
                continue;
            };

            table.forbid_reverse(swap, iteration, self.tenure);
            if candidate.makespan() < best.makespan() {
                best = candidate.clone();
            }
            current = candidate;
        }

        Ok(Solved {
            schedule: best,
            cause: ExitCause::IterationLimit,
        })
    }

    fn name(&self) -> &str {
        "taboo"
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

    fn solve_with_cap(instance: &Instance, max_iterations: usize) -> anyhow::Result<u64> {
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut solver = TabooSolver::new(max_iterations, 10, GreedySolver::new("spt", spt));
        let solved = solver.solve(instance, deadline)?;
        anyhow::ensure!(solved.schedule.verify(), "invalid schedule");
        Ok(solved.schedule.makespan())
    }

    #[test]
    fn best_ever_makespan_never_increases_with_iterations() -> anyhow::Result<()> {
        let instance = ft06()?;
        // The trajectory is deterministic, so more iterations can only
        // improve the best solution seen along it.
        let short = solve_with_cap(&instance, 1)?;
        let long = solve_with_cap(&instance, 50)?;
        assert!(long <= short);
        Ok(())
    }

    #[test]
    fn never_returns_worse_than_the_seed() -> anyhow::Result<()> {
        let instance = ft06()?;
        let seed = GreedySolver::new("spt", spt).initial_schedule(&instance);
        let makespan = solve_with_cap(&instance, 200)?;
        assert!(makespan <= seed.makespan());
        Ok(())
    }

    #[test]
    fn zero_tenure_never_blocks_a_move() -> anyhow::Result<()> {
        let instance = ft06()?;
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut solver = TabooSolver::new(50, 0, GreedySolver::new("spt", spt));
        let solved = solver.solve(&instance, deadline)?;
        assert!(solved.schedule.verify());
        assert_eq!(solved.cause, ExitCause::IterationLimit);
        Ok(())
    }

    #[test]
    fn all_tabu_iterations_are_a_no_op() -> anyhow::Result<()> {
        // A huge tenure makes every reverse move tabu almost immediately;
        // the search must still terminate at its iteration cap.
        let instance = ft06()?;
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut solver = TabooSolver::new(30, usize::MAX / 2, GreedySolver::new("spt", spt));
        let solved = solver.solve(&instance, deadline)?;
        assert!(solved.schedule.verify());
        Ok(())
    }
}
