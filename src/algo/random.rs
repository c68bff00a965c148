use crate::core::{
    ExitCause, Instance, Operation, ResourceOrder, Schedule, SolveError, Solved, Solver,
    check_configuration,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::time::Instant;

/// Baseline solver: draws random machine orders until the deadline and keeps
/// the best feasible one.
#[derive(Clone, Debug)]
pub struct RandomSolver {
    rng: StdRng,
}

impl RandomSolver {
    /// Creates a new solver with a seeded generator.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn job_ordered(instance: &Instance) -> ResourceOrder<'_> {
        let mut order = ResourceOrder::empty(instance);
        for job in 0..instance.num_jobs() {
            for index in 0..instance.num_operations() {
                order.push(Operation::new(job, index));
            }
        }
        order
    }

    /// Every machine row in ascending job order. Decoding schedules the jobs
    /// one after another, so this order is always feasible and guarantees a
    /// schedule to return even when the first deadline check fires.
    fn canonical(instance: &Instance) -> Schedule<'_> {
        let Some(schedule) = Self::job_ordered(instance).decode() else {
            unreachable!("Job-ordered rows schedule the jobs sequentially")
        };
        schedule
    }
}

impl Default for RandomSolver {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Solver for RandomSolver {
    fn solve<'a>(
        &mut self,
        instance: &'a Instance,
        deadline: Instant,
    ) -> Result<Solved<'a>, SolveError> {
        check_configuration(instance, deadline)?;

        let mut best = Self::canonical(instance);

        while Instant::now() < deadline {
            let mut order = Self::job_ordered(instance);
            for machine in 0..instance.num_machines() {
                order.row_mut(machine).shuffle(&mut self.rng);
            }

            if let Some(schedule) = order.decode() {
                if schedule.makespan() < best.makespan() {
                    best = schedule;
                }
            }
        }

        Ok(Solved {
            schedule: best,
            cause: ExitCause::Timeout,
        })
    }

    fn name(&self) -> &str {
        "random"
    }
}
