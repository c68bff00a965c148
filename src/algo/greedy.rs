use crate::core::{
    ExitCause, Instance, Operation, ResourceOrder, Schedule, SolveError, Solved, Solver,
    check_configuration,
};
use std::time::Instant;

/// A feasible operation together with the earliest time it could start.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Candidate {
    pub operation: Operation,
    pub earliest_start: u64,
}

/// A priority rule: picks one entry of a non-empty feasible set.
/// Rules are pure functions selected at solver construction.
pub type PriorityRule = fn(&Instance, &[Candidate]) -> Operation;

fn by_duration(instance: &Instance, candidates: &[Candidate], shortest: bool) -> Operation {
    let Some(chosen) = candidates.iter().reduce(|best, candidate| {
        let better = if shortest {
            instance.duration_of(candidate.operation) < instance.duration_of(best.operation)
        } else {
            instance.duration_of(candidate.operation) > instance.duration_of(best.operation)
        };
        if better {
            candidate
        } else {
            best
        }
    }) else {
        unreachable!("The feasible set is never empty")
    };
    chosen.operation
}

fn remaining_time(instance: &Instance, operation: Operation) -> u64 {
    (operation.index..instance.num_operations())
        .map(|index| instance.duration_of(Operation::new(operation.job, index)))
        .sum()
}

fn by_remaining(instance: &Instance, candidates: &[Candidate], shortest: bool) -> Operation {
    let Some(chosen) = candidates.iter().reduce(|best, candidate| {
        let better = if shortest {
            remaining_time(instance, candidate.operation) < remaining_time(instance, best.operation)
        } else {
            remaining_time(instance, candidate.operation) > remaining_time(instance, best.operation)
        };
        if better {
            candidate
        } else {
            best
        }
    }) else {
        unreachable!("The feasible set is never empty")
    };
    chosen.operation
}

/// Restricts the feasible set to the candidates with the minimal earliest
/// start before applying `rule`.
fn earliest_start_filtered(
    instance: &Instance,
    candidates: &[Candidate],
    rule: PriorityRule,
) -> Operation {
    let Some(best) = candidates.iter().map(|c| c.earliest_start).min() else {
        unreachable!("The feasible set is never empty")
    };
    let filtered: Vec<_> = candidates
        .iter()
        .copied()
        .filter(|c| c.earliest_start == best)
        .collect();
    rule(instance, &filtered)
}

/// Shortest processing time first.
#[must_use]
pub fn spt(instance: &Instance, candidates: &[Candidate]) -> Operation {
    by_duration(instance, candidates, true)
}

/// Longest processing time first.
#[must_use]
pub fn lpt(instance: &Instance, candidates: &[Candidate]) -> Operation {
    by_duration(instance, candidates, false)
}

/// Shortest remaining processing time of the job first.
#[must_use]
pub fn srpt(instance: &Instance, candidates: &[Candidate]) -> Operation {
    by_remaining(instance, candidates, true)
}

/// Longest remaining processing time of the job first.
#[must_use]
pub fn lrpt(instance: &Instance, candidates: &[Candidate]) -> Operation {
    by_remaining(instance, candidates, false)
}

/// SPT among the candidates that can start the earliest.
#[must_use]
pub fn est_spt(instance: &Instance, candidates: &[Candidate]) -> Operation {
    earliest_start_filtered(instance, candidates, spt)
}

/// LRPT among the candidates that can start the earliest.
#[must_use]
pub fn est_lrpt(instance: &Instance, candidates: &[Candidate]) -> Operation {
    earliest_start_filtered(instance, candidates, lrpt)
}

/// Constructive solver: repeatedly appends the operation chosen by its
/// priority rule to the machine rows of a [`ResourceOrder`], then decodes the
/// completed encoding.
#[derive(Clone, Copy, Debug)]
pub struct GreedySolver {
    name: &'static str,
    rule: PriorityRule,
}

impl GreedySolver {
    /// Creates a greedy solver applying the given rule.
    #[must_use]
    pub const fn new(name: &'static str, rule: PriorityRule) -> Self {
        Self { name, rule }
    }

    /// Builds a schedule without deadline bookkeeping. This is the seed used
    /// by the local-search solvers; construction is a single pass over the
    /// operations and always yields a feasible encoding.
    #[must_use]
    pub fn initial_schedule<'a>(&self, instance: &'a Instance) -> Schedule<'a> {
        let mut order = ResourceOrder::empty(instance);
        let mut release = vec![0_u64; instance.num_machines()];
        let mut job_ready = vec![0_u64; instance.num_jobs()];
        let mut feasible: Vec<_> = (0..instance.num_jobs())
            .map(|job| Operation::new(job, 0))
            .collect();

        while !feasible.is_empty() {
            let candidates: Vec<_> = feasible
                .iter()
                .map(|&operation| {
                    let machine = instance.machine_of(operation);
                    Candidate {
                        operation,
                        earliest_start: job_ready[operation.job].max(release[machine]),
                    }
                })
                .collect();

            let chosen = (self.rule)(instance, &candidates);
            let machine = instance.machine_of(chosen);
            let start = job_ready[chosen.job].max(release[machine]);
            let finish = start + instance.duration_of(chosen);
            release[machine] = finish;
            job_ready[chosen.job] = finish;
            order.push(chosen);

            let Some(position) = feasible.iter().position(|&o| o == chosen) else {
                unreachable!("The chosen operation comes from the feasible set")
            };
            if chosen.index + 1 < instance.num_operations() {
                feasible[position] = Operation::new(chosen.job, chosen.index + 1);
            } else {
                feasible.remove(position);
            }
        }

        let Some(schedule) = order.decode() else {
            unreachable!("Operations were appended in a feasible scheduling order")
        };
        schedule
    }
}

impl Solver for GreedySolver {
    fn solve<'a>(
        &mut self,
        instance: &'a Instance,
        deadline: Instant,
    ) -> Result<Solved<'a>, SolveError> {
        check_configuration(instance, deadline)?;
        Ok(Solved {
            schedule: self.initial_schedule(instance),
            cause: ExitCause::Completed,
        })
    }

    fn name(&self) -> &str {
        self.name
    }
}
