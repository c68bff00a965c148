use super::{Instance, InstanceError, Operation};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Why a solver stopped.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExitCause {
    /// No neighbor strictly improves on the current solution.
    LocalOptimum,
    /// The wall-clock deadline elapsed.
    Timeout,
    /// The configured iteration cap was reached.
    IterationLimit,
    /// The solver ran to completion (constructive and baseline solvers).
    Completed,
}

impl Display for ExitCause {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LocalOptimum => write!(f, "local optimum"),
            Self::Timeout => write!(f, "timeout"),
            Self::IterationLimit => write!(f, "iteration limit"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// A schedule together with the reason the solver returned it.
#[derive(Clone, Debug)]
pub struct Solved<'a> {
    pub schedule: Schedule<'a>,
    pub cause: ExitCause,
}

/// Configuration rejected before any search iteration starts.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SolveError {
    #[error("the deadline expired before the search started")]
    DeadlineExpired,
    #[error(transparent)]
    MalformedInstance(#[from] InstanceError),
}

/// Start times for every operation of an instance. Derived from a
/// [`ResourceOrder`](super::ResourceOrder) or a constructive solver and
/// immutable afterwards.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Schedule<'a> {
    instance: &'a Instance,
    starts: Vec<Vec<u64>>,
}

impl<'a> Schedule<'a> {
    pub(crate) fn new(instance: &'a Instance, starts: Vec<Vec<u64>>) -> Self {
        Self { instance, starts }
    }

    /// Returns the instance this schedule belongs to.
    #[must_use]
    pub const fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Returns the start time of the operation.
    #[must_use]
    pub fn start(&self, operation: Operation) -> u64 {
        self.starts[operation.job][operation.index]
    }

    /// Returns the completion time of the operation.
    #[must_use]
    pub fn end(&self, operation: Operation) -> u64 {
        self.start(operation) + self.instance.duration_of(operation)
    }

    /// Returns the completion time of the last finishing operation.
    #[must_use]
    pub fn makespan(&self) -> u64 {
        let last = self.instance.num_operations() - 1;
        (0..self.instance.num_jobs())
            .map(|job| self.end(Operation::new(job, last)))
            .max()
            .unwrap_or_default()
    }

    /// Checks that job precedences hold and that no machine runs two
    /// operations at once.
    #[must_use]
    pub fn verify(&self) -> bool {
        let instance = self.instance;

        for job in 0..instance.num_jobs() {
            for index in 1..instance.num_operations() {
                let previous = Operation::new(job, index - 1);
                if self.start(Operation::new(job, index)) < self.end(previous) {
                    return false;
                }
            }
        }

        for machine in 0..instance.num_machines() {
            for first in 0..instance.num_jobs() {
                for second in first + 1..instance.num_jobs() {
                    let a = instance.operation_on(first, machine);
                    let b = instance.operation_on(second, machine);
                    if self.start(a) < self.end(b) && self.start(b) < self.end(a) {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Returns the chain of zero-slack operations ending at the makespan,
    /// in chronological order.
    ///
    /// The walk starts at the first operation (in job order) that finishes at
    /// the makespan and repeatedly moves to a predecessor whose completion
    /// time equals the current start time, preferring the machine predecessor
    /// when both are tight. It stops at an operation with no tight
    /// predecessor.
    #[must_use]
    pub fn critical_path(&self) -> Vec<Operation> {
        let instance = self.instance;
        let makespan = self.makespan();
        let last = instance.num_operations() - 1;

        let Some(mut current) = (0..instance.num_jobs())
            .map(|job| Operation::new(job, last))
            .find(|&operation| self.end(operation) == makespan)
        else {
            unreachable!("Some operation always achieves the makespan")
        };

        let mut path = vec![current];
        while let Some(previous) = self.tight_predecessor(current) {
            path.push(previous);
            current = previous;
        }

        path.reverse();
        path
    }

    /// Finds a predecessor finishing exactly when `operation` starts, with the
    /// machine predecessor taking precedence over the job predecessor.
    fn tight_predecessor(&self, operation: Operation) -> Option<Operation> {
        let instance = self.instance;
        let start = self.start(operation);
        let machine = instance.machine_of(operation);

        let on_machine = (0..instance.num_jobs())
            .map(|job| instance.operation_on(job, machine))
            .find(|&other| other != operation && self.end(other) == start);
        if on_machine.is_some() {
            return on_machine;
        }

        if operation.index > 0 {
            let previous = Operation::new(operation.job, operation.index - 1);
            if self.end(previous) == start {
                return Some(previous);
            }
        }

        None
    }
}

impl Display for Schedule<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (job, starts) in self.starts.iter().enumerate() {
            write!(f, "job {job}:")?;
            for &start in starts {
                write!(f, " {start}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn two_by_two() -> Instance {
        let Ok(instance) = Instance::new(
            2,
            vec![vec![0, 1], vec![1, 0]],
            vec![vec![3, 2], vec![2, 1]],
        ) else {
            panic!("2x2 instance must be valid")
        };
        instance
    }

    #[test]
    fn makespan_is_latest_completion() {
        let instance = two_by_two();
        let schedule = Schedule::new(&instance, vec![vec![0, 3], vec![0, 3]]);
        assert_eq!(schedule.makespan(), 5);
        assert!(schedule.verify());
    }

    #[test]
    fn job_precedence_violation_is_detected() {
        let instance = two_by_two();
        let schedule = Schedule::new(&instance, vec![vec![0, 2], vec![0, 3]]);
        assert!(!schedule.verify());
    }

    #[test]
    fn machine_overlap_is_detected() {
        let instance = two_by_two();
        let schedule = Schedule::new(&instance, vec![vec![0, 3], vec![0, 2]]);
        assert!(!schedule.verify());
    }

    #[test]
    fn critical_path_is_chronological_and_tight() {
        let instance = two_by_two();
        let schedule = Schedule::new(&instance, vec![vec![0, 3], vec![0, 3]]);
        let path = schedule.critical_path();

        assert_eq!(schedule.end(path[path.len() - 1]), schedule.makespan());
        assert_eq!(schedule.start(path[0]), 0);
        for pair in path.windows(2) {
            assert_eq!(schedule.end(pair[0]), schedule.start(pair[1]));
        }
    }
}
