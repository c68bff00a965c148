use std::fmt::{Display, Formatter};
use thiserror::Error;

/// The `index`-th operation of a job. Plain value, compared by fields.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Operation {
    pub job: usize,
    pub index: usize,
}

impl Operation {
    /// Creates the operation of `job` at position `index` in the job.
    #[must_use]
    pub const fn new(job: usize, index: usize) -> Self {
        Self { job, index }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.job, self.index)
    }
}

/// A malformed instance, rejected before any search iteration starts.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InstanceError {
    #[error("the instance has no jobs or no machines")]
    Empty,
    #[error("job {job} has {found} operations, expected {expected}")]
    WrongJobLength {
        job: usize,
        found: usize,
        expected: usize,
    },
    #[error("operation {operation} references machine {machine}, but there are only {machines} machines")]
    MachineOutOfRange {
        operation: Operation,
        machine: usize,
        machines: usize,
    },
    #[error("job {job} visits machine {machine} more than once")]
    DuplicateMachine { job: usize, machine: usize },
    #[error("operation {operation} has zero duration")]
    ZeroDuration { operation: Operation },
}

/// An instance of the job shop problem.
///
/// Every job is a fixed sequence of operations, one per machine; operation
/// `(j, i)` runs on `machines[j][i]` for `durations[j][i]` time units.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Instance {
    num_machines: usize,
    machines: Vec<Vec<usize>>,
    durations: Vec<Vec<u64>>,
}

impl Instance {
    /// Creates a validated instance from the per-job machine and duration tables.
    ///
    /// # Errors
    /// - If a job does not have exactly one operation per machine.
    /// - If an operation references a machine outside `0..num_machines`.
    /// - If a job visits the same machine twice.
    /// - If an operation has zero duration.
    pub fn new(
        num_machines: usize,
        machines: Vec<Vec<usize>>,
        durations: Vec<Vec<u64>>,
    ) -> Result<Self, InstanceError> {
        let instance = Self {
            num_machines,
            machines,
            durations,
        };
        instance.verify()?;
        Ok(instance)
    }

    /// Re-checks the structural invariants of the instance.
    ///
    /// # Errors
    /// - See [`Instance::new`].
    pub fn verify(&self) -> Result<(), InstanceError> {
        if self.machines.is_empty() || self.num_machines == 0 {
            return Err(InstanceError::Empty);
        }

        for (job, machines) in self.machines.iter().enumerate() {
            let durations = self.durations.get(job).map_or(0, Vec::len);
            if machines.len() != self.num_machines || durations != self.num_machines {
                let found = if machines.len() == self.num_machines {
                    durations
                } else {
                    machines.len()
                };
                return Err(InstanceError::WrongJobLength {
                    job,
                    found,
                    expected: self.num_machines,
                });
            }

            let mut visited = vec![false; self.num_machines];
            for (index, &machine) in machines.iter().enumerate() {
                let operation = Operation::new(job, index);
                if machine >= self.num_machines {
                    return Err(InstanceError::MachineOutOfRange {
                        operation,
                        machine,
                        machines: self.num_machines,
                    });
                }
                if visited[machine] {
                    return Err(InstanceError::DuplicateMachine { job, machine });
                }
                visited[machine] = true;

                if self.durations[job][index] == 0 {
                    return Err(InstanceError::ZeroDuration { operation });
                }
            }
        }
        Ok(())
    }

    /// Returns the number of jobs.
    #[must_use]
    pub fn num_jobs(&self) -> usize {
        self.machines.len()
    }

    /// Returns the number of machines.
    #[must_use]
    pub const fn num_machines(&self) -> usize {
        self.num_machines
    }

    /// Returns the number of operations of every job. Each job visits each
    /// machine exactly once, so this equals the number of machines.
    #[must_use]
    pub const fn num_operations(&self) -> usize {
        self.num_machines
    }

    /// Returns the total number of operations across all jobs.
    #[must_use]
    pub fn total_operations(&self) -> usize {
        self.num_jobs() * self.num_operations()
    }

    /// Returns the machine the operation runs on.
    #[must_use]
    pub fn machine_of(&self, operation: Operation) -> usize {
        self.machines[operation.job][operation.index]
    }

    /// Returns the processing time of the operation.
    #[must_use]
    pub fn duration_of(&self, operation: Operation) -> u64 {
        self.durations[operation.job][operation.index]
    }

    /// Returns the position within `job` of the operation running on `machine`.
    #[must_use]
    pub fn index_on_machine(&self, job: usize, machine: usize) -> usize {
        let Some(index) = self.machines[job].iter().position(|&m| m == machine) else {
            unreachable!("Every job visits every machine exactly once")
        };
        index
    }

    /// Returns the operation of `job` that runs on `machine`.
    #[must_use]
    pub fn operation_on(&self, job: usize, machine: usize) -> Operation {
        Operation::new(job, self.index_on_machine(job, machine))
    }
}
