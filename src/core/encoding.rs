use super::{Instance, Operation, Schedule};
use std::fmt::{Display, Formatter};

/// Exchange of the operations at two slots of one machine's row.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Swap {
    pub machine: usize,
    pub first: usize,
    pub second: usize,
}

impl Swap {
    /// Creates a swap of the `first` and `second` slots on `machine`.
    #[must_use]
    pub const fn new(machine: usize, first: usize, second: usize) -> Self {
        Self {
            machine,
            first,
            second,
        }
    }

    /// Returns the move undoing this one.
    #[must_use]
    pub const fn reversed(self) -> Self {
        Self {
            machine: self.machine,
            first: self.second,
            second: self.first,
        }
    }
}

/// The resource-order encoding of a candidate solution: for each machine, the
/// order in which it processes its operations (one per job).
///
/// This is the only persisted representation of search state. A
/// [`Schedule`] is always derived from it through [`ResourceOrder::decode`],
/// and the encoding itself can be rebuilt from any valid schedule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ResourceOrder<'a> {
    instance: &'a Instance,
    rows: Vec<Vec<Operation>>,
}

impl<'a> ResourceOrder<'a> {
    /// Creates an encoding with empty machine rows, to be filled by a
    /// constructive solver through [`ResourceOrder::push`].
    pub(crate) fn empty(instance: &'a Instance) -> Self {
        Self {
            instance,
            rows: vec![Vec::with_capacity(instance.num_jobs()); instance.num_machines()],
        }
    }

    /// Appends an operation to the processing order of its machine.
    pub(crate) fn push(&mut self, operation: Operation) {
        self.rows[self.instance.machine_of(operation)].push(operation);
    }

    /// Rebuilds the encoding from a schedule by sorting each machine's
    /// operations by start time. The sort is stable, so ties keep job order.
    #[must_use]
    pub fn from_schedule(schedule: &Schedule<'a>) -> Self {
        let instance = schedule.instance();
        let rows = (0..instance.num_machines())
            .map(|machine| {
                let mut row: Vec<_> = (0..instance.num_jobs())
                    .map(|job| instance.operation_on(job, machine))
                    .collect();
                row.sort_by_key(|&operation| schedule.start(operation));
                row
            })
            .collect();
        Self { instance, rows }
    }

    /// Returns the instance this encoding belongs to.
    #[must_use]
    pub const fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Returns the processing order of `machine`.
    #[must_use]
    pub fn row(&self, machine: usize) -> &[Operation] {
        &self.rows[machine]
    }

    pub(crate) fn row_mut(&mut self, machine: usize) -> &mut Vec<Operation> {
        &mut self.rows[machine]
    }

    /// Returns the slot of `operation` in its machine's row.
    #[must_use]
    pub fn slot_of(&self, operation: Operation) -> usize {
        let row = self.row(self.instance.machine_of(operation));
        let Some(slot) = row.iter().position(|&other| other == operation) else {
            unreachable!("Complete rows contain every operation of their machine")
        };
        slot
    }

    /// Returns a new encoding with the two slots named by the swap exchanged.
    /// Feasibility is not checked here; it is discovered at decode time.
    #[must_use]
    pub fn apply_swap(&self, swap: Swap) -> Self {
        let mut order = self.clone();
        order.rows[swap.machine].swap(swap.first, swap.second);
        order
    }

    /// Simulates the two precedence relations (job order and machine order)
    /// into concrete start times.
    ///
    /// Repeatedly schedules the first machine (in machine-index order) whose
    /// next row slot holds its job's next unscheduled operation, starting it
    /// as early as both its job predecessor and its machine allow. Returns
    /// `None` when no machine qualifies before all operations are placed,
    /// which means the two relations form a cycle.
    #[must_use]
    pub fn decode(&self) -> Option<Schedule<'a>> {
        let instance = self.instance;
        let mut starts = vec![vec![0_u64; instance.num_operations()]; instance.num_jobs()];
        let mut next_of_job = vec![0_usize; instance.num_jobs()];
        let mut next_of_machine = vec![0_usize; instance.num_machines()];
        let mut release = vec![0_u64; instance.num_machines()];

        for _ in 0..instance.total_operations() {
            let operation = (0..instance.num_machines())
                .filter(|&machine| next_of_machine[machine] < self.rows[machine].len())
                .map(|machine| self.rows[machine][next_of_machine[machine]])
                .find(|operation| operation.index == next_of_job[operation.job])?;

            let machine = instance.machine_of(operation);
            let job_ready = if operation.index == 0 {
                0
            } else {
                let previous = Operation::new(operation.job, operation.index - 1);
                starts[operation.job][operation.index - 1] + instance.duration_of(previous)
            };

            let start = job_ready.max(release[machine]);
            starts[operation.job][operation.index] = start;
            next_of_job[operation.job] += 1;
            next_of_machine[machine] += 1;
            release[machine] = start + instance.duration_of(operation);
        }

        Some(Schedule::new(instance, starts))
    }
}

impl Display for ResourceOrder<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (machine, row) in self.rows.iter().enumerate() {
            write!(f, "machine {machine}:")?;
            for operation in row {
                write!(f, " {operation}")?;
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

    fn order_of<'a>(instance: &'a Instance, rows: &[&[(usize, usize)]]) -> ResourceOrder<'a> {
        let mut order = ResourceOrder::empty(instance);
        for row in rows {
            for &(job, index) in *row {
                order.push(Operation::new(job, index));
            }
        }
        order
    }

    #[test]
    fn decodes_the_two_by_two_example() -> anyhow::Result<()> {
        let instance = two_by_two();
        let order = order_of(&instance, &[&[(0, 0), (1, 1)], &[(1, 0), (0, 1)]]);

        let schedule = order
            .decode()
            .ok_or_else(|| anyhow::anyhow!("order must be feasible"))?;

        assert!(schedule.verify());
        assert_eq!(schedule.start(Operation::new(0, 0)), 0);
        assert_eq!(schedule.start(Operation::new(0, 1)), 3);
        assert_eq!(schedule.start(Operation::new(1, 0)), 0);
        assert_eq!(schedule.start(Operation::new(1, 1)), 3);
        assert_eq!(schedule.makespan(), 5);
        Ok(())
    }

    #[test]
    fn cyclic_order_is_infeasible() {
        let instance = two_by_two();
        // Machine 0 waits for job 1 to finish, machine 1 waits for job 0:
        // neither first operation can ever start.
        let order = order_of(&instance, &[&[(1, 1), (0, 0)], &[(0, 1), (1, 0)]]);
        assert_eq!(order.decode(), None);
    }

    #[test]
    fn decoded_schedules_are_valid() -> anyhow::Result<()> {
        let instance = two_by_two();
        let order = order_of(&instance, &[&[(1, 1), (0, 0)], &[(1, 0), (0, 1)]]);

        let schedule = order
            .decode()
            .ok_or_else(|| anyhow::anyhow!("order must be feasible"))?;
        assert!(schedule.verify());
        Ok(())
    }

    #[test]
    fn swap_application_is_an_involution() {
        let instance = two_by_two();
        let order = order_of(&instance, &[&[(0, 0), (1, 1)], &[(1, 0), (0, 1)]]);

        let swap = Swap::new(0, 0, 1);
        let swapped = order.apply_swap(swap);
        assert_ne!(swapped, order);
        assert_eq!(swapped.apply_swap(swap), order);
    }

    #[test]
    fn rebuilding_from_a_schedule_preserves_the_makespan() -> anyhow::Result<()> {
        let instance = two_by_two();
        let order = order_of(&instance, &[&[(0, 0), (1, 1)], &[(1, 0), (0, 1)]]);

        let schedule = order
            .decode()
            .ok_or_else(|| anyhow::anyhow!("order must be feasible"))?;
        let rebuilt = ResourceOrder::from_schedule(&schedule)
            .decode()
            .ok_or_else(|| anyhow::anyhow!("rebuilt order must be feasible"))?;

        assert_eq!(rebuilt.makespan(), schedule.makespan());
        Ok(())
    }

    #[test]
    fn slots_are_found_by_position() {
        let instance = two_by_two();
        let order = order_of(&instance, &[&[(0, 0), (1, 1)], &[(1, 0), (0, 1)]]);
        assert_eq!(order.slot_of(Operation::new(1, 1)), 1);
        assert_eq!(order.slot_of(Operation::new(1, 0)), 0);
    }
}
