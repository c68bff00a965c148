use crate::core::{Operation, ResourceOrder, Schedule, Swap};

/// A maximal run of at least two consecutive slots of one machine's row whose
/// operations all lie on the critical path.
///
/// For the encoding
/// `machine 1 : (0,2) (2,1) (1,1)` a block with `machine = 1`, `first = 0`
/// and `last = 1` covers the sequence `(0,2) (2,1)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Block {
    pub machine: usize,
    pub first: usize,
    pub last: usize,
}

/// Groups the schedule's critical path into same-machine blocks, emitted in
/// path order. Runs of a single operation do not form a block.
///
/// The schedule must be the one decoded from `order`; the caller already
/// holds it in every search iteration, so it is passed in rather than
/// decoded a second time.
#[must_use]
pub fn critical_blocks(order: &ResourceOrder<'_>, schedule: &Schedule<'_>) -> Vec<Block> {
    let instance = order.instance();
    let path = schedule.critical_path();

    let mut blocks = Vec::new();
    let mut run_machine = usize::MAX;
    let mut run_start = Operation::new(0, 0);
    let mut run_length = 0_usize;

    let mut close_run = |machine: usize, start: Operation, length: usize| {
        if length >= 2 {
            let first = order.slot_of(start);
            blocks.push(Block {
                machine,
                first,
                last: first + length - 1,
            });
        }
    };

    for &operation in &path {
        let machine = instance.machine_of(operation);
        if machine == run_machine {
            run_length += 1;
        } else {
            close_run(run_machine, run_start, run_length);
            run_machine = machine;
            run_start = operation;
            run_length = 1;
        }
    }
    close_run(run_machine, run_start, run_length);

    blocks
}

/// Enumerates the swaps of the Nowicki-Smutnicki neighborhood for one block:
/// the two endpoints for a block of two, otherwise the first and the last
/// adjacent pair. Interior slots are never swapped directly, which keeps the
/// neighborhood size proportional to the number of blocks.
#[must_use]
pub fn neighbors(block: &Block) -> Vec<Swap> {
    if block.last - block.first == 1 {
        vec![Swap::new(block.machine, block.first, block.last)]
    } else {
        vec![
            Swap::new(block.machine, block.first, block.first + 1),
            Swap::new(block.machine, block.last - 1, block.last),
        ]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::Instance;

    fn three_jobs_one_machine_heavy() -> Instance {
        // Three jobs whose first operations all queue on machine 0, keeping
        // the critical path on a single machine long enough to form a block.
        let Ok(instance) = Instance::new(
            2,
            vec![vec![0, 1], vec![0, 1], vec![0, 1]],
            vec![vec![5, 1], vec![5, 1], vec![5, 1]],
        ) else {
            panic!("instance must be valid")
        };
        instance
    }

    fn decode<'a>(order: &ResourceOrder<'a>) -> Schedule<'a> {
        let Some(schedule) = order.decode() else {
            panic!("order must be feasible")
        };
        schedule
    }

    #[test]
    fn blocks_cover_same_machine_runs_of_the_critical_path() {
        let instance = three_jobs_one_machine_heavy();
        let mut order = ResourceOrder::empty(&instance);
        for job in 0..3 {
            order.push(Operation::new(job, 0));
        }
        for job in 0..3 {
            order.push(Operation::new(job, 1));
        }

        let schedule = decode(&order);
        let blocks = critical_blocks(&order, &schedule);

        assert!(!blocks.is_empty());
        for block in &blocks {
            assert!(block.last > block.first);
            let row = order.row(block.machine);
            for slot in block.first..=block.last {
                assert_eq!(instance.machine_of(row[slot]), block.machine);
            }
        }
    }

    #[test]
    fn a_two_slot_block_has_one_swap() {
        let block = Block {
            machine: 1,
            first: 3,
            last: 4,
        };
        assert_eq!(neighbors(&block), vec![Swap::new(1, 3, 4)]);
    }

    #[test]
    fn a_longer_block_swaps_only_its_edges() {
        let block = Block {
            machine: 0,
            first: 2,
            last: 5,
        };
        assert_eq!(
            neighbors(&block),
            vec![Swap::new(0, 2, 3), Swap::new(0, 4, 5)]
        );
    }
}
