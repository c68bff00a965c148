#![deny(clippy::all, clippy::cargo, clippy::expect_used, clippy::unwrap_used)]
#![deny(clippy::pedantic, clippy::nursery, unsafe_code)]
#![warn(clippy::unimplemented, clippy::redundant_type_annotations)]

use anyhow::ensure;
use std::io::BufRead;
use std::time::{Duration, Instant};

pub mod algo;
pub mod core;
pub mod data;

/// Runs the given solver on the instance read from the reader and writes the
/// resulting schedule, its makespan and the exit cause to stdout.
///
/// # Errors
/// - If the instance could not be read from the reader.
/// - If the solver rejects its configuration (expired deadline, malformed instance).
/// - If the returned schedule fails validity re-verification.
pub fn run_reader(
    solver: &mut dyn core::Solver,
    reader: &mut impl BufRead,
    timeout: Duration,
) -> anyhow::Result<()> {
    let instance = data::parse(reader)?;
    let solved = solver.solve(&instance, Instant::now() + timeout)?;

    ensure!(
        solved.schedule.verify(),
        "solver {} returned an invalid schedule",
        solver.name()
    );

    println!("{}", solved.schedule);
    println!("makespan: {} ({})", solved.schedule.makespan(), solved.cause);

    Ok(())
}
