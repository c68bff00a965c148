use anyhow::anyhow;
use clap::Parser;
use jobshop::core::{Instance, Solver};
use jobshop::{algo, data, run_reader};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::io::Write;
use std::num::NonZero;
use std::time::Duration;

/// Application solving the job shop scheduling problem.
#[derive(Debug, Parser)]
enum Application {
    /// Run one of the implemented solvers on an instance read from stdin.
    Run {
        /// The solver to use.
        solver: String,
        /// Solver timeout in seconds.
        #[clap(short, long, default_value = "1")]
        timeout: u64,
    },
    /// Run benchmarks on a directory of instances.
    Bench {
        /// The input directory.
        input: String,
        /// Solver timeout in seconds for each instance.
        #[clap(short, long, default_value = "1")]
        timeout: u64,
        /// Exclude solvers by name.
        #[clap(short, long, value_delimiter = ',')]
        exclude: Vec<String>,
        /// Write the reports as JSON instead of text.
        #[clap(long)]
        json: bool,
    },
    /// Generate random instances of the job shop problem.
    Gen {
        /// The number of jobs.
        jobs: NonZero<usize>,
        /// The number of machines (and operations per job).
        machines: NonZero<usize>,
        /// The maximum processing time of an operation.
        #[clap(short, long, default_value = "99")]
        max_duration: NonZero<u64>,
        /// Number of instances to generate.
        #[clap(short, long, default_value = "1")]
        amount: NonZero<u64>,
        /// Seed for the random generator.
        #[clap(short, long, default_value = "0")]
        seed: u64,
        /// Path to output the generated instances. Created if missing.
        #[clap(short, long, default_value = "output")]
        output: String,
    },
}

fn pick_solver(name: &str) -> anyhow::Result<Box<dyn Solver>> {
    algo::solver_by_name(name).ok_or_else(|| {
        let names: Vec<_> = algo::solvers()
            .iter()
            .map(|solver| solver.name().to_owned())
            .collect();
        anyhow!(
            "solver \"{name}\" is not available; available solvers: {}",
            names.join(", ")
        )
    })
}

fn solvers(exclude: &[String]) -> impl Iterator<Item = Box<dyn Solver>> + '_ {
    let iter = algo::solvers().into_iter();
    iter.filter(|solver| !exclude.iter().any(|name| name == solver.name()))
}

fn gen_instance(jobs: usize, machines: usize, max_duration: u64, rng: &mut StdRng) -> Instance {
    let mut machine_rows = Vec::with_capacity(jobs);
    let mut duration_rows = Vec::with_capacity(jobs);
    for _ in 0..jobs {
        let mut row: Vec<usize> = (0..machines).collect();
        row.shuffle(rng);
        machine_rows.push(row);
        duration_rows.push((0..machines).map(|_| rng.gen_range(1..=max_duration)).collect());
    }

    let Ok(instance) = Instance::new(machines, machine_rows, duration_rows) else {
        unreachable!("Shuffled machine permutations always form a valid instance")
    };
    instance
}

fn main() -> anyhow::Result<()> {
    match Application::parse() {
        Application::Run { solver, timeout } => {
            let mut solver = pick_solver(&solver)?;
            run_reader(
                solver.as_mut(),
                &mut std::io::stdin().lock(),
                Duration::from_secs(timeout),
            )
        }
        Application::Bench {
            input,
            timeout,
            exclude,
            json,
        } => {
            for mut solver in solvers(&exclude) {
                let report = data::run(&input, Duration::from_secs(timeout), solver.as_mut())?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print!("{report}");
                }
            }
            Ok(())
        }
        Application::Gen {
            jobs,
            machines,
            max_duration,
            amount,
            seed,
            output,
        } => {
            let output = std::path::Path::new(&output);
            if !output.try_exists()? {
                std::fs::create_dir_all(output)?;
            }

            let mut rng = StdRng::seed_from_u64(seed);
            for i in 0..amount.get() {
                let instance =
                    gen_instance(jobs.get(), machines.get(), max_duration.get(), &mut rng);
                let filename = format!("{}x{}_{i}", jobs, machines);
                std::fs::File::create(output.join(filename))?
                    .write_all(data::to_string(&instance).as_bytes())?;
            }
            Ok(())
        }
    }
}
