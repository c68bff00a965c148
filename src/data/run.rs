use super::{best_known, read_file};
use crate::core::Solver;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result};
use std::time::{Duration, Instant};

/// Report of running one solver over a directory of instances.
#[derive(Debug, Deserialize, Serialize)]
pub struct Report {
    solver: String,
    entries: Vec<ReportEntry>,
}

impl Report {
    fn new(solver: String) -> Self {
        let entries = Vec::new();
        Self { solver, entries }
    }

    /// Get the solver name.
    #[must_use]
    pub fn solver_name(&self) -> &str {
        &self.solver
    }

    /// Get the entries.
    #[must_use]
    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Average deviation from the best-known makespans, in percent, over the
    /// entries that have one recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_deviation(&self) -> Option<f64> {
        let deviations: Vec<_> = self
            .entries
            .iter()
            .filter_map(ReportEntry::deviation)
            .collect();
        if deviations.is_empty() {
            None
        } else {
            Some(deviations.iter().sum::<f64>() / deviations.len() as f64)
        }
    }
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        writeln!(f, "Solver: {}", self.solver)?;
        for entry in &self.entries {
            writeln!(f, "{entry}")?;
        }
        if let Some(deviation) = self.average_deviation() {
            writeln!(f, "average deviation: {deviation:.1}%")?;
        }
        writeln!(f, "-------------------")
    }
}

/// Report of running a single instance.
#[non_exhaustive]
#[derive(Debug, Deserialize, Serialize)]
pub struct ReportEntry {
    pub name: String,
    pub makespan: u64,
    pub best_known: Option<u64>,
    pub cause: String,
    pub time: f64,
}

impl ReportEntry {
    /// Deviation from the best-known makespan in percent, if one is recorded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn deviation(&self) -> Option<f64> {
        self.best_known
            .map(|best| 100.0 * (self.makespan as f64 - best as f64) / best as f64)
    }
}

impl Display for ReportEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{}: {} in {:.2} sec ({})",
            self.name, self.makespan, self.time, self.cause
        )?;
        if let Some(deviation) = self.deviation() {
            write!(f, " [{deviation:+.1}% of best known]")?;
        }
        Ok(())
    }
}

/// Runs the solver on every instance file in `dir` with a fresh deadline of
/// `timeout` per instance. Files are visited in name order so reports are
/// comparable across runs.
///
/// # Errors
/// - If the directory cannot be read or an instance fails to parse.
/// - If the solver rejects its configuration.
///
/// # Panics
/// - If the solver returns a schedule that fails validity re-verification.
pub fn run(dir: &str, timeout: Duration, solver: &mut dyn Solver) -> anyhow::Result<Report> {
    let mut report = Report::new(solver.name().into());

    let mut files: Vec<_> = std::fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .collect();
    files.sort();

    for path in files {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let instance = read_file(&path)?;

        let start = Instant::now();
        let solved = solver.solve(&instance, start + timeout)?;
        let time = start.elapsed().as_secs_f64();

        assert!(
            solved.schedule.verify(),
            "solver {} returned an invalid schedule for {name}",
            solver.name()
        );

        report.entries.push(ReportEntry {
            name: name.clone(),
            makespan: solved.schedule.makespan(),
            best_known: best_known(&name),
            cause: solved.cause.to_string(),
            time,
        });
    }

    Ok(report)
}

/// Runs the solver on the bundled sample instances. Used by tests.
///
/// # Errors
/// - See [`run`]; additionally if no sample instance was found.
pub fn samples(timeout: Duration, solver: &mut dyn Solver) -> anyhow::Result<Report> {
    let report = run("instances", timeout, solver)?;
    anyhow::ensure!(!report.entries().is_empty(), "No sample instances found");
    Ok(report)
}
