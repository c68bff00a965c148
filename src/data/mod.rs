mod best_known;
mod run;

pub use best_known::*;
pub use run::*;

use crate::core::Instance;
use anyhow::{anyhow, Context};
use std::fmt::Write as _;
use std::io::BufRead;
use std::path::Path;

/// Reads an instance in the standard job shop text format: a header line
/// `num_jobs num_machines`, then one line per job holding `(machine,
/// duration)` pairs in operation order. Lines starting with `#` are ignored.
///
/// # Errors
/// - If the reader fails or the text does not follow the format.
/// - If the described instance is malformed (see [`Instance::new`]).
pub fn parse(reader: &mut impl BufRead) -> anyhow::Result<Instance> {
    let mut lines = reader
        .lines()
        .enumerate()
        .filter(|(_, line)| match line {
            Ok(line) => {
                let line = line.trim();
                !line.is_empty() && !line.starts_with('#')
            }
            Err(_) => true,
        });

    let (number, header) = lines.next().ok_or_else(|| anyhow!("empty instance file"))?;
    let header = header.with_context(|| format!("cannot read line {}", number + 1))?;
    let mut header = header.split_whitespace();
    let num_jobs: usize = next_field(&mut header, number, "number of jobs")?;
    let num_machines: usize = next_field(&mut header, number, "number of machines")?;

    let mut machines = Vec::with_capacity(num_jobs);
    let mut durations = Vec::with_capacity(num_jobs);

    for _ in 0..num_jobs {
        let (number, line) = lines
            .next()
            .ok_or_else(|| anyhow!("expected {num_jobs} job lines"))?;
        let line = line.with_context(|| format!("cannot read line {}", number + 1))?;
        let mut fields = line.split_whitespace();

        let mut job_machines = Vec::with_capacity(num_machines);
        let mut job_durations = Vec::with_capacity(num_machines);
        for _ in 0..num_machines {
            job_machines.push(next_field(&mut fields, number, "machine")?);
            job_durations.push(next_field(&mut fields, number, "duration")?);
        }
        if fields.next().is_some() {
            return Err(anyhow!("trailing fields on line {}", number + 1));
        }

        machines.push(job_machines);
        durations.push(job_durations);
    }

    Ok(Instance::new(num_machines, machines, durations)?)
}

fn next_field<T: std::str::FromStr>(
    fields: &mut std::str::SplitWhitespace<'_>,
    line: usize,
    what: &str,
) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    fields
        .next()
        .ok_or_else(|| anyhow!("missing {what} on line {}", line + 1))?
        .parse()
        .with_context(|| format!("invalid {what} on line {}", line + 1))
}

/// Reads an instance from a file.
///
/// # Errors
/// - See [`parse`]; file-system errors carry the path.
pub fn read_file(path: impl AsRef<Path>) -> anyhow::Result<Instance> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("cannot open instance {}", path.display()))?;
    parse(&mut std::io::BufReader::new(file))
        .with_context(|| format!("cannot parse instance {}", path.display()))
}

/// Writes an instance in the same text format [`parse`] reads.
#[must_use]
pub fn to_string(instance: &Instance) -> String {
    let mut result = String::new();
    let _ = writeln!(
        result,
        "{} {}",
        instance.num_jobs(),
        instance.num_machines()
    );
    for job in 0..instance.num_jobs() {
        for index in 0..instance.num_operations() {
            let operation = crate::core::Operation::new(job, index);
            if index > 0 {
                result.push(' ');
            }
            let _ = write!(
                result,
                "{} {}",
                instance.machine_of(operation),
                instance.duration_of(operation)
            );
        }
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::Operation;
    use std::io::Cursor;

    #[test]
    fn parses_the_text_format() -> anyhow::Result<()> {
        let text = "# Fisher and Thompson would start like this\n2 2\n0 3 1 2\n1 2 0 1\n";
        let instance = parse(&mut Cursor::new(text))?;

        assert_eq!(instance.num_jobs(), 2);
        assert_eq!(instance.num_machines(), 2);
        assert_eq!(instance.machine_of(Operation::new(0, 0)), 0);
        assert_eq!(instance.duration_of(Operation::new(1, 1)), 1);
        Ok(())
    }

    #[test]
    fn round_trips_through_to_string() -> anyhow::Result<()> {
        let text = "2 2\n0 3 1 2\n1 2 0 1\n";
        let instance = parse(&mut Cursor::new(text))?;
        let rendered = to_string(&instance);
        let reparsed = parse(&mut Cursor::new(rendered))?;
        assert_eq!(instance, reparsed);
        Ok(())
    }

    #[test]
    fn rejects_malformed_files() {
        assert!(parse(&mut Cursor::new("")).is_err());
        assert!(parse(&mut Cursor::new("2\n")).is_err());
        assert!(parse(&mut Cursor::new("2 2\n0 3 1 2\n")).is_err());
        assert!(parse(&mut Cursor::new("2 2\n0 3 1 2\n1 x 0 1\n")).is_err());
        assert!(parse(&mut Cursor::new("2 2\n0 3 1 2\n1 2 0 1 7\n")).is_err());
        // Structurally fine but machine index out of range.
        assert!(parse(&mut Cursor::new("2 2\n0 3 2 2\n1 2 0 1\n")).is_err());
    }

    #[test]
    fn ships_parseable_benchmark_instances() -> anyhow::Result<()> {
        let ft06 = read_file("instances/ft06")?;
        assert_eq!(ft06.num_jobs(), 6);
        assert_eq!(ft06.num_machines(), 6);

        let la01 = read_file("instances/la01")?;
        assert_eq!(la01.num_jobs(), 10);
        assert_eq!(la01.num_machines(), 5);
        Ok(())
    }
}
