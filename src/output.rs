//! Path serialization in the `std` and `visit` layouts.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::NodeRef;
use crate::error::StitchError;
use crate::paths::Path;
use crate::records::{CandidateRecord, RecordStore, TimeStepHeader};
use crate::schema::FormatSchema;

/// Output layout selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated: a `start` line per path followed by one line per node.
    #[default]
    Std,
    /// Comma-separated table with one row per node, for VisIt.
    Visit,
}

impl FromStr for OutputFormat {
    type Err = StitchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "std" => Ok(OutputFormat::Std),
            "visit" => Ok(OutputFormat::Visit),
            other => Err(StitchError::config(format!(
                "Output format must be either \"std\" or \"visit\", got \"{}\"",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Std => write!(f, "std"),
            OutputFormat::Visit => write!(f, "visit"),
        }
    }
}

fn lookup<'a>(
    store: &'a RecordStore,
    node: NodeRef,
) -> io::Result<(&'a TimeStepHeader, &'a CandidateRecord)> {
    let step = store.time_step(node.time);
    step.and_then(|s| s.candidates.get(node.candidate).map(|c| (&s.header, c)))
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("path references unknown candidate {}", node),
            )
        })
}

/// Write paths in the requested layout.
pub fn write_paths<W: Write>(
    writer: &mut W,
    format: OutputFormat,
    paths: &[Path],
    store: &RecordStore,
    schema: &FormatSchema,
) -> io::Result<()> {
    match format {
        OutputFormat::Std => write_std(writer, paths, store),
        OutputFormat::Visit => write_visit(writer, paths, store, schema),
    }
}

/// Render paths into an in-memory buffer.
pub fn render_paths(
    format: OutputFormat,
    paths: &[Path],
    store: &RecordStore,
    schema: &FormatSchema,
) -> io::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_paths(&mut buffer, format, paths, store, schema)?;
    Ok(buffer)
}

fn write_std<W: Write>(writer: &mut W, paths: &[Path], store: &RecordStore) -> io::Result<()> {
    for path in paths {
        let Some(start) = path.start() else {
            continue;
        };
        let (start_header, _) = lookup(store, start)?;

        write!(writer, "start\t{}\t", path.len())?;
        for field in start_header.date_fields() {
            write!(writer, "{}\t", field)?;
        }
        writeln!(writer)?;

        for &node in &path.nodes {
            let (header, candidate) = lookup(store, node)?;
            write!(writer, "\t")?;
            for field in candidate.fields() {
                write!(writer, "{}\t", field)?;
            }
            for field in header.date_fields() {
                write!(writer, "{}\t", field)?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}

fn write_visit<W: Write>(
    writer: &mut W,
    paths: &[Path],
    store: &RecordStore,
    schema: &FormatSchema,
) -> io::Result<()> {
    writeln!(writer, "id,time_id,year,month,day,hour,{}", schema.as_str())?;

    for (i, path) in paths.iter().enumerate() {
        for (t, &node) in path.nodes.iter().enumerate() {
            let (header, candidate) = lookup(store, node)?;
            write!(
                writer,
                "{},\t{},\t{},\t{},\t{},\t{},\t\t",
                i + 1,
                t + 1,
                header.year(),
                header.month(),
                header.day(),
                header.hour()
            )?;
            writeln!(writer, "{}", candidate.fields().join(",\t"))?;
        }
    }
    Ok(())
}
