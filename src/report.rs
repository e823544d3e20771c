//! Filepath: src/report.rs
//!
//! Summaries of finished benchmark runs.
//!
//! `cargo bench --bench matrix` leaves one directory per measured case under
//! `target/criterion`. Each holds `new/benchmark.json` (the ids the case was
//! registered with) and `new/estimates.json` (timing statistics). This
//! module reads them back, groups the timings as
//!
//! ```text
//! operation -> value size (bytes) -> container -> element count -> ns
//! ```
//!
//! and renders one markdown table per (operation, value size) so the
//! fastest container at each element count is visible at a glance.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as FmtWrite;
use std::fmt as StdFmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;

use crate::matrix::Operation;
use crate::tracing_helpers::debug_log;
use crate::value::ValueKind;

// ============================================================================
//  ReportError
// ============================================================================

/// Errors collecting benchmark results.
#[derive(Debug)]
pub enum ReportError {
    /// Reading a file or directory failed.
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// A criterion file did not have the expected shape.
    Json {
        /// File being parsed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// A benchmark id could not be split into operation, value type,
    /// container and element count.
    MalformedId {
        /// File the id came from.
        path: PathBuf,
        /// The offending id.
        id: String,
    },

    /// A group named a value type this crate does not generate.
    UnknownValueType(String),
}

impl StdFmt::Display for ReportError {
    fn fmt(&self, f: &mut StdFmt::Formatter<'_>) -> StdFmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "reading {}: {source}", path.display()),

            Self::Json { path, source } => write!(f, "parsing {}: {source}", path.display()),

            Self::MalformedId { path, id } => {
                write!(f, "malformed benchmark id {id:?} in {}", path.display())
            }

            Self::UnknownValueType(name) => write!(f, "unknown value type {name:?}"),
        }
    }
}

impl std::error::Error for ReportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::MalformedId { .. } | Self::UnknownValueType(_) => None,
        }
    }
}

// ============================================================================
//  Measurement
// ============================================================================

/// One timed case at one size.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    /// Operation timed.
    pub operation: Operation,
    /// Value shape stored.
    pub value: ValueKind,
    /// Container name.
    pub container: String,
    /// Element count.
    pub elements: usize,
    /// Mean time per iteration in nanoseconds.
    pub nanos: f64,
}

#[derive(Debug, Deserialize)]
struct BenchmarkRecord {
    group_id: String,
    function_id: Option<String>,
    value_str: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EstimatesRecord {
    mean: Estimate,
}

#[derive(Debug, Deserialize)]
struct Estimate {
    point_estimate: f64,
}

/// Read every case measured under `dir` (usually `target/criterion`).
///
/// Groups whose operation is not one of ours are skipped.
///
/// # Errors
///
/// Fails on unreadable files, unexpected JSON, or ids that name one of our
/// operations but cannot be decoded.
pub fn collect(dir: &Path) -> Result<Vec<Measurement>, ReportError> {
    let mut files = Vec::new();
    find_benchmark_files(dir, &mut files)?;
    files.sort();

    let parsed: Vec<Option<Measurement>> = files
        .par_iter()
        .map(|path| read_measurement(path))
        .collect::<Result<_, _>>()?;

    Ok(parsed.into_iter().flatten().collect())
}

/// Push every `new/benchmark.json` below `dir` onto `out`.
fn find_benchmark_files(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), ReportError> {
    let entries = fs::read_dir(dir).map_err(|source| ReportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let entry = entry.map_err(|source| ReportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_dir() {
            find_benchmark_files(&path, out)?;
        } else if path.file_name().is_some_and(|name| name == "benchmark.json")
            && dir.file_name().is_some_and(|name| name == "new")
        {
            out.push(path);
        }
    }
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, ReportError> {
    let raw = fs::read_to_string(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ReportError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode one `benchmark.json` and its sibling `estimates.json`.
fn read_measurement(path: &Path) -> Result<Option<Measurement>, ReportError> {
    let record: BenchmarkRecord = read_json(path)?;

    let malformed = || ReportError::MalformedId {
        path: path.to_path_buf(),
        id: record.group_id.clone(),
    };

    let Some((op_name, value_name)) = record.group_id.split_once('/') else {
        debug_log!(group = %record.group_id, "skipping foreign benchmark group");
        return Ok(None);
    };
    let Some(operation) = Operation::from_name(op_name) else {
        debug_log!(group = %record.group_id, "skipping foreign benchmark group");
        return Ok(None);
    };
    let value = ValueKind::from_name(value_name)
        .ok_or_else(|| ReportError::UnknownValueType(value_name.to_string()))?;
    let container = record.function_id.clone().ok_or_else(malformed)?;
    let elements = record
        .value_str
        .as_deref()
        .and_then(|s| s.parse::<usize>().ok())
        .ok_or_else(malformed)?;

    let estimates: EstimatesRecord = read_json(&path.with_file_name("estimates.json"))?;

    Ok(Some(Measurement {
        operation,
        value,
        container,
        elements,
        nanos: estimates.mean.point_estimate,
    }))
}

// ============================================================================
//  BenchmarkResults
// ============================================================================

/// Element count -> nanoseconds, per container.
pub type ContainerSeries = BTreeMap<String, BTreeMap<usize, f64>>;

/// Timings grouped by operation, then value size in bytes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BenchmarkResults {
    /// `operation -> value bytes -> container -> elements -> ns`.
    pub data: BTreeMap<Operation, BTreeMap<usize, ContainerSeries>>,
    /// Every value size seen, ascending.
    pub sizes_in_bytes: Vec<usize>,
    /// Every element count seen, ascending.
    pub cardinalities: Vec<usize>,
}

impl BenchmarkResults {
    /// Group `measurements`, keeping element counts within
    /// `[min_elements, max_elements]`. A bound of 0 means unbounded.
    #[must_use]
    pub fn from_measurements<I>(measurements: I, min_elements: usize, max_elements: usize) -> Self
    where
        I: IntoIterator<Item = Measurement>,
    {
        let mut data: BTreeMap<Operation, BTreeMap<usize, ContainerSeries>> = BTreeMap::new();
        let mut sizes = BTreeSet::new();
        let mut cardinalities = BTreeSet::new();

        for m in measurements {
            let above_min = min_elements == 0 || m.elements >= min_elements;
            let below_max = max_elements == 0 || m.elements <= max_elements;
            if !(above_min && below_max) {
                continue;
            }

            let bytes = m.value.size_in_bytes();
            data.entry(m.operation)
                .or_default()
                .entry(bytes)
                .or_default()
                .entry(m.container)
                .or_default()
                .insert(m.elements, m.nanos);
            sizes.insert(bytes);
            cardinalities.insert(m.elements);
        }

        Self {
            data,
            sizes_in_bytes: sizes.into_iter().collect(),
            cardinalities: cardinalities.into_iter().collect(),
        }
    }

    /// `true` if no measurement survived filtering.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Section title, e.g. "Random lookup in maps up to 16384 elements (16 byte data)".
#[must_use]
pub fn section_title(operation: Operation, max_elements: usize, value_bytes: usize) -> String {
    format!(
        "{} in {} up to {max_elements} elements ({value_bytes} byte data)",
        operation.access().label(),
        operation.family().plural(),
    )
}

/// Format a duration in nanoseconds with a readable unit.
#[must_use]
pub fn format_nanos(nanos: f64) -> String {
    if nanos >= 1e6 {
        format!("{:.2} ms", nanos / 1e6)
    } else if nanos >= 1e3 {
        format!("{:.2} µs", nanos / 1e3)
    } else {
        format!("{nanos:.1} ns")
    }
}

/// Render one table per (operation, value size). The fastest container at
/// each element count is shown in bold.
#[must_use]
pub fn render_markdown(results: &BenchmarkResults) -> String {
    let mut md = String::with_capacity(16 * 1024);
    let _ = writeln!(md, "# Container benchmark report\n");

    if results.is_empty() {
        let _ = writeln!(md, "No measurements.");
        return md;
    }

    for (operation, by_size) in &results.data {
        for (&bytes, series) in by_size {
            let max_elements = series
                .values()
                .filter_map(|points| points.keys().next_back().copied())
                .max()
                .unwrap_or(0);
            let _ = writeln!(md, "## {}\n", section_title(*operation, max_elements, bytes));

            let containers: Vec<&String> = series.keys().collect();
            let _ = write!(md, "| elements |");
            for name in &containers {
                let _ = write!(md, " {name} |");
            }
            let _ = writeln!(md);
            let _ = write!(md, "|---:|");
            for _ in &containers {
                let _ = write!(md, "---:|");
            }
            let _ = writeln!(md);

            for &n in &results.cardinalities {
                let row: Vec<Option<f64>> = containers
                    .iter()
                    .map(|name| series[*name].get(&n).copied())
                    .collect();
                if row.iter().all(Option::is_none) {
                    continue;
                }
                let fastest = row
                    .iter()
                    .flatten()
                    .copied()
                    .fold(f64::INFINITY, f64::min);

                let _ = write!(md, "| {n} |");
                for cell in row {
                    match cell {
                        Some(ns) if ns <= fastest => {
                            let _ = write!(md, " **{}** |", format_nanos(ns));
                        }
                        Some(ns) => {
                            let _ = write!(md, " {} |", format_nanos(ns));
                        }
                        None => {
                            let _ = write!(md, " - |");
                        }
                    }
                }
                let _ = writeln!(md);
            }
            let _ = writeln!(md);
        }
    }
    md
}
