use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet};
use std::ffi::OsString;
use std::fmt::Write as _;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::TimeDelta;
use serde::Serialize;
use tracecop_core::analysis::conflict::ConflictEntry;
use tracecop_core::analysis::summary::ResourceSummary;
use tracecop_core::trace::types::{AccessMode, ProcessId};
use tracecop_testgen::log::timestamp;

use crate::load::Record;

// ---------------------------------------------------------------------------
// Summary CSV
// ---------------------------------------------------------------------------

pub const CSV_HEADER: [&str; 4] = ["resource", "read", "write", "conflicts"];

/// Quote a CSV field when it holds a separator, a quote or a line break.
#[must_use]
pub fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Write `summary` as CSV: a header row, then one row per resource in
/// resource order. Rows end in CRLF.
///
/// # Errors
///
/// Propagates write errors.
pub fn write_summary_csv<W: Write>(
    mut writer: W,
    summary: &ResourceSummary<String>,
) -> io::Result<()> {
    write!(writer, "{}\r\n", CSV_HEADER.join(","))?;
    for (resource, stats) in summary {
        write!(
            writer,
            "{},{},{},{}\r\n",
            csv_field(resource),
            stats.reads,
            stats.writes,
            stats.conflicts
        )?;
    }
    writer.flush()
}

// ---------------------------------------------------------------------------
// Conflict report
// ---------------------------------------------------------------------------

/// When and how one side of a conflict ran.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogSpan {
    pub start: String,
    pub end: String,
    pub mode: AccessMode,
}

impl From<&Record> for LogSpan {
    fn from(record: &Record) -> Self {
        Self {
            start: timestamp::format(&record.start),
            end: timestamp::format(&record.end),
            mode: record.mode,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PotentialConflict {
    pub log1: LogSpan,
    pub log2: LogSpan,
    pub affected_resources: Vec<String>,
}

/// The JSON conflict report of one process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictReport {
    pub pid: ProcessId,
    pub runtime_total: String,
    pub runtime_avg: String,
    pub potential_conflicts: Vec<PotentialConflict>,
}

impl ConflictReport {
    /// `records` must be the records the conflicts were computed from.
    ///
    /// # Panics
    ///
    /// Panics if a conflict refers to a record outside `records`.
    #[must_use]
    pub fn new(
        pid: ProcessId,
        records: &[Record],
        conflicts: &[ConflictEntry<String>],
        total: TimeDelta,
    ) -> Self {
        let potential_conflicts = conflicts
            .iter()
            .map(|conflict| PotentialConflict {
                log1: LogSpan::from(&records[conflict.pair.first.index()]),
                log2: LogSpan::from(&records[conflict.pair.second.index()]),
                affected_resources: conflict.resources.iter().cloned().collect(),
            })
            .collect();
        Self {
            pid,
            runtime_total: format_runtime(total),
            runtime_avg: format_runtime(average_runtime(total, records.len())),
            potential_conflicts,
        }
    }
}

// ---------------------------------------------------------------------------
// Runtimes
// ---------------------------------------------------------------------------

const MICROS_PER_SEC: i128 = 1_000_000;
const MICROS_PER_DAY: i128 = 86_400 * MICROS_PER_SEC;

fn total_micros(span: TimeDelta) -> i128 {
    i128::from(span.num_seconds()) * MICROS_PER_SEC + i128::from(span.subsec_nanos() / 1_000)
}

/// `total / count`, rounded down to the microsecond. Zero for no records.
#[must_use]
pub fn average_runtime(total: TimeDelta, count: usize) -> TimeDelta {
    let Ok(count) = i128::try_from(count) else {
        return TimeDelta::zero();
    };
    if count == 0 {
        return TimeDelta::zero();
    }
    let average = total_micros(total).div_euclid(count);
    i64::try_from(average).map_or(TimeDelta::MAX, TimeDelta::microseconds)
}

/// Render a span as `[D day[s], ]H:MM:SS[.ffffff]`.
///
/// Days are floored, so a negative span shows negative days and a positive
/// time of day.
#[must_use]
pub fn format_runtime(span: TimeDelta) -> String {
    let micros = total_micros(span);
    let days = micros.div_euclid(MICROS_PER_DAY);
    let rest = micros.rem_euclid(MICROS_PER_DAY);

    let fraction = rest % MICROS_PER_SEC;
    let seconds = rest / MICROS_PER_SEC;
    let clock = format!(
        "{}:{:02}:{:02}",
        seconds / 3600,
        seconds / 60 % 60,
        seconds % 60
    );

    let prefix = match days {
        0 => String::new(),
        1 | -1 => format!("{days} day, "),
        _ => format!("{days} days, "),
    };
    let suffix = if fraction == 0 {
        String::new()
    } else {
        format!(".{fraction:06}")
    };
    format!("{prefix}{clock}{suffix}")
}

// ---------------------------------------------------------------------------
// Paths and tables
// ---------------------------------------------------------------------------

/// `dir/summary.csv` becomes `dir/summary_7.csv` for process 7.
#[must_use]
pub fn with_pid_suffix(path: &Path, pid: ProcessId) -> PathBuf {
    let mut name: OsString = path.file_stem().unwrap_or_default().to_os_string();
    name.push(format!("_{pid}"));
    if let Some(extension) = path.extension() {
        name.push(".");
        name.push(extension);
    }
    path.with_file_name(name)
}

/// Process ids as a bracketed list in ascending order, e.g. `[1, 2, 3]`.
#[must_use]
pub fn pid_list(pids: &BTreeSet<ProcessId>) -> String {
    format!("{:?}", pids.iter().collect::<Vec<_>>())
}

/// Entries per process id, one row per id in ascending order.
#[must_use]
pub fn frequency_table(frequencies: &BTreeMap<ProcessId, usize>) -> String {
    let width = frequencies
        .keys()
        .map(|pid| pid.to_string().len())
        .max()
        .unwrap_or(0)
        .max("pid".len());
    let mut table = String::new();
    let _ = writeln!(table, "{:>width$}  entries", "pid");
    for (pid, entries) in frequencies {
        let _ = writeln!(table, "{pid:>width$}  {entries:>7}");
    }
    table
}

/// The resource summary as an aligned text table.
#[must_use]
pub fn summary_table(summary: &ResourceSummary<String>) -> String {
    let width = summary
        .iter()
        .map(|(resource, _)| resource.len())
        .max()
        .unwrap_or(0)
        .max("resource".len());
    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<width$}  {:>6}  {:>6}  {:>9}",
        "resource", "read", "write", "conflicts"
    );
    for (resource, stats) in summary {
        let _ = writeln!(
            table,
            "{resource:<width$}  {:>6}  {:>6}  {:>9}",
            stats.reads, stats.writes, stats.conflicts
        );
    }
    table
}
