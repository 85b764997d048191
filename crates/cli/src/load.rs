use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracecop_core::trace::types::ExecutionRecord;
use tracecop_testgen::ProcessLog;

pub type Record = ExecutionRecord<String, NaiveDateTime>;

/// Failure to read one input file.
#[derive(Debug)]
pub enum LoadError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl core::fmt::Display for LoadError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

/// Read one JSON trace file: an array of [`ProcessLog`] objects.
///
/// # Errors
///
/// Returns the serde error if the input is not a valid trace.
pub fn read_logs<R: Read>(reader: R) -> serde_json::Result<Vec<ProcessLog>> {
    serde_json::from_reader(reader)
}

/// Load every record of every file in `paths`, in file order and then in
/// the order each file lists them.
///
/// # Errors
///
/// Stops at the first file that cannot be opened or parsed.
pub fn load_records(paths: &[PathBuf]) -> Result<Vec<Record>, LoadError> {
    let mut records = Vec::new();
    for path in paths {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        let logs = read_logs(BufReader::new(file)).map_err(|source| LoadError::Json {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), records = logs.len(), "loaded trace file");
        records.extend(logs.into_iter().map(Record::from));
    }
    Ok(records)
}

/// Expand `paths` into files: files are kept as given, directories are
/// replaced by their entries with the given extension, sorted by name.
///
/// # Errors
///
/// Returns the I/O error of a directory that cannot be listed.
pub fn expand_paths(paths: &[PathBuf], extension: &str) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            let mut entries: Vec<PathBuf> = fs::read_dir(path)?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|p| has_extension(p, extension))
                .collect();
            entries.sort();
            files.extend(entries);
        } else {
            files.push(path.clone());
        }
    }
    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == extension)
}
