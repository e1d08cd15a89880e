//! Shared helpers for output writers.

use std::fs;
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};

use crate::error::{OutputError, Result};

/// File names written by a matching run.
pub const JOINED_FILE: &str = "joined.csv";
pub const DIAGNOSTICS_FILE: &str = "diagnostics.csv";
pub const UNRECOGNIZED_FILE: &str = "unrecognized_units.csv";
pub const REPORT_FILE: &str = "report.json";

/// Ensure a parent directory exists for a file path.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| OutputError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Ensure an output directory exists and return its path.
pub fn ensure_output_dir(dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(dir.to_path_buf())
}

pub(crate) fn csv_writer(path: &Path) -> Result<Writer<fs::File>> {
    ensure_parent_dir(path)?;
    WriterBuilder::new()
        .from_path(path)
        .map_err(|source| csv_error(path, source))
}

pub(crate) fn csv_error(path: &Path, source: csv::Error) -> OutputError {
    OutputError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

pub(crate) fn flush(mut writer: Writer<fs::File>, path: &Path) -> Result<()> {
    writer.flush().map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Optional number as a CSV cell; empty when absent.
pub fn number_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Optional index as a CSV cell; empty when absent.
pub fn index_cell(value: Option<usize>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
