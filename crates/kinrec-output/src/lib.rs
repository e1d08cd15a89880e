//! Output generation for matching runs.
//!
//! A run directory holds `joined.csv`, `diagnostics.csv`,
//! `unrecognized_units.csv` and `report.json`; multiset runs write one flat
//! CSV table.

pub mod common;
pub mod error;
pub mod report;
pub mod tables;

use std::path::{Path, PathBuf};

use kinrec_map::MatchOutcome;

pub use common::{
    DIAGNOSTICS_FILE, JOINED_FILE, REPORT_FILE, UNRECOGNIZED_FILE, ensure_output_dir,
    ensure_parent_dir,
};
pub use error::{OutputError, Result};
pub use report::{InputSummary, RunReport, write_report};
pub use tables::{
    UnrecognizedRow, unrecognized_rows, write_diagnostics, write_joined, write_multiset,
    write_unrecognized,
};

/// Paths of the files written by [`write_run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFiles {
    pub joined: PathBuf,
    pub diagnostics: PathBuf,
    pub unrecognized: PathBuf,
    pub report: PathBuf,
}

/// Writes every file of a matching run into `dir`.
pub fn write_run(dir: &Path, outcome: &MatchOutcome, report: &RunReport) -> Result<RunFiles> {
    let dir = ensure_output_dir(dir)?;
    let files = RunFiles {
        joined: dir.join(JOINED_FILE),
        diagnostics: dir.join(DIAGNOSTICS_FILE),
        unrecognized: dir.join(UNRECOGNIZED_FILE),
        report: dir.join(REPORT_FILE),
    };
    write_joined(&files.joined, &outcome.table)?;
    write_diagnostics(&files.diagnostics, &outcome.feedback)?;
    write_unrecognized(&files.unrecognized, &report.unrecognized_units)?;
    write_report(&files.report, report)?;
    Ok(files)
}
