//! JSON run report.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use kinrec_map::{JoinSummary, MatchOutcome};
use kinrec_model::{MatchConfig, RecordSet};
use serde::Serialize;

use crate::common::ensure_parent_dir;
use crate::error::{OutputError, Result};
use crate::tables::UnrecognizedRow;

/// Shape of one input file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InputSummary {
    pub path: String,
    pub records: usize,
    pub columns: Vec<String>,
}

impl InputSummary {
    pub fn new(path: &Path, set: &RecordSet) -> Self {
        Self {
            path: path.display().to_string(),
            records: set.len(),
            columns: set.columns.clone(),
        }
    }
}

/// Everything needed to reproduce and audit a matching run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub config: MatchConfig,
    pub left: InputSummary,
    pub right: InputSummary,
    pub summary: JoinSummary,
    /// Diagnostics per code kind.
    pub feedback: BTreeMap<String, usize>,
    pub unrecognized_units: Vec<UnrecognizedRow>,
}

impl RunReport {
    pub fn new(
        config: &MatchConfig,
        left: InputSummary,
        right: InputSummary,
        outcome: &MatchOutcome,
        unrecognized_units: Vec<UnrecognizedRow>,
    ) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            config: config.clone(),
            left,
            right,
            summary: outcome.table.summary(),
            feedback: outcome
                .feedback
                .counts()
                .into_iter()
                .map(|(kind, count)| (kind.to_string(), count))
                .collect(),
            unrecognized_units,
        }
    }
}

pub fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(report).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    })
}
