//! CSV writers for joined tables, diagnostics and multiset matches.

use std::path::Path;

use kinrec_map::{FeedbackReport, JoinedTable, MultisetMatch, Side};
use kinrec_model::UnrecognizedUnit;
use serde::Serialize;
use tracing::debug;

use crate::common::{csv_error, csv_writer, flush, index_cell, number_cell};
use crate::error::Result;

/// Writes `left_index`, `right_index`, then every column of the table.
/// Absent cells and indices are empty.
pub fn write_joined(path: &Path, table: &JoinedTable) -> Result<()> {
    let mut writer = csv_writer(path)?;
    let mut header = vec!["left_index".to_string(), "right_index".to_string()];
    header.extend(table.columns.iter().cloned());
    writer
        .write_record(&header)
        .map_err(|e| csv_error(path, e))?;

    for row in &table.rows {
        let mut record = vec![index_cell(row.left_index), index_cell(row.right_index)];
        record.extend(
            table
                .columns
                .iter()
                .map(|column| row.cell_text(column).unwrap_or_default()),
        );
        writer
            .write_record(&record)
            .map_err(|e| csv_error(path, e))?;
    }
    flush(writer, path)?;
    debug!(path = %path.display(), rows = table.rows.len(), "joined table written");
    Ok(())
}

/// One row per diagnostic. `code` is the code kind; `factor` carries the
/// power-of-base factor or the relative error, empty for a wrong unit.
pub fn write_diagnostics(path: &Path, report: &FeedbackReport) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer
        .write_record([
            "row",
            "group",
            "left_index",
            "right_index",
            "field",
            "code",
            "factor",
        ])
        .map_err(|e| csv_error(path, e))?;

    for entry in &report.diagnostics {
        let code = &entry.diagnostic.code;
        writer
            .write_record([
                entry.row.to_string(),
                entry.group.to_string(),
                entry.left_index.to_string(),
                entry.right_index.to_string(),
                entry.diagnostic.field.clone(),
                code.kind().to_string(),
                number_cell(code.magnitude()),
            ])
            .map_err(|e| csv_error(path, e))?;
    }
    flush(writer, path)?;
    debug!(path = %path.display(), rows = report.len(), "diagnostics written");
    Ok(())
}

/// An unrecognized unit tagged with the input it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnrecognizedRow {
    pub side: String,
    pub field: String,
    pub text: String,
    pub remainder: String,
}

impl UnrecognizedRow {
    pub fn new(side: Side, unit: &UnrecognizedUnit) -> Self {
        Self {
            side: side.to_string(),
            field: unit.field.clone(),
            text: unit.text.clone(),
            remainder: unit.remainder.clone(),
        }
    }
}

/// Left units first, then right units, each in input order.
pub fn unrecognized_rows(
    left: &[UnrecognizedUnit],
    right: &[UnrecognizedUnit],
) -> Vec<UnrecognizedRow> {
    left.iter()
        .map(|unit| UnrecognizedRow::new(Side::Left, unit))
        .chain(right.iter().map(|unit| UnrecognizedRow::new(Side::Right, unit)))
        .collect()
}

pub fn write_unrecognized(path: &Path, rows: &[UnrecognizedRow]) -> Result<()> {
    let mut writer = csv_writer(path)?;
    if rows.is_empty() {
        writer
            .write_record(["side", "field", "text", "remainder"])
            .map_err(|e| csv_error(path, e))?;
    }
    for row in rows {
        writer.serialize(row).map_err(|e| csv_error(path, e))?;
    }
    flush(writer, path)
}

pub fn write_multiset(path: &Path, rows: &[MultisetMatch]) -> Result<()> {
    let mut writer = csv_writer(path)?;
    writer
        .write_record([
            "group",
            "field",
            "kind",
            "value_left",
            "value_right",
            "similarity",
            "ratio",
        ])
        .map_err(|e| csv_error(path, e))?;

    for row in rows {
        writer
            .write_record([
                row.group.to_string(),
                row.field.clone(),
                row.kind.to_string(),
                number_cell(row.value_left),
                number_cell(row.value_right),
                row.similarity.to_string(),
                number_cell(row.ratio),
            ])
            .map_err(|e| csv_error(path, e))?;
    }
    flush(writer, path)?;
    debug!(path = %path.display(), rows = rows.len(), "multiset matches written");
    Ok(())
}
