//! Typed record sets from CSV files.

use std::collections::BTreeMap;
use std::path::Path;

use kinrec_model::{FieldCatalog, RecordSet, UnrecognizedUnit};
use kinrec_normalization::build_record_set;
use tracing::{info, warn};

use crate::csv_table::{CsvTable, read_csv_table};
use crate::error::Result;

/// A record set together with the unit tokens its values used but the
/// normalizer did not recognize.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRecords {
    pub set: RecordSet,
    pub unrecognized: Vec<UnrecognizedUnit>,
}

/// Converts raw cells into typed records.
pub fn records_from_table(table: &CsvTable, catalog: &FieldCatalog) -> LoadedRecords {
    let (set, unrecognized) = build_record_set(&table.headers, &table.rows, catalog);
    LoadedRecords { set, unrecognized }
}

/// Loads the CSV file at `path` as a typed record set.
///
/// Unrecognized units are not errors: their values pass through unscaled
/// and each distinct token is logged once.
pub fn load_record_set(path: &Path, catalog: &FieldCatalog) -> Result<LoadedRecords> {
    let table = read_csv_table(path)?;
    let loaded = records_from_table(&table, catalog);

    for ((field, remainder), occurrences) in distinct_unrecognized(&loaded.unrecognized) {
        warn!(
            path = %path.display(),
            field,
            unit = remainder,
            occurrences,
            "unrecognized unit, value used as canonical"
        );
    }
    info!(
        path = %path.display(),
        records = loaded.set.len(),
        columns = loaded.set.columns.len(),
        unrecognized = loaded.unrecognized.len(),
        "record set loaded"
    );
    Ok(loaded)
}

/// Occurrences per `(field, unit token)`.
pub fn distinct_unrecognized(units: &[UnrecognizedUnit]) -> BTreeMap<(&str, &str), usize> {
    let mut counts = BTreeMap::new();
    for unit in units {
        *counts
            .entry((unit.field.as_str(), unit.remainder.as_str()))
            .or_insert(0) += 1;
    }
    counts
}
