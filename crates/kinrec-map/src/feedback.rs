//! Classification of disagreements between matched values.

use std::collections::BTreeMap;

use kinrec_model::{
    Diagnostic, DiagnosticCode, FieldCatalog, FieldValue, GroupKey, QuantityKind, Record,
    RecordSet,
};
use kinrec_normalization::canonical_value;
use serde::Serialize;
use tracing::debug;

use crate::join::JoinedTable;
use crate::scorer::quantity_of;
use crate::similarity::{
    MISLABELED_UNIT_CAP, mislabeled_unit_similarity, off_by_power_factor, relative_closeness,
};

/// A diagnostic located in a joined table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowDiagnostic {
    /// Row position in the joined table.
    pub row: usize,
    pub group: GroupKey,
    pub left_index: usize,
    pub right_index: usize,
    #[serde(flatten)]
    pub diagnostic: Diagnostic,
}

/// All diagnostics of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedbackReport {
    pub diagnostics: Vec<RowDiagnostic>,
}

impl FeedbackReport {
    /// Number of diagnostics per code kind (`wrong_unit`, `off_by_factor`,
    /// `value_deviation`).
    pub fn counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.diagnostics {
            *counts.entry(entry.diagnostic.code.kind()).or_insert(0) += 1;
        }
        counts
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

#[derive(Debug, Clone)]
struct DiagnosedField {
    /// Left column name; also the reported field name.
    left_column: String,
    right_column: String,
    kind: QuantityKind,
}

/// Diagnoses numeric fields of matched pairs.
#[derive(Debug, Clone)]
pub struct FeedbackGenerator {
    fields: Vec<DiagnosedField>,
    base: f64,
    deviation_threshold: f64,
}

impl FeedbackGenerator {
    /// Diagnoses every quantity field that both schemas carry.
    pub fn new(
        left: &RecordSet,
        right: &RecordSet,
        catalog: &FieldCatalog,
        base: f64,
        deviation_threshold: f64,
    ) -> Self {
        let fields = left
            .columns
            .iter()
            .filter_map(|column| {
                let kind = catalog.quantity_kind(column)?;
                let right_column = right.resolve_column(column)?;
                Some(DiagnosedField {
                    left_column: column.clone(),
                    right_column: right_column.to_string(),
                    kind,
                })
            })
            .collect();
        Self {
            fields,
            base,
            deviation_threshold,
        }
    }

    /// Names of the diagnosed fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.left_column.as_str())
    }

    /// Diagnostics for one matched pair.
    pub fn diagnose_pair(&self, left: &Record, right: &Record) -> Vec<Diagnostic> {
        self.fields
            .iter()
            .filter_map(|field| {
                let code = diagnose_values(
                    left.get(&field.left_column),
                    right.get(&field.right_column),
                    field.kind,
                    self.base,
                    self.deviation_threshold,
                )?;
                Some(Diagnostic {
                    field: field.left_column.clone(),
                    code,
                })
            })
            .collect()
    }

    /// Diagnoses every matched row of `table`.
    pub fn run(&self, table: &JoinedTable, left: &RecordSet, right: &RecordSet) -> FeedbackReport {
        let mut report = FeedbackReport::default();
        for (row, joined) in table.rows.iter().enumerate() {
            let (Some(left_index), Some(right_index)) = (joined.left_index, joined.right_index)
            else {
                continue;
            };
            let (Some(left_record), Some(right_record)) =
                (left.get(left_index), right.get(right_index))
            else {
                continue;
            };
            for diagnostic in self.diagnose_pair(left_record, right_record) {
                report.diagnostics.push(RowDiagnostic {
                    row,
                    group: joined.group.clone(),
                    left_index,
                    right_index,
                    diagnostic,
                });
            }
        }
        debug!(diagnostics = report.len(), "feedback generated");
        report
    }
}

/// Unparseable or absent values yield no diagnostic.
fn diagnose_values(
    left: &FieldValue,
    right: &FieldValue,
    kind: QuantityKind,
    base: f64,
    deviation_threshold: f64,
) -> Option<DiagnosticCode> {
    let a = quantity_of(left)?;
    let b = quantity_of(right)?;
    let a_value = canonical_value(&a, kind)?;
    let b_value = canonical_value(&b, kind)?;
    classify(a.mantissa, b.mantissa, a_value, b_value, base, deviation_threshold)
}

/// Classifies one disagreement, in priority order: off by a power of
/// `base`, wrong unit, value deviation. `None` when the values agree.
pub fn classify(
    a_mantissa: f64,
    b_mantissa: f64,
    a_value: f64,
    b_value: f64,
    base: f64,
    deviation_threshold: f64,
) -> Option<DiagnosticCode> {
    if let Some(factor) = off_by_power_factor(a_value, b_value, base) {
        return Some(DiagnosticCode::OffByFactor(factor));
    }
    let closeness = relative_closeness(a_value, b_value);
    let mislabeled = mislabeled_unit_similarity(a_mantissa, b_mantissa, MISLABELED_UNIT_CAP);
    if mislabeled > closeness {
        return Some(DiagnosticCode::WrongUnit);
    }
    if closeness < deviation_threshold {
        return Some(DiagnosticCode::ValueDeviation(1.0 - closeness));
    }
    None
}
