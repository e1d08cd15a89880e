//! Typed record construction from raw table cells.

use kinrec_model::{
    FieldCatalog, FieldType, FieldValue, Record, RecordSet, UnrecognizedUnit,
};

use crate::numeric::parse_measurement;

/// Cell spellings that mean "no value".
pub const NULL_LIKE: &[&str] = &["", "na", "n/a", "null", "none", "nan", "-"];

pub fn is_null_like(cell: &str) -> bool {
    let trimmed = cell.trim();
    NULL_LIKE
        .iter()
        .any(|null| trimmed.eq_ignore_ascii_case(null))
}

/// Builds one typed record from parallel column names and cells.
///
/// Quantity cells are parsed at construction; a cell whose mantissa cannot be
/// found keeps its raw text with the missing sentinel. Unit text that was not
/// recognized is returned rather than dropped.
pub fn build_record<C, R, V>(
    index: usize,
    columns: &[C],
    row: R,
    catalog: &FieldCatalog,
) -> (Record, Vec<UnrecognizedUnit>)
where
    C: AsRef<str>,
    R: IntoIterator<Item = V>,
    V: AsRef<str>,
{
    let mut record = Record::new(index);
    let mut unrecognized = Vec::new();

    for (column, cell) in columns.iter().zip(row) {
        let field = column.as_ref().trim();
        let raw = cell.as_ref().trim();
        let value = if is_null_like(raw) {
            FieldValue::Absent
        } else {
            match catalog.field_type(field) {
                FieldType::Quantity(_) => {
                    let outcome = parse_measurement(raw, 10.0);
                    if let Some(remainder) = outcome.unrecognized {
                        unrecognized.push(UnrecognizedUnit {
                            field: field.to_string(),
                            text: raw.to_string(),
                            remainder,
                        });
                    }
                    FieldValue::Quantity {
                        raw: raw.to_string(),
                        parsed: outcome.value,
                    }
                }
                FieldType::Text | FieldType::Mutation => FieldValue::Text(raw.to_string()),
            }
        };
        record.insert(field, value);
    }

    (record, unrecognized)
}

/// Builds a record set, numbering records in row order.
pub fn build_record_set<C, I, R, V>(
    columns: &[C],
    rows: I,
    catalog: &FieldCatalog,
) -> (RecordSet, Vec<UnrecognizedUnit>)
where
    C: AsRef<str>,
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = V>,
    V: AsRef<str>,
{
    let names = columns
        .iter()
        .map(|column| column.as_ref().trim().to_string())
        .collect();
    let mut set = RecordSet::new(names);
    let mut unrecognized = Vec::new();

    for (index, row) in rows.into_iter().enumerate() {
        let (record, mut units) = build_record(index, columns, row, catalog);
        set.push(record);
        unrecognized.append(&mut units);
    }

    (set, unrecognized)
}
