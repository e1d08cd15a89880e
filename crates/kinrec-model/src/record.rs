#![deny(unsafe_code)]

use std::collections::BTreeMap;
use std::fmt;

use crate::catalog::normalize_field_name;
use crate::value::FieldValue;

static ABSENT: FieldValue = FieldValue::Absent;

/// One extracted or reference record.
///
/// `index` is the record's position in the collection it was loaded from
/// and never changes, so joined output and unmatched reports can always
/// point back at the source row.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Record {
    pub index: usize,
    pub cells: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            cells: BTreeMap::new(),
        }
    }

    /// Cell for `field`; fields the record does not carry read as absent.
    pub fn get(&self, field: &str) -> &FieldValue {
        self.cells.get(field).unwrap_or(&ABSENT)
    }

    pub fn insert(&mut self, field: impl Into<String>, value: FieldValue) {
        self.cells.insert(field.into(), value);
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).as_text()
    }
}

/// An ordered collection of records sharing one schema.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecordSet {
    pub columns: Vec<String>,
    pub records: Vec<Record>,
}

impl RecordSet {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Appends a record, assigning it the next original index.
    pub fn push(&mut self, mut record: Record) {
        record.index = self.records.len();
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Column matching `name` exactly, else after field-name normalization
    /// (`"Kcat KM"` resolves to a `kcat_km` column).
    pub fn resolve_column(&self, name: &str) -> Option<&str> {
        if let Some(column) = self.columns.iter().find(|c| *c == name) {
            return Some(column);
        }
        let wanted = normalize_field_name(name);
        self.columns
            .iter()
            .find(|c| normalize_field_name(c) == wanted)
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    /// Record whose original index is `index`, wherever it sits in the set.
    pub fn get(&self, index: usize) -> Option<&Record> {
        match self.records.get(index) {
            Some(record) if record.index == index => Some(record),
            _ => self.records.iter().find(|record| record.index == index),
        }
    }

    /// Composite grouping key of `record` over the `group_by` fields.
    pub fn group_key(record: &Record, group_by: &[String]) -> GroupKey {
        GroupKey(
            group_by
                .iter()
                .map(|field| record.text(field).map(str::to_string))
                .collect(),
        )
    }
}

/// Composite partition key. A null component is an ordinary key value: it
/// only ever equals another null.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct GroupKey(pub Vec<Option<String>>);

impl GroupKey {
    pub fn parts(&self) -> &[Option<String>] {
        &self.0
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, part) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str("|")?;
            }
            match part {
                Some(value) => f.write_str(value)?,
                None => f.write_str("<null>")?,
            }
        }
        Ok(())
    }
}
