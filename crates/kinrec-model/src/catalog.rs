//! Field catalog: how each field of a kinetic record is compared.
//!
//! The comparison semantics of a field are domain knowledge, so dispatch is
//! a fixed lookup by field name. Configuration may only add quantity fields
//! or change the quantity kind of an existing one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::units::QuantityKind;

/// Comparison family of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "kind", rename_all = "lowercase")]
pub enum FieldType {
    /// Numeric measurement with a unit.
    Quantity(QuantityKind),
    /// Free text compared by edit distance (names, organisms, accessions).
    Text,
    /// Mutation code or wildtype marker.
    Mutation,
}

const BUILTIN_FIELDS: &[(&str, FieldType)] = &[
    ("kcat", FieldType::Quantity(QuantityKind::Rate)),
    ("turnover_number", FieldType::Quantity(QuantityKind::Rate)),
    ("km", FieldType::Quantity(QuantityKind::Concentration)),
    ("ki", FieldType::Quantity(QuantityKind::Concentration)),
    ("kd", FieldType::Quantity(QuantityKind::Concentration)),
    ("ic50", FieldType::Quantity(QuantityKind::Concentration)),
    ("kcat_km", FieldType::Quantity(QuantityKind::Specificity)),
    ("kcat/km", FieldType::Quantity(QuantityKind::Specificity)),
    ("specificity_constant", FieldType::Quantity(QuantityKind::Specificity)),
    ("enzyme", FieldType::Text),
    ("enzyme_name", FieldType::Text),
    ("substrate", FieldType::Text),
    ("organism", FieldType::Text),
    ("uniprot", FieldType::Text),
    ("ec", FieldType::Text),
    ("mutant", FieldType::Mutation),
    ("mutation", FieldType::Mutation),
    ("variant", FieldType::Mutation),
];

/// Lookup from field name to [`FieldType`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCatalog {
    entries: BTreeMap<String, FieldType>,
}

impl Default for FieldCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FieldCatalog {
    /// The built-in catalog of kinetic record fields.
    pub fn builtin() -> Self {
        let entries = BUILTIN_FIELDS
            .iter()
            .map(|(name, field_type)| ((*name).to_string(), *field_type))
            .collect();
        Self { entries }
    }

    /// Adds quantity fields or overrides the kind of existing ones.
    #[must_use]
    pub fn with_quantity_kinds(mut self, kinds: &BTreeMap<String, QuantityKind>) -> Self {
        for (field, kind) in kinds {
            self.entries
                .insert(normalize_field_name(field), FieldType::Quantity(*kind));
        }
        self
    }

    /// Type of `field`. Fields the catalog does not know compare as text.
    pub fn field_type(&self, field: &str) -> FieldType {
        self.entries
            .get(&normalize_field_name(field))
            .copied()
            .unwrap_or(FieldType::Text)
    }

    pub fn quantity_kind(&self, field: &str) -> Option<QuantityKind> {
        match self.field_type(field) {
            FieldType::Quantity(kind) => Some(kind),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, FieldType)> {
        self.entries.iter().map(|(name, ty)| (name.as_str(), *ty))
    }
}

/// Lowercases and maps separators to `_` so that `"kcat KM"`,
/// `"kcat-km"` and `"kcat_km"` resolve to the same catalog entry.
pub fn normalize_field_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
