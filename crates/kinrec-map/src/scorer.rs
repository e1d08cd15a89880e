//! Composite scoring of record pairs.
//!
//! The composite score is the weighted sum of per-field similarities. Field
//! comparison semantics come from the [`FieldCatalog`]; only the weights are
//! configurable.

use std::collections::BTreeMap;

use kinrec_model::{FieldCatalog, FieldType, FieldValue, MatchConfig, ParsedValue, Record, RecordSet};
use kinrec_normalization::parse_value_and_unit;

use crate::error::{MatchError, Result, Side};
use crate::similarity::{categorical_equivalence, parsed_value_similarity, string_similarity};

/// Objective maximized by the assignment solver.
pub trait Objective: Sync {
    fn score(&self, left: &Record, right: &Record) -> f64;
}

impl<F> Objective for F
where
    F: Fn(&Record, &Record) -> f64 + Sync,
{
    fn score(&self, left: &Record, right: &Record) -> f64 {
        self(left, right)
    }
}

/// A weighted field resolved against both schemas.
#[derive(Debug, Clone)]
struct WeightedField {
    name: String,
    left_column: String,
    right_column: String,
    weight: f64,
    field_type: FieldType,
}

/// Contribution of one field to a composite score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreComponent {
    pub field: String,
    pub weight: f64,
    pub similarity: f64,
}

/// A composite score with its per-field breakdown.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeScore {
    pub total: f64,
    pub components: Vec<ScoreComponent>,
}

impl CompositeScore {
    /// Human-readable breakdown, `field: similarity×weight` per field.
    pub fn explain(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{}: {:.2}×{}", c.field, c.similarity, c.weight))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Weighted-sum objective over typed record fields.
#[derive(Debug, Clone)]
pub struct CompositeScorer {
    fields: Vec<WeightedField>,
    off_by_base: f64,
}

impl CompositeScorer {
    /// Resolves every weighted field against both schemas.
    ///
    /// A weighted field missing from either side is an error, never a
    /// silent zero.
    pub fn new(
        weights: &BTreeMap<String, f64>,
        left: &RecordSet,
        right: &RecordSet,
        catalog: &FieldCatalog,
        off_by_base: f64,
    ) -> Result<Self> {
        let mut fields = Vec::with_capacity(weights.len());
        for (name, weight) in weights {
            let left_column = left
                .resolve_column(name)
                .ok_or_else(|| MatchError::UnknownWeightField {
                    field: name.clone(),
                    side: Side::Left,
                })?;
            let right_column = right
                .resolve_column(name)
                .ok_or_else(|| MatchError::UnknownWeightField {
                    field: name.clone(),
                    side: Side::Right,
                })?;
            fields.push(WeightedField {
                name: name.clone(),
                left_column: left_column.to_string(),
                right_column: right_column.to_string(),
                weight: *weight,
                field_type: catalog.field_type(name),
            });
        }
        Ok(Self { fields, off_by_base })
    }

    /// Builds a scorer from a validated configuration.
    pub fn from_config(config: &MatchConfig, left: &RecordSet, right: &RecordSet) -> Result<Self> {
        config.validate()?;
        let catalog = FieldCatalog::builtin().with_quantity_kinds(&config.quantity_kind_per_field);
        Self::new(&config.weights, left, right, &catalog, config.off_by_base)
    }

    /// Names of the weighted fields, in weight-map order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    pub fn score(&self, left: &Record, right: &Record) -> f64 {
        self.fields
            .iter()
            .map(|field| field.weight * self.similarity(field, left, right))
            .sum()
    }

    /// [`score`](Self::score) with the per-field breakdown.
    pub fn explain(&self, left: &Record, right: &Record) -> CompositeScore {
        let components: Vec<ScoreComponent> = self
            .fields
            .iter()
            .map(|field| ScoreComponent {
                field: field.name.clone(),
                weight: field.weight,
                similarity: self.similarity(field, left, right),
            })
            .collect();
        let total = components.iter().map(|c| c.weight * c.similarity).sum();
        CompositeScore { total, components }
    }

    fn similarity(&self, field: &WeightedField, left: &Record, right: &Record) -> f64 {
        let a = left.get(&field.left_column);
        let b = right.get(&field.right_column);
        match field.field_type {
            FieldType::Quantity(kind) => {
                let a = quantity_of(a);
                let b = quantity_of(b);
                parsed_value_similarity(a.as_ref(), b.as_ref(), kind, self.off_by_base)
            }
            FieldType::Text => string_similarity(a.as_text(), b.as_text()),
            FieldType::Mutation => categorical_equivalence(a.as_text(), b.as_text()),
        }
    }
}

impl Objective for CompositeScorer {
    fn score(&self, left: &Record, right: &Record) -> f64 {
        CompositeScorer::score(self, left, right)
    }
}

/// Parsed value of a cell. Text cells in a quantity field are parsed on the
/// fly so records built without a catalog still compare numerically.
pub(crate) fn quantity_of(value: &FieldValue) -> Option<ParsedValue> {
    match value {
        FieldValue::Quantity { parsed, .. } => Some(*parsed),
        FieldValue::Text(text) => Some(parse_value_and_unit(text)),
        FieldValue::Absent => None,
    }
}
