//! Configuration options for record matching.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ModelError;
use crate::matching::JoinMode;
use crate::units::QuantityKind;

/// Column suffixes applied to fields present on both sides of a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suffixes {
    pub left: String,
    pub right: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            left: "_left".to_string(),
            right: "_right".to_string(),
        }
    }
}

/// Options controlling a matching run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Field weights of the composite objective.
    pub weights: BTreeMap<String, f64>,

    /// Fields whose values partition both inputs. Records are only ever
    /// compared within one partition.
    pub group_by: Vec<String>,

    /// Which one-sided partitions survive the join.
    pub join_mode: JoinMode,

    /// Quantity kinds for fields the built-in catalog does not know, or
    /// overrides for the ones it does.
    pub quantity_kind_per_field: BTreeMap<String, QuantityKind>,

    /// Base of the off-by-power check (10, or 60 for rate-heavy data).
    pub off_by_base: f64,

    pub suffixes: Suffixes,

    /// Relative closeness below which a matched pair reports a value deviation.
    pub deviation_threshold: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            weights: BTreeMap::new(),
            group_by: Vec::new(),
            join_mode: JoinMode::default(),
            quantity_kind_per_field: BTreeMap::new(),
            off_by_base: 10.0,
            suffixes: Suffixes::default(),
            deviation_threshold: 0.98,
        }
    }
}

impl MatchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_weight(mut self, field: impl Into<String>, weight: f64) -> Self {
        self.weights.insert(field.into(), weight);
        self
    }

    #[must_use]
    pub fn with_group_by(mut self, fields: Vec<String>) -> Self {
        self.group_by = fields;
        self
    }

    #[must_use]
    pub fn with_join_mode(mut self, mode: JoinMode) -> Self {
        self.join_mode = mode;
        self
    }

    #[must_use]
    pub fn with_off_by_base(mut self, base: f64) -> Self {
        self.off_by_base = base;
        self
    }

    /// Rejects configurations that would silently produce a wrong objective.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (field, weight) in &self.weights {
            if field.trim().is_empty() {
                return Err(ModelError::InvalidFieldName(field.clone()));
            }
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ModelError::InvalidConfig(format!(
                    "weight for {field:?} must be a finite non-negative number, got {weight}"
                )));
            }
        }
        for field in &self.group_by {
            if field.trim().is_empty() {
                return Err(ModelError::InvalidFieldName(field.clone()));
            }
        }
        if !self.off_by_base.is_finite() || self.off_by_base <= 1.0 {
            return Err(ModelError::InvalidConfig(format!(
                "off_by_base must be greater than 1, got {}",
                self.off_by_base
            )));
        }
        if !(self.deviation_threshold > 0.0 && self.deviation_threshold <= 1.0) {
            return Err(ModelError::InvalidConfig(format!(
                "deviation_threshold must be in (0, 1], got {}",
                self.deviation_threshold
            )));
        }
        if self.suffixes.left == self.suffixes.right {
            return Err(ModelError::InvalidConfig(
                "left and right suffixes must differ".to_string(),
            ));
        }
        Ok(())
    }
}
