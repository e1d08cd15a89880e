//! Parsed measurement values and typed cell values.

use serde::{Deserialize, Serialize};

use crate::units::Unit;

/// Result of parsing a free-text measurement string.
///
/// A value whose mantissa could not be located is represented by a NaN
/// mantissa; use [`ParsedValue::is_missing`] or [`ParsedValue::value`]
/// rather than inspecting the mantissa directly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParsedValue {
    /// Mantissa with any scientific-notation exponent already applied.
    pub mantissa: f64,
    /// Recognized unit, if any.
    pub unit: Option<Unit>,
    /// Significant digits of the mantissa token. Informational only.
    pub precision: Option<u32>,
    /// The text carried a unit that matched no known token.
    #[serde(default)]
    pub unrecognized_unit: bool,
}

impl ParsedValue {
    pub fn new(mantissa: f64, unit: Option<Unit>) -> Self {
        Self {
            mantissa,
            unit,
            precision: None,
            unrecognized_unit: false,
        }
    }

    /// The "no value" sentinel.
    pub fn missing() -> Self {
        Self {
            mantissa: f64::NAN,
            unit: None,
            precision: None,
            unrecognized_unit: false,
        }
    }

    pub fn is_missing(&self) -> bool {
        !self.mantissa.is_finite()
    }

    /// The mantissa, or `None` for the "no value" sentinel.
    pub fn value(&self) -> Option<f64> {
        if self.is_missing() {
            None
        } else {
            Some(self.mantissa)
        }
    }

    #[must_use]
    pub fn with_precision(mut self, precision: Option<u32>) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub fn with_unrecognized_unit(mut self, unrecognized: bool) -> Self {
        self.unrecognized_unit = unrecognized;
        self
    }
}

/// A typed record cell.
///
/// Quantity cells keep the raw text next to the parsed value so that
/// output can reproduce the source exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    Text(String),
    Quantity { raw: String, parsed: ParsedValue },
    Absent,
}

impl FieldValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, FieldValue::Absent)
    }

    /// Source text of the cell, for both textual and quantity cells.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Quantity { raw, .. } => Some(raw),
            FieldValue::Absent => None,
        }
    }

    pub fn parsed(&self) -> Option<&ParsedValue> {
        match self {
            FieldValue::Quantity { parsed, .. } => Some(parsed),
            _ => None,
        }
    }
}

/// A unit token that was present in a measurement string but not recognized.
///
/// Collected and returned to the caller instead of being accumulated in
/// process-wide state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnrecognizedUnit {
    /// Field the value came from (empty when parsed outside a record).
    pub field: String,
    /// Full source text.
    pub text: String,
    /// Text left over after the mantissa and exponent were removed.
    pub remainder: String,
}
