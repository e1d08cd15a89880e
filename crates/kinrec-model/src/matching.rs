//! Assignment results and disagreement diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ModelError;

/// One slot of an assignment solution.
///
/// Exactly one side is `None` when the slot pairs a real record with
/// padding, i.e. the record has no counterpart. Indices are positions in
/// the inputs handed to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchEdge {
    pub left_index: Option<usize>,
    pub right_index: Option<usize>,
    pub score: f64,
}

impl MatchEdge {
    pub fn is_matched(&self) -> bool {
        self.left_index.is_some() && self.right_index.is_some()
    }
}

/// Why two matched values disagree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", content = "value", rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// Same digits, different unit.
    WrongUnit,
    /// Values differ by an integer power of the configured base.
    OffByFactor(f64),
    /// Values differ by the given relative error.
    ValueDeviation(f64),
}

impl DiagnosticCode {
    pub fn kind(&self) -> &'static str {
        match self {
            DiagnosticCode::WrongUnit => "wrong_unit",
            DiagnosticCode::OffByFactor(_) => "off_by_factor",
            DiagnosticCode::ValueDeviation(_) => "value_deviation",
        }
    }

    /// Factor or relative error carried by the code.
    pub fn magnitude(&self) -> Option<f64> {
        match self {
            DiagnosticCode::WrongUnit => None,
            DiagnosticCode::OffByFactor(factor) => Some(*factor),
            DiagnosticCode::ValueDeviation(error) => Some(*error),
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCode::WrongUnit => f.write_str("wrong_unit"),
            DiagnosticCode::OffByFactor(factor) => write!(f, "off_by_{factor}"),
            DiagnosticCode::ValueDeviation(error) => {
                write!(f, "value_deviation_{:.1}%", error * 100.0)
            }
        }
    }
}

/// A diagnostic attached to one field of a matched pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub field: String,
    pub code: DiagnosticCode,
}

/// Which one-sided groups a grouped join keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinMode {
    Inner,
    Left,
    Right,
    #[default]
    Outer,
}

impl JoinMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinMode::Inner => "inner",
            JoinMode::Left => "left",
            JoinMode::Right => "right",
            JoinMode::Outer => "outer",
        }
    }

    /// Whether groups present only on the left side are emitted.
    pub fn keeps_left_only(&self) -> bool {
        matches!(self, JoinMode::Left | JoinMode::Outer)
    }

    /// Whether groups present only on the right side are emitted.
    pub fn keeps_right_only(&self) -> bool {
        matches!(self, JoinMode::Right | JoinMode::Outer)
    }
}

impl fmt::Display for JoinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinMode {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinMode::Inner),
            "left" => Ok(JoinMode::Left),
            "right" => Ok(JoinMode::Right),
            "outer" | "full" => Ok(JoinMode::Outer),
            _ => Err(ModelError::UnknownJoinMode(s.to_string())),
        }
    }
}
