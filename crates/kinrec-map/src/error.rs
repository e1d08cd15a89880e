//! Error types for matching operations.

use std::fmt;

use kinrec_model::ModelError;

/// Which input of a match a column or record belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Errors from matching operations.
///
/// These are caller errors: a misspelled weight or key would otherwise
/// silently score every comparison as zero.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("weighted field {field:?} is not a column of the {side} record set")]
    UnknownWeightField { field: String, side: Side },

    #[error("field {field:?} is not a column of the {side} record set")]
    UnknownField { field: String, side: Side },

    #[error("group key {field:?} is not a column of the {side} record set")]
    UnknownGroupKey { field: String, side: Side },

    #[error("field {field:?} is not a quantity field")]
    NotAQuantity { field: String },

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, MatchError>;
