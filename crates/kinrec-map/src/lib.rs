#![deny(unsafe_code)]

//! Record linkage for kinetic parameters.
//!
//! Leaves first: [`similarity`] scores single fields, [`scorer`] combines
//! them into the objective, [`assignment`] solves one group, [`join`] runs
//! the solver per group, and [`feedback`] explains the disagreements of the
//! matched pairs. [`multiset`] matches bare values without record identity.

pub mod assignment;
pub mod error;
pub mod feedback;
pub mod join;
pub mod multiset;
pub mod pipeline;
pub mod scorer;
pub mod similarity;

pub use assignment::{ScoreMatrix, solve, solve_matrix};
pub use error::{MatchError, Result, Side};
pub use feedback::{FeedbackGenerator, FeedbackReport, RowDiagnostic, classify};
pub use join::{JoinSummary, JoinedRow, JoinedTable, OBJECTIVE_COLUMN, join, partition};
pub use multiset::{
    MultisetMatch, MultisetOptions, field_kind, match_values, multiset_match, unique_values,
};
pub use pipeline::{MatchOutcome, match_records};
pub use scorer::{CompositeScore, CompositeScorer, Objective, ScoreComponent};
pub use similarity::{
    PowerTiers, categorical_equivalence, default_exponent_penalty, mantissa_exponent_similarity,
    mislabeled_unit_similarity, off_by_power_factor, off_by_power_similarity,
    parsed_value_similarity, relative_closeness, string_similarity, value_similarity,
};
