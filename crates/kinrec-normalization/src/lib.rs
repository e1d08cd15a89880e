//! Measurement normalization for kinetic records.
//!
//! Parsing is total: every string yields a [`kinrec_model::ParsedValue`],
//! possibly the missing sentinel. Unit tables are static and read-only.

pub mod convert;
pub mod numeric;
pub mod records;
pub mod units;

pub use convert::{canonical_value, convert_to_true_value};
pub use numeric::{
    ParseOutcome, parse_measurement, parse_value_and_unit, parse_value_and_unit_with_base,
};
pub use records::{NULL_LIKE, build_record, build_record_set, is_null_like};
pub use units::{Scale, UNIT_TOKENS, multiplier, scale, tidy_unit_text, units_of_kind};
