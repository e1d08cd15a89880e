pub mod catalog;
pub mod error;
pub mod matching;
pub mod options;
pub mod record;
pub mod units;
pub mod value;

pub use catalog::{FieldCatalog, FieldType, normalize_field_name};
pub use error::{ModelError, Result};
pub use matching::{Diagnostic, DiagnosticCode, JoinMode, MatchEdge};
pub use options::{MatchConfig, Suffixes};
pub use record::{GroupKey, Record, RecordSet};
pub use units::{QuantityKind, Unit};
pub use value::{FieldValue, ParsedValue, UnrecognizedUnit};
