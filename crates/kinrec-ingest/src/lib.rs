//! Kinetic record ingestion.
//!
//! Loads extracted or reference records from CSV files into typed
//! [`RecordSet`](kinrec_model::RecordSet)s. Measurement cells are parsed at
//! load time; unit tokens the normalizer does not know are returned next to
//! the records rather than failing the load.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use kinrec_ingest::load_record_set;
//! use kinrec_model::FieldCatalog;
//!
//! let loaded = load_record_set(Path::new("extracted.csv"), &FieldCatalog::builtin())?;
//! println!("{} records", loaded.set.len());
//! ```

mod csv_table;
mod error;
mod records;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv_table::{CsvTable, read_csv_from, read_csv_table};

// === Typed Records ===
pub use records::{LoadedRecords, distinct_unrecognized, load_record_set, records_from_table};
