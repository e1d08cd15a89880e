//! One complete matching run: score, join, diagnose.

use kinrec_model::{FieldCatalog, MatchConfig, RecordSet};

use crate::error::Result;
use crate::feedback::{FeedbackGenerator, FeedbackReport};
use crate::join::{JoinedTable, join};
use crate::scorer::CompositeScorer;

/// Joined table and the diagnostics of its matched pairs.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub table: JoinedTable,
    pub feedback: FeedbackReport,
}

/// Runs the grouped join with the composite scorer described by `config`,
/// then diagnoses every matched pair.
pub fn match_records(
    left: &RecordSet,
    right: &RecordSet,
    config: &MatchConfig,
) -> Result<MatchOutcome> {
    config.validate()?;
    let catalog = FieldCatalog::builtin().with_quantity_kinds(&config.quantity_kind_per_field);
    let scorer = CompositeScorer::new(&config.weights, left, right, &catalog, config.off_by_base)?;
    let table = join(
        left,
        right,
        &scorer,
        &config.group_by,
        config.join_mode,
        &config.suffixes,
    )?;
    let feedback = FeedbackGenerator::new(
        left,
        right,
        &catalog,
        config.off_by_base,
        config.deviation_threshold,
    )
    .run(&table, left, right);
    Ok(MatchOutcome { table, feedback })
}
