//! Pipeline stages behind the `match` and `multiset` commands.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use kinrec_ingest::{LoadedRecords, load_record_set};
use kinrec_map::{
    MatchOutcome, MultisetMatch, MultisetOptions, field_kind, match_records, multiset_match,
};
use kinrec_model::{FieldCatalog, MatchConfig, QuantityKind};
use kinrec_output::{
    InputSummary, RunFiles, RunReport, unrecognized_rows, write_multiset, write_run,
};
use tracing::{info, info_span};

/// Inputs of one matching run.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub left: PathBuf,
    pub right: PathBuf,
    pub config: MatchConfig,
    pub output_dir: PathBuf,
}

/// Everything a matching run produced.
#[derive(Debug, Clone)]
pub struct MatchRun {
    pub outcome: MatchOutcome,
    pub report: RunReport,
    pub files: RunFiles,
}

/// Inputs of one multiset run.
#[derive(Debug, Clone)]
pub struct MultisetRequest {
    pub left: PathBuf,
    pub right: PathBuf,
    pub field: String,
    /// Taken from the field catalog when `None`.
    pub kind: Option<QuantityKind>,
    pub group_by: Vec<String>,
    pub options: MultisetOptions,
    pub output: PathBuf,
}

#[derive(Debug, Clone)]
pub struct MultisetRun {
    pub kind: QuantityKind,
    pub rows: Vec<MultisetMatch>,
    pub output: PathBuf,
}

fn load_pair(
    left: &Path,
    right: &Path,
    catalog: &FieldCatalog,
) -> Result<(LoadedRecords, LoadedRecords)> {
    let span = info_span!("ingest", left = %left.display(), right = %right.display());
    let _guard = span.enter();
    let start = Instant::now();
    let left_records = load_record_set(left, catalog)
        .with_context(|| format!("load left records {}", left.display()))?;
    let right_records = load_record_set(right, catalog)
        .with_context(|| format!("load right records {}", right.display()))?;
    info!(
        left_records = left_records.set.len(),
        right_records = right_records.set.len(),
        duration_ms = start.elapsed().as_millis(),
        "ingest complete"
    );
    Ok((left_records, right_records))
}

/// Loads both inputs, matches them and writes the run directory.
pub fn run_match(request: &MatchRequest) -> Result<MatchRun> {
    let config = &request.config;
    let catalog = FieldCatalog::builtin().with_quantity_kinds(&config.quantity_kind_per_field);
    let (left, right) = load_pair(&request.left, &request.right, &catalog)?;

    let outcome = info_span!("match").in_scope(|| -> Result<MatchOutcome> {
        let start = Instant::now();
        let outcome =
            match_records(&left.set, &right.set, config).context("match record sets")?;
        let summary = outcome.table.summary();
        info!(
            matched = summary.matched,
            left_only = summary.left_only,
            right_only = summary.right_only,
            diagnostics = outcome.feedback.len(),
            duration_ms = start.elapsed().as_millis(),
            "match complete"
        );
        Ok(outcome)
    })?;

    let report = RunReport::new(
        config,
        InputSummary::new(&request.left, &left.set),
        InputSummary::new(&request.right, &right.set),
        &outcome,
        unrecognized_rows(&left.unrecognized, &right.unrecognized),
    );
    let files = info_span!("output", dir = %request.output_dir.display()).in_scope(|| {
        write_run(&request.output_dir, &outcome, &report)
            .with_context(|| format!("write outputs to {}", request.output_dir.display()))
    })?;

    Ok(MatchRun {
        outcome,
        report,
        files,
    })
}

/// Loads both inputs, matches the bare values of one field and writes the
/// flat table.
pub fn run_multiset(request: &MultisetRequest) -> Result<MultisetRun> {
    let mut overrides = BTreeMap::new();
    if let Some(kind) = request.kind {
        overrides.insert(request.field.clone(), kind);
    }
    let catalog = FieldCatalog::builtin().with_quantity_kinds(&overrides);
    let kind = field_kind(&catalog, &request.field)
        .context("pass --kind for fields outside the built-in catalog")?;
    let (left, right) = load_pair(&request.left, &request.right, &catalog)?;

    let rows = info_span!("multiset", field = %request.field, %kind)
        .in_scope(|| {
            multiset_match(
                &left.set,
                &right.set,
                &request.field,
                kind,
                &request.group_by,
                &request.options,
            )
        })
        .context("match values")?;

    write_multiset(&request.output, &rows)
        .with_context(|| format!("write {}", request.output.display()))?;
    Ok(MultisetRun {
        kind,
        rows,
        output: request.output.clone(),
    })
}
