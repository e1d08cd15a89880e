//! Grouped join built on the assignment solver.
//!
//! Both inputs are partitioned by the group-by key. Groups present on both
//! sides are solved independently (in parallel); one-sided groups are kept
//! or dropped according to the [`JoinMode`]. Output is assembled in group
//! key order, so it does not depend on which group finished first.

use std::collections::{BTreeMap, BTreeSet};

use kinrec_model::{FieldValue, GroupKey, JoinMode, MatchEdge, Record, RecordSet, Suffixes};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::assignment::solve;
use crate::error::{MatchError, Result, Side};
use crate::scorer::Objective;

/// Name of the objective score column.
pub const OBJECTIVE_COLUMN: &str = "objective";

/// One output row: a matched pair or a one-sided record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedRow {
    pub group: GroupKey,
    /// Original index of the left record, if any.
    pub left_index: Option<usize>,
    /// Original index of the right record, if any.
    pub right_index: Option<usize>,
    /// Objective score of the pair; 0 for unmatched rows.
    pub objective: f64,
    /// Cells keyed by output column name.
    pub cells: BTreeMap<String, FieldValue>,
}

impl JoinedRow {
    pub fn is_matched(&self) -> bool {
        self.left_index.is_some() && self.right_index.is_some()
    }

    /// Text of `column` as written to output.
    pub fn cell_text(&self, column: &str) -> Option<String> {
        if column == OBJECTIVE_COLUMN {
            return Some(self.objective.to_string());
        }
        self.cells
            .get(column)
            .and_then(FieldValue::as_text)
            .map(str::to_string)
    }
}

/// Counts describing a join result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JoinSummary {
    pub matched: usize,
    pub left_only: usize,
    pub right_only: usize,
    pub groups_solved: usize,
    /// Mean objective over matched pairs; 0 when nothing matched.
    pub mean_objective: f64,
}

/// Result of [`join`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedTable {
    /// Group keys, then left and right columns (suffixed where both sides
    /// carry them), then [`OBJECTIVE_COLUMN`].
    pub columns: Vec<String>,
    pub rows: Vec<JoinedRow>,
    /// Number of groups present on both sides and run through the solver.
    pub groups_solved: usize,
}

impl JoinedTable {
    pub fn summary(&self) -> JoinSummary {
        let mut summary = JoinSummary {
            matched: 0,
            left_only: 0,
            right_only: 0,
            groups_solved: self.groups_solved,
            mean_objective: 0.0,
        };
        let mut objective_total = 0.0;
        for row in &self.rows {
            match (row.left_index, row.right_index) {
                (Some(_), Some(_)) => {
                    summary.matched += 1;
                    objective_total += row.objective;
                }
                (Some(_), None) => summary.left_only += 1,
                (None, Some(_)) => summary.right_only += 1,
                (None, None) => {}
            }
        }
        if summary.matched > 0 {
            summary.mean_objective = objective_total / summary.matched as f64;
        }
        summary
    }

    /// Matched rows only.
    pub fn matched(&self) -> impl Iterator<Item = &JoinedRow> {
        self.rows.iter().filter(|row| row.is_matched())
    }
}

/// Output layout: where each source column lands.
#[derive(Debug, Clone)]
struct ColumnPlan {
    columns: Vec<String>,
    /// (source column, output column) for group keys, per side.
    left_keys: Vec<(String, String)>,
    right_keys: Vec<(String, String)>,
    left: Vec<(String, String)>,
    right: Vec<(String, String)>,
}

impl ColumnPlan {
    fn new(
        left: &RecordSet,
        right: &RecordSet,
        left_keys: &[String],
        right_keys: &[String],
        group_by: &[String],
        suffixes: &Suffixes,
    ) -> Self {
        let mut columns: Vec<String> = group_by.to_vec();
        let left_data: Vec<&String> = left
            .columns
            .iter()
            .filter(|c| !left_keys.contains(c))
            .collect();
        let right_data: Vec<&String> = right
            .columns
            .iter()
            .filter(|c| !right_keys.contains(c))
            .collect();
        let left_names: BTreeSet<&str> = left_data.iter().map(|c| c.as_str()).collect();
        let right_names: BTreeSet<&str> = right_data.iter().map(|c| c.as_str()).collect();

        let left_plan: Vec<(String, String)> = left_data
            .iter()
            .map(|c| {
                let out = if right_names.contains(c.as_str()) {
                    format!("{c}{}", suffixes.left)
                } else {
                    (*c).clone()
                };
                ((*c).clone(), out)
            })
            .collect();
        let right_plan: Vec<(String, String)> = right_data
            .iter()
            .map(|c| {
                let out = if left_names.contains(c.as_str()) {
                    format!("{c}{}", suffixes.right)
                } else {
                    (*c).clone()
                };
                ((*c).clone(), out)
            })
            .collect();

        columns.extend(left_plan.iter().map(|(_, out)| out.clone()));
        columns.extend(right_plan.iter().map(|(_, out)| out.clone()));
        columns.push(OBJECTIVE_COLUMN.to_string());

        let pair = |keys: &[String]| -> Vec<(String, String)> {
            keys.iter().cloned().zip(group_by.iter().cloned()).collect()
        };
        Self {
            columns,
            left_keys: pair(left_keys),
            right_keys: pair(right_keys),
            left: left_plan,
            right: right_plan,
        }
    }

    fn row(
        &self,
        group: &GroupKey,
        left: Option<&Record>,
        right: Option<&Record>,
        objective: f64,
    ) -> JoinedRow {
        let mut cells = BTreeMap::new();
        // Key cells come from the right only when there is no left record.
        if let Some(record) = right {
            copy_cells(&mut cells, record, &self.right_keys);
        }
        if let Some(record) = left {
            copy_cells(&mut cells, record, &self.left_keys);
            copy_cells(&mut cells, record, &self.left);
        }
        if let Some(record) = right {
            copy_cells(&mut cells, record, &self.right);
        }
        JoinedRow {
            group: group.clone(),
            left_index: left.map(|r| r.index),
            right_index: right.map(|r| r.index),
            objective,
            cells,
        }
    }
}

fn copy_cells(
    cells: &mut BTreeMap<String, FieldValue>,
    record: &Record,
    plan: &[(String, String)],
) {
    for (source, out) in plan {
        cells.insert(out.clone(), record.get(source).clone());
    }
}

/// Resolves every group-by field against `set`.
fn resolve_keys(set: &RecordSet, group_by: &[String], side: Side) -> Result<Vec<String>> {
    group_by
        .iter()
        .map(|field| {
            set.resolve_column(field)
                .map(str::to_string)
                .ok_or_else(|| MatchError::UnknownGroupKey {
                    field: field.clone(),
                    side,
                })
        })
        .collect()
}

/// Records of each side, partitioned by group key.
pub type Partitions<'a> = BTreeMap<GroupKey, (Vec<&'a Record>, Vec<&'a Record>)>;

/// Partitions both sides by the resolved key columns. A null key component
/// is an ordinary value and only groups with other nulls.
pub fn partition<'a>(
    left: &'a RecordSet,
    right: &'a RecordSet,
    left_keys: &[String],
    right_keys: &[String],
) -> Partitions<'a> {
    let mut groups: Partitions<'a> = BTreeMap::new();
    for record in left.iter() {
        let key = RecordSet::group_key(record, left_keys);
        groups.entry(key).or_default().0.push(record);
    }
    for record in right.iter() {
        let key = RecordSet::group_key(record, right_keys);
        groups.entry(key).or_default().1.push(record);
    }
    groups
}

/// Grouped optimal-assignment join of `left` and `right`.
pub fn join<O>(
    left: &RecordSet,
    right: &RecordSet,
    objective: &O,
    group_by: &[String],
    mode: JoinMode,
    suffixes: &Suffixes,
) -> Result<JoinedTable>
where
    O: Objective + ?Sized,
{
    let left_keys = resolve_keys(left, group_by, Side::Left)?;
    let right_keys = resolve_keys(right, group_by, Side::Right)?;
    let plan = ColumnPlan::new(left, right, &left_keys, &right_keys, group_by, suffixes);
    let groups = partition(left, right, &left_keys, &right_keys);

    let solved: Vec<(GroupKey, Vec<JoinedRow>, bool)> = groups
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(key, (lefts, rights))| {
            match (lefts.is_empty(), rights.is_empty()) {
                (false, false) => {
                    // Edges hold positions within this group, not original indices.
                    let edges: Vec<MatchEdge> = solve(&lefts, &rights, objective);
                    debug!(
                        group = %key,
                        left = lefts.len(),
                        right = rights.len(),
                        matched = edges.iter().filter(|e| e.is_matched()).count(),
                        "group solved"
                    );
                    let rows = edges
                        .iter()
                        .map(|edge| {
                            plan.row(
                                &key,
                                edge.left_index.map(|pos| lefts[pos]),
                                edge.right_index.map(|pos| rights[pos]),
                                edge.score,
                            )
                        })
                        .collect();
                    (key, rows, true)
                }
                (false, true) if mode.keeps_left_only() => {
                    let rows = lefts
                        .iter()
                        .map(|record| plan.row(&key, Some(*record), None, 0.0))
                        .collect();
                    (key, rows, false)
                }
                (true, false) if mode.keeps_right_only() => {
                    let rows = rights
                        .iter()
                        .map(|record| plan.row(&key, None, Some(*record), 0.0))
                        .collect();
                    (key, rows, false)
                }
                _ => (key, Vec::new(), false),
            }
        })
        .collect();

    let groups_solved = solved.iter().filter(|(_, _, solved)| *solved).count();
    let rows: Vec<JoinedRow> = solved.into_iter().flat_map(|(_, rows, _)| rows).collect();
    let table = JoinedTable {
        columns: plan.columns,
        rows,
        groups_solved,
    };

    let summary = table.summary();
    info!(
        mode = %mode,
        groups_solved = summary.groups_solved,
        matched = summary.matched,
        left_only = summary.left_only,
        right_only = summary.right_only,
        "join complete"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kinrec_model::FieldCatalog;
    use kinrec_normalization::build_record_set;

    #[test]
    fn overlapping_columns_are_suffixed() {
        let catalog = FieldCatalog::builtin();
        let (left, _) =
            build_record_set(&["pmid", "kcat", "note"], [["1", "2 s^-1", "a"]], &catalog);
        let (right, _) =
            build_record_set(&["pmid", "kcat", "source"], [["1", "2 s^-1", "b"]], &catalog);
        let objective = |_: &Record, _: &Record| 1.0;
        let table = join(
            &left,
            &right,
            &objective,
            &["pmid".to_string()],
            JoinMode::Inner,
            &Suffixes::default(),
        )
        .expect("join");
        assert_eq!(
            table.columns,
            vec!["pmid", "kcat_left", "note", "kcat_right", "source", "objective"]
        );
        assert_eq!(table.rows[0].cell_text("pmid").as_deref(), Some("1"));
        assert_eq!(table.rows[0].cell_text("objective").as_deref(), Some("1"));
    }

    #[test]
    fn unknown_group_key_is_an_error() {
        let catalog = FieldCatalog::builtin();
        let (left, _) = build_record_set(&["pmid"], [["1"]], &catalog);
        let (right, _) = build_record_set(&["doc"], [["1"]], &catalog);
        let objective = |_: &Record, _: &Record| 1.0;
        let err = join(
            &left,
            &right,
            &objective,
            &["pmid".to_string()],
            JoinMode::Outer,
            &Suffixes::default(),
        )
        .expect_err("missing key");
        assert!(matches!(
            err,
            MatchError::UnknownGroupKey { side: Side::Right, .. }
        ));
    }
}
