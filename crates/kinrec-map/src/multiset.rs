//! Unordered multiset matching of bare values.
//!
//! For groups where it is unreliable which record produced which number,
//! the values of one field are matched as two sets, ignoring the records
//! they came from. Duplicates within one side collapse to one entry, so a
//! value repeated across rows cannot absorb several counterparts.

use std::collections::BTreeMap;

use kinrec_model::{FieldCatalog, GroupKey, QuantityKind, RecordSet};
use kinrec_normalization::canonical_value;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::assignment::{ScoreMatrix, solve_matrix};
use crate::error::{MatchError, Result, Side};
use crate::scorer::quantity_of;
use crate::similarity::{default_exponent_penalty, mantissa_exponent_similarity};

/// Tuning of [`mantissa_exponent_similarity`] for multiset matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultisetOptions {
    pub alpha: f64,
    pub beta: f64,
    /// Overrides the base implied by the quantity kind.
    pub base: Option<f64>,
}

impl Default for MultisetOptions {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            beta: 1.0,
            base: None,
        }
    }
}

impl MultisetOptions {
    #[must_use]
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = Some(base);
        self
    }
}

/// One row of the flat multiset output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultisetMatch {
    pub group: GroupKey,
    pub field: String,
    pub kind: QuantityKind,
    pub value_left: Option<f64>,
    pub value_right: Option<f64>,
    /// 0 for unmatched values.
    pub similarity: f64,
    /// `value_right / value_left` when both are present.
    pub ratio: Option<f64>,
}

/// Sorted, deduplicated finite values.
pub fn unique_values<I>(values: I) -> Vec<f64>
where
    I: IntoIterator<Item = f64>,
{
    let mut values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}

/// Optimal one-to-one pairing of two value sets.
///
/// Returns `(left, right, similarity)` triples; every input value appears
/// exactly once.
pub fn match_values(
    left: &[f64],
    right: &[f64],
    base: f64,
    options: &MultisetOptions,
) -> Vec<(Option<f64>, Option<f64>, f64)> {
    let matrix = ScoreMatrix::from_fn(left.len(), right.len(), |row, col| {
        mantissa_exponent_similarity(
            left[row],
            right[col],
            options.alpha,
            options.beta,
            base,
            default_exponent_penalty,
        )
    });
    solve_matrix(&matrix)
        .into_iter()
        .map(|edge| {
            (
                edge.left_index.map(|idx| left[idx]),
                edge.right_index.map(|idx| right[idx]),
                edge.score,
            )
        })
        .collect()
}

/// Quantity kind of `field` according to `catalog`.
pub fn field_kind(catalog: &FieldCatalog, field: &str) -> Result<QuantityKind> {
    catalog
        .quantity_kind(field)
        .ok_or_else(|| MatchError::NotAQuantity {
            field: field.to_string(),
        })
}

/// Canonical values of `column` per group. Every group of the side appears,
/// even when none of its values parse.
fn field_values(
    set: &RecordSet,
    column: &str,
    kind: QuantityKind,
    keys: &[String],
) -> BTreeMap<GroupKey, Vec<f64>> {
    let mut groups: BTreeMap<GroupKey, Vec<f64>> = BTreeMap::new();
    for record in set.iter() {
        let key = RecordSet::group_key(record, keys);
        let entry = groups.entry(key).or_default();
        if let Some(value) =
            quantity_of(record.get(column)).and_then(|parsed| canonical_value(&parsed, kind))
        {
            entry.push(value);
        }
    }
    groups
}

fn resolve(set: &RecordSet, field: &str, side: Side, group_key: bool) -> Result<String> {
    set.resolve_column(field).map(str::to_string).ok_or_else(|| {
        let field = field.to_string();
        if group_key {
            MatchError::UnknownGroupKey { field, side }
        } else {
            MatchError::UnknownField { field, side }
        }
    })
}

/// Matches the canonical values of `field` group by group.
///
/// Groups present on only one side yield unmatched rows.
pub fn multiset_match(
    left: &RecordSet,
    right: &RecordSet,
    field: &str,
    kind: QuantityKind,
    group_by: &[String],
    options: &MultisetOptions,
) -> Result<Vec<MultisetMatch>> {
    let left_column = resolve(left, field, Side::Left, false)?;
    let right_column = resolve(right, field, Side::Right, false)?;
    let left_keys = group_by
        .iter()
        .map(|key| resolve(left, key, Side::Left, true))
        .collect::<Result<Vec<_>>>()?;
    let right_keys = group_by
        .iter()
        .map(|key| resolve(right, key, Side::Right, true))
        .collect::<Result<Vec<_>>>()?;
    let base = options.base.unwrap_or_else(|| kind.error_base());

    let mut groups: BTreeMap<GroupKey, (Vec<f64>, Vec<f64>)> = BTreeMap::new();
    for (key, values) in field_values(left, &left_column, kind, &left_keys) {
        groups.entry(key).or_default().0 = values;
    }
    for (key, values) in field_values(right, &right_column, kind, &right_keys) {
        groups.entry(key).or_default().1 = values;
    }

    let per_group: Vec<Vec<MultisetMatch>> = groups
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(key, (lefts, rights))| {
            let lefts = unique_values(lefts);
            let rights = unique_values(rights);
            let pairs = match_values(&lefts, &rights, base, options);
            debug!(
                group = %key,
                left = lefts.len(),
                right = rights.len(),
                "multiset group solved"
            );
            pairs
                .into_iter()
                .map(|(value_left, value_right, similarity)| MultisetMatch {
                    group: key.clone(),
                    field: field.to_string(),
                    kind,
                    value_left,
                    value_right,
                    similarity,
                    ratio: match (value_left, value_right) {
                        (Some(l), Some(r)) if l != 0.0 => Some(r / l),
                        _ => None,
                    },
                })
                .collect::<Vec<_>>()
        })
        .collect();
    let rows: Vec<MultisetMatch> = per_group.into_iter().flatten().collect();

    let matched = rows
        .iter()
        .filter(|row| row.value_left.is_some() && row.value_right.is_some())
        .count();
    info!(field, %kind, base, rows = rows.len(), matched, "multiset match complete");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_collapse() {
        assert_eq!(unique_values([3.0, 1.0, 3.0, f64::NAN]), vec![1.0, 3.0]);
    }

    #[test]
    fn thousand_fold_value_finds_a_partner() {
        let left = [1.0, 2.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let right = [1.0, 3.0, 7.0, 8.0, 1000.0];
        let pairs = match_values(&left, &right, 10.0, &MultisetOptions::default());
        assert_eq!(pairs.len(), left.len());
        let (partner, _, similarity) = pairs
            .iter()
            .find(|(_, r, _)| *r == Some(1000.0))
            .copied()
            .expect("1000 is in the output");
        assert!(partner.is_some());
        assert!(similarity > 0.3, "similarity {similarity}");
    }
}
