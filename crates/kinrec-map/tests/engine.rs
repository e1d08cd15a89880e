use std::collections::BTreeMap;

use kinrec_map::{
    CompositeScorer, JoinedTable, MatchError, MultisetOptions, categorical_equivalence, join,
    match_records, multiset_match, string_similarity, value_similarity,
};
use kinrec_model::{
    DiagnosticCode, FieldCatalog, JoinMode, MatchConfig, QuantityKind, Record, RecordSet, Suffixes,
};
use kinrec_normalization::build_record_set;

fn record_set(columns: &[&str], rows: &[&[&str]]) -> RecordSet {
    let (set, _) = build_record_set(
        columns,
        rows.iter().map(|row| row.iter().copied()),
        &FieldCatalog::builtin(),
    );
    set
}

fn kcat_config() -> MatchConfig {
    MatchConfig::new()
        .with_weight("kcat", 1.0)
        .with_group_by(vec!["pmid".to_string()])
}

fn group_names(table: &JoinedTable) -> Vec<String> {
    let mut names: Vec<String> = table.rows.iter().map(|row| row.group.to_string()).collect();
    names.dedup();
    names
}

#[test]
fn milli_per_second_is_an_exact_match() {
    let left = record_set(&["pmid", "kcat"], &[&["1", "33 s^-1"]]);
    let right = record_set(&["pmid", "kcat"], &[&["1", "33000 ms^-1"]]);

    let outcome = match_records(&left, &right, &kcat_config()).expect("match");
    assert_eq!(outcome.table.rows.len(), 1);
    let row = &outcome.table.rows[0];
    assert_eq!((row.left_index, row.right_index), (Some(0), Some(0)));
    assert_eq!(row.objective, 1.0);
    assert!(outcome.feedback.is_empty());
}

#[test]
fn minute_rate_agrees_with_its_second_equivalent() {
    let left = record_set(&["pmid", "kcat"], &[&["1", "10 min^-1"]]);
    let right = record_set(&["pmid", "kcat"], &[&["1", "0.1667 s^-1"]]);

    let outcome = match_records(&left, &right, &kcat_config()).expect("match");
    assert_eq!(outcome.table.summary().matched, 1);
    assert!(outcome.feedback.is_empty());
}

#[test]
fn thousand_fold_rate_is_reported_as_factor() {
    let left = record_set(&["pmid", "kcat"], &[&["1", "10 s^-1"]]);
    let right = record_set(&["pmid", "kcat"], &[&["1", "0.01 s^-1"]]);

    let outcome = match_records(&left, &right, &kcat_config()).expect("match");
    let codes: Vec<DiagnosticCode> = outcome
        .feedback
        .diagnostics
        .iter()
        .map(|entry| entry.diagnostic.code)
        .collect();
    assert_eq!(codes, vec![DiagnosticCode::OffByFactor(1000.0)]);
    assert_eq!(outcome.feedback.counts().get("off_by_factor"), Some(&1));
}

#[test]
fn unparseable_values_produce_no_diagnostic() {
    let left = record_set(&["pmid", "kcat"], &[&["1", "n.d."]]);
    let right = record_set(&["pmid", "kcat"], &[&["1", "4 s^-1"]]);

    let outcome = match_records(&left, &right, &kcat_config()).expect("match");
    assert_eq!(outcome.table.rows.len(), 1);
    assert!(outcome.feedback.is_empty());
}

#[test]
fn records_pair_by_best_total_within_groups() {
    let left = record_set(
        &["pmid", "kcat", "km"],
        &[
            &["1", "5 s^-1", "0.2 mM"],
            &["1", "50 s^-1", "2 mM"],
            &["2", "7 s^-1", "1 mM"],
        ],
    );
    let right = record_set(
        &["pmid", "kcat", "km"],
        &[
            &["1", "49 s^-1", "2.1 mM"],
            &["1", "5.1 s^-1", "200 µM"],
            &["2", "7 s^-1", "1 mM"],
            &["2", "90 s^-1", "9 mM"],
        ],
    );
    let config = kcat_config().with_weight("km", 1.0);

    let outcome = match_records(&left, &right, &config).expect("match");
    let pairs: Vec<_> = outcome
        .table
        .rows
        .iter()
        .map(|row| (row.left_index, row.right_index))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (Some(0), Some(1)),
            (Some(1), Some(0)),
            (Some(2), Some(2)),
            (None, Some(3)),
        ]
    );
    let summary = outcome.table.summary();
    assert_eq!(summary.groups_solved, 2);
    assert_eq!(summary.right_only, 1);
}

#[test]
fn filtered_record_sets_keep_their_original_indices() {
    let mut left = record_set(
        &["pmid", "kcat"],
        &[&["1", "99 s^-1"], &["1", "10 s^-1"], &["1", "5 min^-1"]],
    );
    left.records.remove(0);
    let right = record_set(&["pmid", "kcat"], &[&["1", "0.01 s^-1"], &["1", "5 s^-1"]]);

    let outcome = match_records(&left, &right, &kcat_config()).expect("match");
    let rows: Vec<_> = outcome
        .table
        .rows
        .iter()
        .map(|row| (row.left_index, row.right_index, row.cell_text("kcat_left")))
        .collect();
    assert_eq!(
        rows,
        vec![
            (Some(1), Some(0), Some("10 s^-1".to_string())),
            (Some(2), Some(1), Some("5 min^-1".to_string())),
        ]
    );

    let diagnosed: Vec<_> = outcome
        .feedback
        .diagnostics
        .iter()
        .map(|entry| (entry.left_index, entry.right_index, entry.diagnostic.code))
        .collect();
    assert_eq!(
        diagnosed,
        vec![
            (1, 0, DiagnosticCode::OffByFactor(1000.0)),
            (2, 1, DiagnosticCode::WrongUnit),
        ]
    );
}

#[test]
fn every_record_of_a_filtered_set_is_joined() {
    let mut left = record_set(
        &["pmid", "kcat"],
        &[&["1", "1 s^-1"], &["1", "2 s^-1"], &["1", "3 s^-1"]],
    );
    left.records.remove(0);
    let right = record_set(&["pmid", "kcat"], &[&["1", "7 s^-1"], &["1", "8 s^-1"]]);
    let objective = |_: &Record, _: &Record| 1.0;

    let table = join(
        &left,
        &right,
        &objective,
        &["pmid".to_string()],
        JoinMode::Outer,
        &Suffixes::default(),
    )
    .expect("join");
    let summary = table.summary();
    assert_eq!((summary.matched, summary.left_only, summary.right_only), (2, 0, 0));
    let mut lefts: Vec<_> = table.rows.iter().filter_map(|row| row.left_index).collect();
    lefts.sort_unstable();
    assert_eq!(lefts, vec![1, 2]);
    for row in &table.rows {
        assert!(row.cell_text("kcat_left").is_some());
    }
}

#[test]
fn null_group_keys_only_match_each_other() {
    let left = record_set(&["pmid", "kcat"], &[&["NA", "3 s^-1"], &["1", "3 s^-1"]]);
    let right = record_set(&["pmid", "kcat"], &[&["", "3 s^-1"]]);

    let outcome = match_records(&left, &right, &kcat_config()).expect("match");
    let matched: Vec<_> = outcome.table.matched().collect();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].left_index, Some(0));
    assert_eq!(matched[0].group.to_string(), "<null>");
}

#[test]
fn join_modes_select_one_sided_groups() {
    let left = record_set(&["pmid", "kcat"], &[&["A", "1 s^-1"], &["C", "2 s^-1"]]);
    let right = record_set(&["pmid", "kcat"], &[&["B", "1 s^-1"], &["C", "2 s^-1"]]);
    let objective = |_: &Record, _: &Record| 1.0;
    let group_by = vec!["pmid".to_string()];

    let run = |mode: JoinMode| {
        let table = join(&left, &right, &objective, &group_by, mode, &Suffixes::default())
            .expect("join");
        group_names(&table)
    };

    assert_eq!(run(JoinMode::Outer), vec!["A", "B", "C"]);
    assert_eq!(run(JoinMode::Inner), vec!["C"]);
    assert_eq!(run(JoinMode::Left), vec!["A", "C"]);
    assert_eq!(run(JoinMode::Right), vec!["B", "C"]);
}

#[test]
fn weight_on_missing_field_fails_loudly() {
    let left = record_set(&["pmid", "kcat"], &[&["1", "3 s^-1"]]);
    let right = record_set(&["pmid", "kcat"], &[&["1", "3 s^-1"]]);
    let config = kcat_config().with_weight("km", 1.0);

    let err = match_records(&left, &right, &config).expect_err("km is not a column");
    assert!(matches!(err, MatchError::UnknownWeightField { ref field, .. } if field == "km"));
    assert_eq!(
        err.to_string(),
        "weighted field \"km\" is not a column of the left record set"
    );
}

#[test]
fn absence_rules() {
    let kind = QuantityKind::Concentration;
    assert_eq!(value_similarity(None, None, kind, 10.0), 1.0);
    assert_eq!(value_similarity(Some("10 mM"), None, kind, 10.0), 0.0);
    assert_eq!(value_similarity(Some("n.d."), None, kind, 10.0), 1.0);
    assert_eq!(string_similarity(None, None), 0.0);
    assert_eq!(categorical_equivalence(None, None), 1.0);
    assert_eq!(categorical_equivalence(Some("wild-type"), None), 0.2);
    assert_eq!(categorical_equivalence(Some("WT"), Some("wildtype")), 1.0);
    assert_eq!(categorical_equivalence(Some("a123g / y45f"), Some("Y45F/A123G")), 1.0);
    assert_eq!(categorical_equivalence(Some("W42A"), None), 0.0);
}

#[test]
fn value_similarity_takes_the_best_explanation() {
    let kind = QuantityKind::Concentration;
    // Exact after conversion.
    assert_eq!(value_similarity(Some("2 mM"), Some("2000 µM"), kind, 10.0), 1.0);
    // Same digits under a different unit.
    assert_eq!(value_similarity(Some("2 mM"), Some("2 µM"), kind, 10.0), 0.95);
    // Off by a thousand.
    assert_eq!(value_similarity(Some("2 mM"), Some("0.002 mM"), kind, 10.0), 0.9);
    // No explanation fits.
    assert!(value_similarity(Some("2 mM"), Some("2.5 µM"), kind, 10.0) < 0.01);
    // Close but not exact is penalized.
    let close = value_similarity(Some("2 mM"), Some("2.1 mM"), kind, 10.0);
    assert!(close < 0.9 && close > 0.85, "{close}");
}

#[test]
fn score_explanation_lists_every_field() {
    let columns = ["pmid", "kcat", "enzyme", "mutant"];
    let left = record_set(&columns, &[&["1", "33 s^-1", "lactase", "WT"]]);
    let right = record_set(&columns, &[&["1", "33000 ms^-1", "Lactase", ""]]);
    let weights = BTreeMap::from([
        ("kcat".to_string(), 1.0),
        ("enzyme".to_string(), 0.5),
        ("mutant".to_string(), 2.0),
    ]);
    let scorer = CompositeScorer::new(&weights, &left, &right, &FieldCatalog::builtin(), 10.0)
        .expect("scorer");

    let score = scorer.explain(&left.records[0], &right.records[0]);
    insta::assert_snapshot!(score.explain(), @"enzyme: 1.00×0.5; kcat: 1.00×1; mutant: 0.20×2");
    assert!((score.total - 1.9).abs() < 1e-12);
}

#[test]
fn diagnostics_render_readably() {
    let left = record_set(
        &["pmid", "kcat", "km"],
        &[&["1", "10 s^-1", "5 mM"], &["2", "5 min^-1", "1 mM"]],
    );
    let right = record_set(
        &["pmid", "kcat", "km"],
        &[&["1", "0.01 s^-1", "4 mM"], &["2", "5 s^-1", "1 mM"]],
    );
    let config = kcat_config().with_weight("km", 1.0);

    let outcome = match_records(&left, &right, &config).expect("match");
    let rendered = outcome
        .feedback
        .diagnostics
        .iter()
        .map(|entry| {
            format!(
                "{} row {}: {} {}",
                entry.group, entry.row, entry.diagnostic.field, entry.diagnostic.code
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    1 row 0: kcat off_by_1000
    1 row 0: km value_deviation_20.0%
    2 row 1: kcat wrong_unit
    ");
}

#[test]
fn multiset_matching_rewards_thousand_fold_errors() {
    let left = record_set(
        &["pmid", "km"],
        &[
            &["1", "1 M"],
            &["1", "2 M"],
            &["1", "6 M"],
            &["1", "7 M"],
            &["1", "8 M"],
            &["1", "9 M"],
            &["1", "10 M"],
            &["1", "10 M"],
        ],
    );
    let right = record_set(
        &["pmid", "km"],
        &[
            &["1", "1 M"],
            &["1", "3 M"],
            &["1", "7 M"],
            &["1", "8 M"],
            &["1", "1000 M"],
        ],
    );

    let rows = multiset_match(
        &left,
        &right,
        "km",
        QuantityKind::Concentration,
        &["pmid".to_string()],
        &MultisetOptions::default(),
    )
    .expect("multiset");
    // Duplicate 10 collapses: seven unique values on the left.
    assert_eq!(rows.len(), 7);
    let thousand = rows
        .iter()
        .find(|row| row.value_right == Some(1000.0))
        .expect("1000 present");
    assert!(thousand.value_left.is_some());
    assert!(thousand.similarity > 0.3);
    assert_eq!(
        thousand.ratio,
        thousand.value_left.map(|left| 1000.0 / left)
    );
}
