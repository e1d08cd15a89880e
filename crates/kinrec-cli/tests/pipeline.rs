//! Integration tests for the pipeline module.

use std::fs;
use std::path::{Path, PathBuf};

use kinrec_cli::config::{ConfigOverrides, load_config};
use kinrec_cli::pipeline::{MatchRequest, MultisetRequest, run_match, run_multiset};
use kinrec_map::MultisetOptions;
use kinrec_model::{DiagnosticCode, JoinMode, MatchConfig, QuantityKind};
use tempfile::TempDir;

const LEFT: &str = "pmid,kcat,km\n\
                    1,33 s^-1,0.5 mM\n\
                    1,10 s^-1,2 mM\n\
                    2,5 min^-1,1 mM\n\
                    3,7 s^-1,9 bananas\n";

const RIGHT: &str = "pmid,kcat,km\n\
                     1,0.01 s^-1,2 mM\n\
                     1,33000 ms^-1,500 µM\n\
                     2,5 s^-1,1 mM\n";

const CONFIG: &str = r#"
group_by = ["pmid"]

[weights]
kcat = 1.0
km = 1.0
"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn inputs(dir: &TempDir) -> (PathBuf, PathBuf) {
    (
        write(dir.path(), "left.csv", LEFT),
        write(dir.path(), "right.csv", RIGHT),
    )
}

fn config_from_file(dir: &TempDir) -> MatchConfig {
    let path = write(dir.path(), "match.toml", CONFIG);
    let config = load_config(Some(&path)).unwrap();
    ConfigOverrides::default().apply(config).unwrap()
}

#[test]
fn test_match_run_writes_outputs() {
    let dir = TempDir::new().unwrap();
    let (left, right) = inputs(&dir);
    let output_dir = dir.path().join("out");

    let run = run_match(&MatchRequest {
        left,
        right,
        config: config_from_file(&dir),
        output_dir: output_dir.clone(),
    })
    .unwrap();

    let pairs: Vec<_> = run
        .outcome
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
            (Some(3), None),
        ]
    );

    let codes: Vec<_> = run
        .outcome
        .feedback
        .diagnostics
        .iter()
        .map(|entry| (entry.row, entry.diagnostic.code))
        .collect();
    assert_eq!(
        codes,
        vec![
            (1, DiagnosticCode::OffByFactor(1000.0)),
            (2, DiagnosticCode::WrongUnit),
        ]
    );

    assert_eq!(run.report.summary.matched, 3);
    assert_eq!(run.report.summary.left_only, 1);
    assert_eq!(run.report.unrecognized_units.len(), 1);
    assert_eq!(run.report.unrecognized_units[0].text, "9 bananas");

    assert_eq!(run.files.joined, output_dir.join("joined.csv"));
    for path in [
        &run.files.joined,
        &run.files.diagnostics,
        &run.files.unrecognized,
        &run.files.report,
    ] {
        assert!(path.is_file(), "{} missing", path.display());
    }
    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&run.files.report).unwrap()).unwrap();
    assert_eq!(report["feedback"]["wrong_unit"], 1);
    assert_eq!(report["config"]["group_by"][0], "pmid");
}

#[test]
fn test_inner_mode_drops_one_sided_groups() {
    let dir = TempDir::new().unwrap();
    let (left, right) = inputs(&dir);
    let mut config = config_from_file(&dir);
    config.join_mode = JoinMode::Inner;

    let run = run_match(&MatchRequest {
        left,
        right,
        config,
        output_dir: dir.path().join("out"),
    })
    .unwrap();

    assert_eq!(run.report.summary.left_only, 0);
    assert_eq!(run.outcome.table.rows.len(), 3);
}

#[test]
fn test_weight_on_unknown_field_fails() {
    let dir = TempDir::new().unwrap();
    let (left, right) = inputs(&dir);
    let config = ConfigOverrides {
        weights: vec![("ki".to_string(), 1.0)],
        ..ConfigOverrides::default()
    }
    .apply(config_from_file(&dir))
    .unwrap();

    let err = run_match(&MatchRequest {
        left,
        right,
        config,
        output_dir: dir.path().join("out"),
    })
    .unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("weighted field \"ki\""), "{message}");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn test_missing_input_names_the_file() {
    let dir = TempDir::new().unwrap();
    let err = run_match(&MatchRequest {
        left: dir.path().join("nope.csv"),
        right: dir.path().join("right.csv"),
        config: config_from_file(&dir),
        output_dir: dir.path().join("out"),
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("nope.csv"));
}

#[test]
fn test_missing_config_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.to_string().contains("read config"));
}

#[test]
fn test_multiset_run() {
    let dir = TempDir::new().unwrap();
    let (left, right) = inputs(&dir);
    let output = dir.path().join("multiset.csv");

    let run = run_multiset(&MultisetRequest {
        left,
        right,
        field: "km".to_string(),
        kind: None,
        group_by: vec!["pmid".to_string()],
        options: MultisetOptions::default(),
        output: output.clone(),
    })
    .unwrap();

    assert_eq!(run.kind, QuantityKind::Concentration);
    assert_eq!(run.rows.len(), 4);
    let unmatched: Vec<_> = run
        .rows
        .iter()
        .filter(|row| row.value_right.is_none())
        .collect();
    assert_eq!(unmatched.len(), 1);
    assert_eq!(unmatched[0].group.to_string(), "3");

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written.lines().count(), 5);
}

#[test]
fn test_multiset_requires_a_quantity_field() {
    let dir = TempDir::new().unwrap();
    let (left, right) = inputs(&dir);

    let err = run_multiset(&MultisetRequest {
        left,
        right,
        field: "pmid".to_string(),
        kind: None,
        group_by: Vec::new(),
        options: MultisetOptions::default(),
        output: dir.path().join("multiset.csv"),
    })
    .unwrap_err();
    assert!(format!("{err:#}").contains("--kind"));
}
