//! Tests for kinrec-model types.

use kinrec_model::{
    DiagnosticCode, FieldValue, JoinMode, MatchConfig, ModelError, ParsedValue, QuantityKind,
    Record, RecordSet, Unit,
};

#[test]
fn config_loads_from_toml() {
    let config: MatchConfig = toml::from_str(
        r#"
group_by = ["pmid"]
join_mode = "left"
off_by_base = 60.0

[weights]
kcat = 1.0
enzyme = 0.5

[quantity_kind_per_field]
kcat_app = "rate"
"#,
    )
    .expect("parse config");

    assert_eq!(config.group_by, vec!["pmid".to_string()]);
    assert_eq!(config.join_mode, JoinMode::Left);
    assert_eq!(config.off_by_base, 60.0);
    assert_eq!(config.weights.get("enzyme"), Some(&0.5));
    assert_eq!(
        config.quantity_kind_per_field.get("kcat_app"),
        Some(&QuantityKind::Rate)
    );
    // Unspecified options keep their defaults.
    assert_eq!(config.deviation_threshold, 0.98);
    assert_eq!(config.suffixes.left, "_left");
    config.validate().expect("valid config");
}

#[test]
fn off_by_base_must_exceed_one() {
    let config = MatchConfig::new().with_off_by_base(1.0);
    assert!(matches!(config.validate(), Err(ModelError::InvalidConfig(_))));
}

#[test]
fn join_mode_parses() {
    assert_eq!("OUTER".parse::<JoinMode>().unwrap(), JoinMode::Outer);
    assert!("cross".parse::<JoinMode>().is_err());
}

#[test]
fn record_set_round_trips_through_json() {
    let mut set = RecordSet::new(vec!["pmid".to_string(), "km".to_string()]);
    let mut record = Record::new(0);
    record.insert("pmid", FieldValue::Text("1".to_string()));
    record.insert(
        "km",
        FieldValue::Quantity {
            raw: "2.3 mM".to_string(),
            parsed: ParsedValue::new(2.3, Some(Unit::Millimolar)),
        },
    );
    set.push(record);

    let json = serde_json::to_string(&set).expect("serialize record set");
    let round: RecordSet = serde_json::from_str(&json).expect("deserialize record set");
    assert_eq!(round.records, set.records);
    assert!(round.records[0].get("kcat").is_absent());
}

#[test]
fn diagnostic_code_exposes_magnitude() {
    assert_eq!(DiagnosticCode::OffByFactor(60.0).magnitude(), Some(60.0));
    assert_eq!(DiagnosticCode::WrongUnit.magnitude(), None);
    assert_eq!(DiagnosticCode::ValueDeviation(0.2).kind(), "value_deviation");
}
