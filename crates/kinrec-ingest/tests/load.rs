use std::fs;

use kinrec_ingest::{IngestError, load_record_set, read_csv_table};
use kinrec_model::{FieldCatalog, FieldValue, QuantityKind, Unit};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn loads_typed_records_from_csv() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "extracted.csv",
        "pmid,enzyme,kcat,km\n\
         123,lactase,33 ± 2 s^-1,0.5 mM\n\
         123,lactase,n.d.,\n\
         456,\"beta-galactosidase, E. coli\",12 bananas,4 µM\n",
    );

    let loaded = load_record_set(&path, &FieldCatalog::builtin()).unwrap();
    assert_eq!(loaded.set.columns, vec!["pmid", "enzyme", "kcat", "km"]);
    assert_eq!(loaded.set.len(), 3);

    let first = &loaded.set.records[0];
    assert_eq!(first.index, 0);
    match first.get("kcat") {
        FieldValue::Quantity { parsed, .. } => {
            assert_eq!(parsed.mantissa, 33.0);
            assert_eq!(parsed.unit, Some(Unit::PerSecond));
        }
        other => panic!("expected a quantity, got {other:?}"),
    }
    assert_eq!(loaded.set.records[1].get("km"), &FieldValue::Absent);
    assert_eq!(
        loaded.set.records[2].text("enzyme"),
        Some("beta-galactosidase, E. coli")
    );

    assert_eq!(loaded.unrecognized.len(), 1);
    assert_eq!(loaded.unrecognized[0].field, "kcat");
    assert_eq!(loaded.unrecognized[0].text, "12 bananas");
}

#[test]
fn catalog_overrides_decide_which_columns_are_parsed() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "reference.csv", "pmid,kon\n1,2e6 M^-1 s^-1\n");

    let plain = load_record_set(&path, &FieldCatalog::builtin()).unwrap();
    assert!(matches!(plain.set.records[0].get("kon"), FieldValue::Text(_)));

    let kinds = [("kon".to_string(), QuantityKind::Specificity)].into();
    let catalog = FieldCatalog::builtin().with_quantity_kinds(&kinds);
    let typed = load_record_set(&path, &catalog).unwrap();
    assert!(matches!(
        typed.set.records[0].get("kon"),
        FieldValue::Quantity { .. }
    ));
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.csv");

    let err = read_csv_table(&path).unwrap_err();
    assert!(matches!(err, IngestError::FileNotFound { .. }));
    assert!(err.to_string().contains("absent.csv"));
}

#[test]
fn header_only_file_has_no_records() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "empty.csv", "pmid,kcat\n");

    let loaded = load_record_set(&path, &FieldCatalog::builtin()).unwrap();
    assert!(loaded.set.is_empty());
    assert_eq!(loaded.set.columns, vec!["pmid", "kcat"]);
}
