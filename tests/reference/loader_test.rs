use std::fs;

use growth_curves::reference::loader::{
    ReferenceBundle, find_bundle_files, load_bundle, load_bundle_dir, load_store, load_who_lms,
};
use growth_curves::{
    AgeDomain, AgeUnit, GrowthError, Parameter, ReferenceTableKey, ReferenceTableStore, Sex,
};

use crate::utils::{fixture_store, scratch_dir};

#[test]
fn test_bundle_file_round_trip() {
    let dir = scratch_dir("bundle-round-trip");
    let path = dir.join("tables.json");

    let store = fixture_store();
    let bundle = ReferenceBundle::from_store(&store);
    fs::write(&path, serde_json::to_string_pretty(&bundle).unwrap()).unwrap();

    let loaded = load_store(&path).unwrap();
    assert_eq!(loaded.len(), store.len());
    for key in store.keys() {
        assert_eq!(loaded.get(&key).unwrap(), store.get(&key).unwrap(), "{key}");
    }
}

#[test]
fn test_invalid_bundle_reports_table_error() {
    let dir = scratch_dir("invalid-bundle");
    let path = dir.join("broken.json");
    fs::write(
        &path,
        r#"{"tables": [{
            "key": {"sex": "female", "parameter": "weight", "population": "standard", "age_domain": "infant"},
            "table": {"name": "one_row", "age_unit": "months", "value_unit": "kg", "kind": "lms",
                      "rows": [{"age": 0, "l": 0.38, "m": 3.2, "s": 0.14}]}
        }]}"#,
    )
    .unwrap();

    let err = load_bundle(&path).unwrap_err();
    assert!(matches!(err, GrowthError::InvalidTable { .. }));
    assert!(err.to_string().contains("at least 2 rows"));
}

#[test]
fn test_bundle_dir_skips_unparseable_files() {
    let dir = scratch_dir("bundle-dir");
    let store = fixture_store();
    let bundle = ReferenceBundle::from_store(&store);
    fs::write(dir.join("a_tables.json"), serde_json::to_string(&bundle).unwrap()).unwrap();
    fs::write(dir.join("b_broken.json"), "{ not json").unwrap();
    fs::write(dir.join("notes.txt"), "ignored").unwrap();

    assert_eq!(find_bundle_files(&dir).unwrap().len(), 2);

    let mut builder = ReferenceTableStore::builder();
    let count = load_bundle_dir(&dir, &mut builder).unwrap();
    assert_eq!(count, store.len());
    assert_eq!(builder.build().len(), store.len());
}

#[test]
fn test_conflicting_bundles_fail() {
    let dir = scratch_dir("bundle-conflict");
    let bundle = ReferenceBundle::from_store(&fixture_store());
    let json = serde_json::to_string(&bundle).unwrap();
    fs::write(dir.join("first.json"), &json).unwrap();
    fs::write(dir.join("second.json"), &json).unwrap();

    let mut builder = ReferenceTableStore::builder();
    assert!(load_bundle_dir(&dir, &mut builder).is_err());
}

#[test]
fn test_who_text_file() {
    let dir = scratch_dir("who-text");
    let path = dir.join("bmi_for_age_girls_5-19years.csv");
    fs::write(
        &path,
        "Age,L,M,S,P3,P50,P97\n5.0,-0.8,15.2,0.08,13.2,15.2,18.0\n5.5,-0.8,15.2,0.081,13.2,15.2,18.1\n6.0,-0.9,15.3,0.083,13.2,15.3,18.3\n",
    )
    .unwrap();

    let key = ReferenceTableKey::standard(Sex::Female, Parameter::Bmi, AgeDomain::ChildAdolescent);
    let table = load_who_lms(&path, &key).unwrap();
    assert_eq!(table.name(), "bmi_for_age_girls_5-19years");
    assert_eq!(table.age_unit(), AgeUnit::Years);
    assert_eq!(table.len(), 3);

    let mut builder = ReferenceTableStore::builder();
    builder.insert(key, table).unwrap();
    assert!(builder.build().contains(&key));
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = scratch_dir("missing-file");
    let err = load_bundle(&dir.join("absent.json")).unwrap_err();
    assert!(matches!(err, GrowthError::Io(_)));
    assert!(find_bundle_files(&dir.join("absent")).is_err());
}
