use std::fs;

use pinn_slice::{PlotError, SliceConfig};

#[test]
fn preset_round_trips_through_json_file() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("cavity.json");
    let config = SliceConfig::lid_driven_cavity();
    fs::write(&path, config.to_json().unwrap()).unwrap();

    let loaded = SliceConfig::from_json_file(&path).expect("failed to load config");
    assert_eq!(loaded, config);
}

#[test]
fn broken_json_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"title\": ").unwrap();
    assert!(matches!(
        SliceConfig::from_json_file(&path),
        Err(PlotError::Config(_))
    ));
}

#[test]
fn missing_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = SliceConfig::from_json_file(dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, PlotError::Config(_)));
}
