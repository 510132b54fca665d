//! Corruption handling tests for the sundose binary.
//!
//! These tests verify how the tool behaves with:
//! - Corrupted entry files
//! - Corrupted or invalid profile files
//! - Corrupted forecast files
//! - Stray files left by interrupted writes

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("sundose"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn set_profile(data_dir: &Path) {
    cli()
        .arg("profile")
        .arg("set")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--age")
        .arg("30")
        .arg("--target")
        .arg("4000")
        .arg("--skin-type")
        .arg("2")
        .arg("--location")
        .arg("Lisbon")
        .arg("--lat")
        .arg("38.7223")
        .arg("--lon=-9.1393")
        .assert()
        .success();
}

fn log_noon_session(data_dir: &Path) -> assert_cmd::assert::Assert {
    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--start")
        .arg("12:00")
        .arg("--end")
        .arg("12:30")
        .arg("--expose")
        .arg("torso")
        .arg("--uv")
        .arg("8.0")
        .assert()
}

#[test]
fn test_corrupted_entries_block_logging() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    set_profile(&data_dir);

    let entries_path = data_dir.join("entries.json");
    fs::write(&entries_path, "{ invalid json }}}}").expect("Failed to write corrupted entries");

    log_noon_session(&data_dir).failure();

    // The corrupted file is left untouched for manual repair.
    let raw = fs::read_to_string(&entries_path).unwrap();
    assert_eq!(raw, "{ invalid json }}}}");
}

#[test]
fn test_corrupted_entries_block_day_view() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("entries.json"), "not json").expect("Failed to write entries");

    cli()
        .arg("day")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure();
}

#[test]
fn test_corrupted_profile_blocks_logging() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("profile.json"), "{ broken").expect("Failed to write profile");

    log_noon_session(&data_dir).failure();

    assert!(!data_dir.join("entries.json").exists());
}

#[test]
fn test_out_of_range_skin_type_blocks_profile_show() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let profile = r#"{
        "age": 30,
        "target": 4000,
        "location": {"label": "Lisbon", "latitude": 38.7, "longitude": -9.1},
        "skin_type": 9
    }"#;
    fs::write(data_dir.join("profile.json"), profile).expect("Failed to write profile");

    cli()
        .arg("profile")
        .arg("show")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("skin type"));
}

#[test]
fn test_corrupted_forecast_is_ignored_with_explicit_uv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    set_profile(&data_dir);
    fs::write(data_dir.join("forecast.json"), "][").expect("Failed to write forecast");

    log_noon_session(&data_dir).success();
}

#[test]
fn test_corrupted_forecast_without_uv_flag_fails_cleanly() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    set_profile(&data_dir);
    fs::write(data_dir.join("forecast.json"), "][").expect("Failed to write forecast");

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--start")
        .arg("12:00")
        .arg("--end")
        .arg("12:30")
        .arg("--expose")
        .arg("torso")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no UV data"));
}

#[test]
fn test_empty_forecast_array_falls_through_to_error() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    set_profile(&data_dir);
    fs::write(
        data_dir.join("forecast.json"),
        r#"{"uv_index_clear_sky_max": []}"#,
    )
    .expect("Failed to write forecast");

    cli()
        .arg("log")
        .arg("--data-dir")
        .arg(&data_dir)
        .arg("--start")
        .arg("12:00")
        .arg("--end")
        .arg("12:30")
        .arg("--expose")
        .arg("torso")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no UV data"));
}

#[test]
fn test_no_stray_temp_files_after_logging() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    set_profile(&data_dir);
    log_noon_session(&data_dir).success();

    let names: Vec<String> = fs::read_dir(&data_dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(
        sorted,
        vec!["entries.json".to_string(), "profile.json".to_string()],
        "unexpected files in data dir: {:?}",
        names
    );
}

#[test]
fn test_relogging_over_existing_file_preserves_other_days() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    set_profile(&data_dir);

    let entries = r#"{"05-01-2025": {"09:00": {
        "duration": "1800",
        "reading": "500",
        "location": "Park",
        "body": {"torso": true}
    }}}"#;
    fs::write(data_dir.join("entries.json"), entries).expect("Failed to write entries");

    log_noon_session(&data_dir).success();

    let raw = fs::read_to_string(data_dir.join("entries.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();

    // The rewrite keeps the old day and migrates its string-encoded
    // reading to a number.
    assert_eq!(
        parsed["05-01-2025"]["09:00"]["reading"],
        serde_json::json!(500)
    );
    assert!(raw.contains("\"reading\":3954"));
}
