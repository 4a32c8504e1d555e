//! Binary smoke tests for the non-interactive commands

use assert_cmd::Command;
use predicates::prelude::*;

mod common;

const QUIET_CONFIG: &str = r#"
dispatch:
  mode: record
"#;

#[test]
fn test_catalog_json_is_parseable() {
    let (_dir, config_path) = common::temp_config_file(QUIET_CONFIG);
    let output = Command::cargo_bin("ecopure")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("catalog")
        .arg("--json")
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["product"]["contact"], "918317581308");
    assert_eq!(json["product"]["variants"][2]["price"], 750);
}

#[test]
fn test_catalog_table_lists_sizes() {
    let (_dir, config_path) = common::temp_config_file(QUIET_CONFIG);
    Command::cargo_bin("ecopure")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("catalog")
        .assert()
        .success()
        .stdout(predicate::str::contains("100 ml"))
        .stdout(predicate::str::contains("₹750"));
}

#[test]
fn test_metadata_for_selected_size() {
    let (_dir, config_path) = common::temp_config_file(QUIET_CONFIG);
    Command::cargo_bin("ecopure")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("metadata")
        .arg("--size")
        .arg("500 ml")
        .arg("--url")
        .arg("https://shop.example.in/")
        .assert()
        .success()
        .stdout(predicate::str::contains("application/ld+json"))
        .stdout(predicate::str::contains("\"price\":750"))
        .stdout(predicate::str::contains("https://shop.example.in/"));
}

#[test]
fn test_metadata_unknown_size_fails() {
    let (_dir, config_path) = common::temp_config_file(QUIET_CONFIG);
    Command::cargo_bin("ecopure")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("metadata")
        .arg("--size")
        .arg("1 litre")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown variant"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_dir, config_path) = common::temp_config_file(
        r#"
geolocation:
  provider: http
"#,
    );
    Command::cargo_bin("ecopure")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("catalog")
        .assert()
        .failure()
        .stderr(predicate::str::contains("geolocation.endpoint"));
}

#[test]
fn test_version_flag() {
    Command::cargo_bin("ecopure")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ecopure"));
}
