//! File loading integration tests
//!
//! Tests for end-to-end loading of example exports from disk.

#[path = "../common/mod.rs"]
mod common;

use common::assertions::*;
use common::example_files::*;
use common::{example_file_exists, read_example_binary};
use std::path::Path;
use vcdslog::parsers::{is_csv_path, DecodeErrorKind, Parseable, Vcds};
use vcdslog::settings::Settings;

// ============================================
// Example File Loading Tests
// ============================================

#[test]
fn test_example_files_present() {
    for path in [VCDS_TWO_GROUPS, VCDS_LATIN1, VCDS_NO_GROUPS] {
        assert!(example_file_exists(path), "Missing example file {}", path);
        assert!(is_csv_path(Path::new(path)));
    }
}

#[test]
fn test_load_example_complete_cycle() {
    let data = read_example_binary(VCDS_TWO_GROUPS);

    // Parse with the layout from default settings
    let decoder = Vcds::new(Settings::default().schema).expect("Default layout is valid");
    let log = decoder.parse(&data).expect("Should parse");

    // Validate
    assert_valid_log_structure(&log);
    assert_finite_values(&log);
    assert_eq!(log.groups.len(), 2);
    assert_eq!(log.sensor_count(), 5);
    // 7 rows for group A sensors, 6 for group B
    assert_eq!(log.reading_count(), 3 * 7 + 2 * 6);
}

#[test]
fn test_load_all_examples_independently() {
    let decoder = Vcds::default();
    let results: Vec<_> = [VCDS_TWO_GROUPS, VCDS_LATIN1, VCDS_NO_GROUPS]
        .iter()
        .map(|path| decoder.parse(&read_example_binary(path)))
        .collect();

    assert!(results[0].is_ok());
    assert!(results[1].is_ok());
    assert_eq!(
        results[2].as_ref().unwrap_err().kind(),
        DecodeErrorKind::StructureError
    );
}

#[test]
fn test_decoded_log_serializes() {
    let log = Vcds::default()
        .parse(&read_example_binary(VCDS_LATIN1))
        .unwrap();
    let json = serde_json::to_value(&log).unwrap();

    assert_eq!(json["vin"], "WAUZZZ8L0XA123456");
    assert_eq!(json["captured_at"], "2025-06-01T00:00:00");
    assert_eq!(json["groups"][0]["name"], "Group 4");
    let readings = &json["groups"][0]["sensors"][0]["readings"];
    assert_eq!(readings[2]["value"], serde_json::Value::Null);
}
