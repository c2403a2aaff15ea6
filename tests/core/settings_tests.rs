//! Tests for settings persistence
//!
//! Tests cover:
//! - Default settings values
//! - Serialization/deserialization
//! - Settings roundtrip through a file
//! - Config path handling

use tempfile::TempDir;
use vcdslog::parsers::{HeaderSchema, Parseable, TextEncoding, Vcds};
use vcdslog::settings::{Settings, SettingsError};

// ============================================
// Default Settings Tests
// ============================================

#[test]
fn test_settings_default_version() {
    assert_eq!(Settings::default().version, 1);
}

#[test]
fn test_settings_default_schema() {
    let settings = Settings::default();
    assert_eq!(settings.schema, HeaderSchema::default());
    assert_eq!(settings.schema.data_start_row, 7);
    assert_eq!(settings.schema.fallback_encoding, Some(TextEncoding::Latin1));
}

// ============================================
// Serialization Tests
// ============================================

#[test]
fn test_settings_serialize_default() {
    let json = serde_json::to_string(&Settings::default()).unwrap();
    assert!(json.contains("version"));
    assert!(json.contains("\"group_marker\":\"Group\""));
    assert!(json.contains("\"fallback_encoding\":\"latin-1\""));
}

#[test]
fn test_settings_empty_object_uses_defaults() {
    let settings: Settings = serde_json::from_str("{}").unwrap();
    assert_eq!(settings, Settings::default());
}

#[test]
fn test_settings_partial_schema_override() {
    let json = r#"{"version": 1, "schema": {"date_format": "%A, %d. %B %Y", "timestamp_column": 2}}"#;
    let settings: Settings = serde_json::from_str(json).unwrap();
    assert_eq!(settings.schema.date_format, "%A, %d. %B %Y");
    assert_eq!(settings.schema.timestamp_column, 2);
    assert_eq!(settings.schema.group_row, 3);
}

// ============================================
// File Roundtrip Tests
// ============================================

#[test]
fn test_settings_roundtrip_through_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("settings.json");

    let mut settings = Settings::default();
    settings.schema.group_marker = "Block".to_string();
    settings.schema.fallback_encoding = None;
    settings.save_to(&path).unwrap();

    let loaded = Settings::load_from(&path).unwrap();
    assert_eq!(loaded, settings);
}

#[test]
fn test_loaded_schema_drives_decoder() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"schema": {"group_marker": "Block"}}"#).unwrap();

    let settings = Settings::load_from(&path).unwrap();
    let decoder = Vcds::new(settings.schema).unwrap();
    let csv = "Thursday,13,February,2025,x,V1-VCID:1\n,,AGU\n,\n,Block 1\n,,RPM\n,,rpm\n,\n,0.0,800\n";
    let log = decoder.parse(csv.as_bytes()).unwrap();
    assert_eq!(log.groups[0].name, "Block 1");
}

#[test]
fn test_load_missing_file_is_read_error() {
    let dir = TempDir::new().unwrap();
    let err = Settings::load_from(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, SettingsError::Read(_, _)));
}

#[test]
fn test_load_invalid_json_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = Settings::load_from(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse(_, _)));
    assert!(err.to_string().contains("settings.json"));
}

// ============================================
// Config Path Tests
// ============================================

#[test]
fn test_settings_path_is_in_config_dir() {
    if let (Some(dir), Some(path)) = (Settings::get_config_dir(), Settings::get_settings_path()) {
        assert!(dir.ends_with("vcdslog"));
        assert_eq!(path.parent(), Some(dir.as_path()));
        assert!(path.ends_with("settings.json"));
    }
}
