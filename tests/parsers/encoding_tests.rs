//! Tests for text recovery through the full decode path
//!
//! Tests cover:
//! - Latin-1 exports with non-ASCII labels and units
//! - Disabled fallback
//! - Byte order marks

#[path = "../common/mod.rs"]
mod common;

use common::example_files::*;
use common::read_example_binary;
use common::series::SeriesExt;
use common::synthetic::*;
use vcdslog::parsers::encoding::recover_text;
use vcdslog::parsers::{decode, DecodeErrorKind, HeaderSchema, Parseable, TextEncoding, Vcds};

/// Encode text as Latin-1, one byte per char
fn latin1_bytes(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).expect("char outside Latin-1"))
        .collect()
}

fn german_export() -> String {
    vcds_csv(
        ",Group 1:",
        ",,Kühlmitteltemperatur,Öldruck",
        ",,°C,bar",
        &[",0.0,91,2.5"],
    )
}

// ============================================
// Latin-1 Fallback Tests
// ============================================

#[test]
fn test_latin1_labels_and_units() {
    let data = latin1_bytes(&german_export());
    let log = decode(&data).expect("Should decode via Latin-1");

    let group = &log.groups[0];
    assert_eq!(group.sensors[0].name, "Kühlmitteltemperatur");
    assert_eq!(group.sensors[0].unit(), "°C");
    assert_eq!(group.sensors[1].name, "Öldruck");
    assert_eq!(group.sensors[1].values(), vec![Some(2.5)]);
}

#[test]
fn test_latin1_and_utf8_decode_identically() {
    let text = german_export();
    let from_utf8 = decode(text.as_bytes()).unwrap();
    let from_latin1 = decode(&latin1_bytes(&text)).unwrap();
    assert_eq!(from_utf8, from_latin1);
}

#[test]
fn test_latin1_example_recovers_as_latin1() {
    let data = read_example_binary(VCDS_LATIN1);
    let (text, encoding) = recover_text(&data, Some(TextEncoding::Latin1)).unwrap();
    assert_eq!(encoding, TextEncoding::Latin1);
    assert!(text.contains("Kühlmitteltemperatur"));
    assert!(text.contains("\r\n"));
}

#[test]
fn test_utf8_example_recovers_as_utf8() {
    let data = read_example_binary(VCDS_TWO_GROUPS);
    let (_, encoding) = recover_text(&data, Some(TextEncoding::Latin1)).unwrap();
    assert_eq!(encoding, TextEncoding::Utf8);
}

// ============================================
// Disabled Fallback Tests
// ============================================

#[test]
fn test_disabled_fallback_is_encoding_error() {
    let schema = HeaderSchema {
        fallback_encoding: None,
        ..Default::default()
    };
    let decoder = Vcds::new(schema).unwrap();

    let err = decoder.parse(&latin1_bytes(&german_export())).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::EncodingError);
    assert!(err.detail().contains("invalid UTF-8"));

    // Plain UTF-8 is unaffected
    assert!(decoder.parse(german_export().as_bytes()).is_ok());
}

// ============================================
// Byte Order Mark Tests
// ============================================

#[test]
fn test_bom_prefixed_export() {
    let mut data = b"\xEF\xBB\xBF".to_vec();
    data.extend_from_slice(single_sensor_csv(&[",0.0,800"]).as_bytes());

    let log = decode(&data).expect("BOM should be ignored");
    // The BOM would otherwise corrupt the weekday cell
    assert_eq!(log.captured_at.date().to_string(), "2025-02-13");
    assert_eq!(log.vin, VIN);
}
