//! Property-based robustness checks for the decoder
//!
//! Arbitrary input must never panic, and decoding must be a pure function
//! of the input bytes.

#[path = "../common/mod.rs"]
mod common;

use common::assertions::*;
use common::synthetic::*;
use proptest::prelude::*;
use vcdslog::parsers::decode;

/// Data rows built from a mix of numbers, junk and blanks
fn data_row() -> impl Strategy<Value = String> {
    let cell = prop_oneof![
        any::<i32>().prop_map(|v| v.to_string()),
        (-1.0e6f64..1.0e6).prop_map(|v| format!("{:.3}", v)),
        Just(String::new()),
        Just("n/a".to_string()),
        "[a-z ]{0,6}",
    ];
    prop::collection::vec(cell, 0..8).prop_map(|cells| format!(",{}", cells.join(",")))
}

proptest! {
    #[test]
    fn test_arbitrary_bytes_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let first = decode(&data);
        let second = decode(&data);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_arbitrary_text_never_panics(text in "\\PC{0,400}") {
        let _ = decode(text.as_bytes());
    }

    #[test]
    fn test_random_data_body_keeps_header(rows in prop::collection::vec(data_row(), 0..40)) {
        let data: Vec<&str> = rows.iter().map(String::as_str).collect();
        let csv = vcds_csv(",Group 1,,,Group 2", ",,RPM,Load,,MAF", ",,rpm,%,,g/s", &data);

        let log = decode(csv.as_bytes()).expect("A valid header always decodes");
        prop_assert_eq!(log.groups.len(), 2);
        prop_assert_eq!(log.sensor_count(), 3);
        prop_assert!(log.reading_count() <= rows.len() * 3);
        assert_finite_values(&log);

        for group in &log.groups {
            for sensor in &group.sensors {
                prop_assert!(sensor.readings.len() <= rows.len());
            }
        }
    }
}
