//! Serde tests for core types.
//!
//! Config files and debug dumps rely on these representations.

use chrono::NaiveDate;

use crate::{CollectionWindow, LogEntity, Region, ServiceVariant, UsageSample};

// ============================================================================
// Service Selection
// ============================================================================

#[test]
fn test_service_variant_serializes_lowercase() {
    for variant in ServiceVariant::all() {
        let json = serde_json::to_string(variant).unwrap();
        assert_eq!(json, format!("\"{}\"", variant.cli_name()));
    }
}

#[test]
fn test_region_deserialize_lowercase() {
    let cases = vec![
        (r#""us""#, Region::Us),
        (r#""eu""#, Region::Eu),
        (r#""ca""#, Region::Ca),
        (r#""au""#, Region::Au),
    ];

    for (json, expected) in cases {
        let region: Region = serde_json::from_str(json).unwrap();
        assert_eq!(region, expected, "Failed for {}", json);
    }
}

#[test]
fn test_region_invalid_deserialize() {
    let result: Result<Region, _> = serde_json::from_str(r#""moon""#);
    assert!(result.is_err());
}

// ============================================================================
// Logs & Samples
// ============================================================================

#[test]
fn test_log_entity_without_logsets_field() {
    let log: LogEntity = serde_json::from_str(r#"{"id": "A", "name": "alpha"}"#).unwrap();
    assert!(log.logsets.is_empty());
}

#[test]
fn test_zero_sample_serializes_null_day() {
    let log = LogEntity::new("B", "beta");
    let sample = UsageSample::zero(&log, "s1", 500);
    let value = serde_json::to_value(&sample).unwrap();
    assert!(value["day"].is_null());
    assert_eq!(value["status"], 500);
}

#[test]
fn test_window_serializes_iso_dates() {
    let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
    let value = serde_json::to_value(CollectionWindow::single_day(day)).unwrap();
    assert_eq!(value["from"], "2024-03-09");
    assert_eq!(value["to"], "2024-03-09");
}
