//! Parser edge case and error handling tests.
//!
//! These tests verify decoder behavior with malformed, partial, or edge case inputs.

#[cfg(test)]
mod listing_edge_tests {
    use crate::decoder::{PayloadKind, decode_listing};

    #[test]
    fn test_parse_empty_listing() {
        let logs = decode_listing(br#"{"logs": []}"#).unwrap();
        assert!(logs.is_empty());
    }

    #[test]
    fn test_parse_null_optional_fields() {
        let json = r#"{"logs": [{"id": "A", "name": null, "logsets_info": null}]}"#;
        let logs = decode_listing(json.as_bytes()).unwrap();
        assert_eq!(logs[0].id, "A");
        assert_eq!(logs[0].name, "");
        assert_eq!(logs[0].membership_names(), vec![""]);
    }

    #[test]
    fn test_parse_unknown_fields_ignored() {
        let json = r#"{
            "logs": [{
                "id": "A",
                "name": "web",
                "source_type": "token",
                "user_data": {"le_agent_filename": ""},
                "logsets_info": [{"id": "S", "name": "prod", "links": []}]
            }],
            "links": []
        }"#;
        let logs = decode_listing(json.as_bytes()).unwrap();
        assert_eq!(logs[0].logsets[0].name, "prod");
    }

    #[test]
    fn test_listing_order_preserved() {
        let json = r#"{"logs": [{"id": "C"}, {"id": "A"}, {"id": "B"}]}"#;
        let ids: Vec<_> = decode_listing(json.as_bytes())
            .unwrap()
            .into_iter()
            .map(|l| l.id)
            .collect();
        assert_eq!(ids, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_missing_logs_key_is_an_error() {
        let err = decode_listing(br#"{"items": []}"#).unwrap_err();
        assert_eq!(err.kind, PayloadKind::LogListing);
    }

    #[test]
    fn test_log_without_id_is_an_error() {
        assert!(decode_listing(br#"{"logs": [{"name": "orphan"}]}"#).is_err());
    }

    #[test]
    fn test_truncated_json_is_an_error() {
        assert!(decode_listing(br#"{"logs": [{"id": "A""#).is_err());
    }

    #[test]
    fn test_empty_body_is_an_error() {
        assert!(decode_listing(b"").is_err());
    }
}

#[cfg(test)]
mod daily_usage_edge_tests {
    use crate::decoder::decode_log_daily_usage;

    #[test]
    fn test_string_usage_values() {
        let json = r#"{"usage": {"id": "A", "daily_usage": [
            {"day": "2024-01-01", "usage": "1024"},
            {"day": "2024-01-02", "usage": " 2048.5 "}
        ]}}"#;
        let usage = decode_log_daily_usage(json.as_bytes()).unwrap();
        assert_eq!(usage.days[0].bytes, 1024.0);
        assert_eq!(usage.days[1].bytes, 2048.5);
        assert_eq!(usage.parse_events(), 0);
    }

    #[test]
    fn test_numeric_usage_values_accepted() {
        let json = r#"{"usage": {"daily_usage": [{"day": "2024-01-01", "usage": 77}]}}"#;
        let usage = decode_log_daily_usage(json.as_bytes()).unwrap();
        assert_eq!(usage.days[0].bytes, 77.0);
    }

    #[test]
    fn test_garbage_usage_values_become_parse_events() {
        let json = r#"{"usage": {"daily_usage": [
            {"day": "2024-01-01", "usage": "n/a"},
            {"day": "2024-01-02", "usage": null},
            {"day": "2024-01-03"},
            {"day": "2024-01-04", "usage": "-5"},
            {"day": "2024-01-05", "usage": "NaN"},
            {"day": "2024-01-06", "usage": {"bytes": 1}}
        ]}}"#;
        let usage = decode_log_daily_usage(json.as_bytes()).unwrap();
        assert_eq!(usage.days.len(), 6);
        assert_eq!(usage.parse_events(), 6);
        assert!(usage.days.iter().all(|d| d.bytes == 0.0));
    }

    #[test]
    fn test_missing_daily_usage_yields_no_days() {
        let usage = decode_log_daily_usage(br#"{"usage": {"id": "A"}}"#).unwrap();
        assert!(usage.days.is_empty());
        assert_eq!(usage.log_id, "A");
    }

    #[test]
    fn test_missing_usage_envelope_is_an_error() {
        assert!(decode_log_daily_usage(br#"{"daily_usage": []}"#).is_err());
    }

    #[test]
    fn test_error_body_is_an_error() {
        // Typical body of a 403 response
        assert!(decode_log_daily_usage(br#"{"message": "Forbidden"}"#).is_err());
    }
}

#[cfg(test)]
mod aggregated_edge_tests {
    use crate::decoder::decode_aggregated_usage;
    use crate::rapid7::group_by_log;

    #[test]
    fn test_interval_without_logs() {
        let json = r#"{"usage": [{"interval": "2024-01-01", "logs": null}]}"#;
        let intervals = decode_aggregated_usage(json.as_bytes()).unwrap();
        assert!(intervals[0].logs.is_empty());
        assert!(group_by_log(&intervals).is_empty());
    }

    #[test]
    fn test_missing_usage_value_defaults_to_zero() {
        let json = r#"{"usage": [{"interval": "2024-01-01", "logs": [{"id": "A"}]}]}"#;
        let intervals = decode_aggregated_usage(json.as_bytes()).unwrap();
        assert_eq!(intervals[0].logs[0].bytes, 0);
    }

    #[test]
    fn test_negative_usage_is_an_error() {
        let json = r#"{"usage": [{"interval": "2024-01-01", "logs": [{"id": "A", "usage": -1}]}]}"#;
        assert!(decode_aggregated_usage(json.as_bytes()).is_err());
    }

    #[test]
    fn test_wrong_top_level_shape_is_an_error() {
        assert!(decode_aggregated_usage(br#"[]"#).is_err());
    }
}

#[cfg(test)]
mod account_edge_tests {
    use crate::decoder::decode_account_usage;

    #[test]
    fn test_negative_period_usage_clamped() {
        let totals = decode_account_usage(br#"{"period_usage": -10}"#).unwrap();
        assert_eq!(totals.period_usage, 0.0);
        assert_eq!(totals.id, "");
    }

    #[test]
    fn test_string_period_usage_is_an_error() {
        assert!(decode_account_usage(br#"{"period_usage": "10"}"#).is_err());
    }
}
