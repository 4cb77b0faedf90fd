//! Logentries response parsers.
//!
//! The account aggregate, log listing and per-log daily usage shapes are
//! shared by both variants; Rapid7 kept the Logentries management API.

use logusage_core::{DailyUsage, LogEntity, LogSet};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::decoder::{AccountTotals, LogDailyUsage, PayloadKind};
use crate::error::DecodeError;

// ============================================================================
// Account Usage
// ============================================================================

#[derive(Debug, Deserialize)]
struct AccountUsageBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    period_usage: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AccountUsageEnvelope {
    Wrapped { usage: AccountUsageBody },
    Flat(AccountUsageBody),
}

/// Parses an account aggregate, either flat or wrapped in `usage`.
pub fn parse_account_usage(bytes: &[u8]) -> Result<AccountTotals, DecodeError> {
    debug!(len = bytes.len(), "Parsing account usage");

    let envelope: AccountUsageEnvelope = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::from_json(PayloadKind::AccountUsage, &e))?;

    let body = match envelope {
        AccountUsageEnvelope::Wrapped { usage } | AccountUsageEnvelope::Flat(usage) => usage,
    };

    Ok(AccountTotals {
        id: body.id.unwrap_or_default(),
        name: body.name.unwrap_or_default(),
        period_usage: body.period_usage.max(0.0),
    })
}

// ============================================================================
// Log Listing
// ============================================================================

#[derive(Debug, Deserialize)]
struct ListLogs {
    logs: Vec<ListedLog>,
}

#[derive(Debug, Deserialize)]
struct ListedLog {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    logsets_info: Option<Vec<ListedLogSet>>,
}

#[derive(Debug, Deserialize)]
struct ListedLogSet {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Parses the management API log listing.
pub fn parse_log_listing(bytes: &[u8]) -> Result<Vec<LogEntity>, DecodeError> {
    debug!(len = bytes.len(), "Parsing log listing");

    let listing: ListLogs = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::from_json(PayloadKind::LogListing, &e))?;

    let logs: Vec<LogEntity> = listing
        .logs
        .into_iter()
        .map(|log| LogEntity {
            id: log.id,
            name: log.name.unwrap_or_default(),
            logsets: log
                .logsets_info
                .unwrap_or_default()
                .into_iter()
                .map(|set| LogSet::new(set.id.unwrap_or_default(), set.name.unwrap_or_default()))
                .collect(),
        })
        .collect();

    debug!(logs = logs.len(), "Parsed log listing");
    Ok(logs)
}

// ============================================================================
// Per-Log Daily Usage
// ============================================================================

#[derive(Debug, Deserialize)]
struct LogUsageResponse {
    usage: LogUsageBody,
}

#[derive(Debug, Deserialize)]
struct LogUsageBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    daily_usage: Option<Vec<DailyUsageEntry>>,
}

#[derive(Debug, Deserialize)]
struct DailyUsageEntry {
    #[serde(default)]
    day: Option<String>,
    #[serde(default)]
    usage: Option<Value>,
}

/// Parses the daily usage of one log.
///
/// Usage values are decimal strings. Missing, non-numeric, or negative values
/// become zero and are flagged as unparsed.
pub fn parse_log_daily_usage(bytes: &[u8]) -> Result<LogDailyUsage, DecodeError> {
    debug!(len = bytes.len(), "Parsing log daily usage");

    let response: LogUsageResponse = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::from_json(PayloadKind::LogDailyUsage, &e))?;

    let log_id = response.usage.id.unwrap_or_default();
    let days = response
        .usage
        .daily_usage
        .unwrap_or_default()
        .into_iter()
        .map(|entry| {
            let day = entry.day.unwrap_or_default();
            match entry.usage.as_ref().and_then(parse_usage_value) {
                Some(bytes) => DailyUsage::new(day, bytes),
                None => {
                    warn!(
                        log_id = %log_id,
                        day = %day,
                        raw = ?entry.usage,
                        "Unparseable usage value"
                    );
                    DailyUsage::unparsed(day)
                }
            }
        })
        .collect();

    Ok(LogDailyUsage { log_id, days })
}

/// Reads a usage value given as a decimal string (or, leniently, a number).
fn parse_usage_value(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };

    (parsed.is_finite() && parsed >= 0.0).then_some(parsed)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_account_usage() {
        let json = r#"{"id": "acct-1", "name": "Production", "period_usage": 123456}"#;
        let totals = parse_account_usage(json.as_bytes()).unwrap();
        assert_eq!(totals.id, "acct-1");
        assert_eq!(totals.name, "Production");
        assert_eq!(totals.period_usage, 123_456.0);
    }

    #[test]
    fn test_parse_wrapped_account_usage() {
        let json = r#"{"usage": {"id": "org", "name": "Org", "period_usage": 42, "period": {"from": "2024-01-01", "to": "2024-01-31"}}}"#;
        let totals = parse_account_usage(json.as_bytes()).unwrap();
        assert_eq!(totals.id, "org");
        assert_eq!(totals.period_usage, 42.0);
    }

    #[test]
    fn test_account_usage_requires_period_usage() {
        let err = parse_account_usage(br#"{"id": "acct"}"#).unwrap_err();
        assert_eq!(err.kind, PayloadKind::AccountUsage);
    }

    #[test]
    fn test_parse_listing_with_multiple_logsets() {
        let json = r#"{
            "logs": [
                {
                    "id": "A",
                    "name": "alpha",
                    "logsets_info": [
                        {"id": "1", "name": "s1", "links": [{"href": "https://x", "rel": "self"}]}
                    ],
                    "user_data": {"le_agent_filename": "", "le_agent_follow": "false"},
                    "tokens": [],
                    "source_type": "token",
                    "token_seed": null,
                    "structures": []
                },
                {
                    "id": "B",
                    "name": "beta",
                    "logsets_info": [{"id": "1", "name": "s1"}, {"id": "2", "name": "s2"}]
                }
            ]
        }"#;

        let logs = parse_log_listing(json.as_bytes()).unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].id, "A");
        assert_eq!(logs[0].logsets.len(), 1);
        assert_eq!(logs[1].membership_names(), vec!["s1", "s2"]);
    }

    #[test]
    fn test_listing_without_logsets() {
        let json = r#"{"logs": [{"id": "C", "name": "gamma"}, {"id": "D", "name": "delta", "logsets_info": null}]}"#;
        let logs = parse_log_listing(json.as_bytes()).unwrap();
        assert!(logs[0].logsets.is_empty());
        assert!(logs[1].logsets.is_empty());
    }

    #[test]
    fn test_listing_requires_logs() {
        assert!(parse_log_listing(br#"{"items": []}"#).is_err());
    }

    #[test]
    fn test_parse_daily_usage() {
        let json = r#"{
            "usage": {
                "id": "A",
                "period": {"from": "2024-01-01", "to": "2024-01-02"},
                "daily_usage": [
                    {"day": "2024-01-01", "usage": "100"},
                    {"day": "2024-01-02", "usage": "2048.5"}
                ]
            }
        }"#;

        let usage = parse_log_daily_usage(json.as_bytes()).unwrap();
        assert_eq!(usage.log_id, "A");
        assert_eq!(usage.days.len(), 2);
        assert_eq!(usage.days[0].bytes, 100.0);
        assert_eq!(usage.days[1].bytes, 2048.5);
        assert_eq!(usage.parse_events(), 0);
    }

    #[test]
    fn test_unparseable_usage_becomes_zero() {
        let json = r#"{"usage": {"daily_usage": [
            {"day": "2024-01-01", "usage": "n/a"},
            {"day": "2024-01-02"},
            {"day": "2024-01-03", "usage": "-7"},
            {"day": "2024-01-04", "usage": 12}
        ]}}"#;

        let usage = parse_log_daily_usage(json.as_bytes()).unwrap();
        assert_eq!(usage.parse_events(), 3);
        assert!(usage.days[..3].iter().all(|d| d.bytes == 0.0));
        assert_eq!(usage.days[3].bytes, 12.0);
    }

    #[test]
    fn test_empty_daily_usage() {
        let usage = parse_log_daily_usage(br#"{"usage": {"daily_usage": []}}"#).unwrap();
        assert!(usage.days.is_empty());

        let usage = parse_log_daily_usage(br#"{"usage": {}}"#).unwrap();
        assert!(usage.days.is_empty());
    }
}
