//! Rapid7 aggregated usage parser.

use logusage_core::DailyUsage;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

use crate::decoder::{IntervalUsage, LogIntervalUsage, PayloadKind};
use crate::error::DecodeError;

#[derive(Debug, Deserialize)]
struct AggregatedUsageResponse {
    #[serde(alias = "logs_usage")]
    usage: Vec<IntervalEntry>,
}

#[derive(Debug, Deserialize)]
struct IntervalEntry {
    interval: String,
    #[serde(default)]
    logs: Option<Vec<LogEntry>>,
}

#[derive(Debug, Deserialize)]
struct LogEntry {
    #[serde(alias = "log_id")]
    id: String,
    #[serde(default)]
    usage: u64,
}

/// Parses per-interval usage of every log in the organization.
pub fn parse_aggregated_usage(bytes: &[u8]) -> Result<Vec<IntervalUsage>, DecodeError> {
    debug!(len = bytes.len(), "Parsing aggregated usage");

    let response: AggregatedUsageResponse = serde_json::from_slice(bytes)
        .map_err(|e| DecodeError::from_json(PayloadKind::AggregatedDailyUsage, &e))?;

    Ok(response
        .usage
        .into_iter()
        .map(|entry| IntervalUsage {
            interval: entry.interval,
            logs: entry
                .logs
                .unwrap_or_default()
                .into_iter()
                .map(|log| LogIntervalUsage {
                    log_id: log.id,
                    bytes: log.usage,
                })
                .collect(),
        })
        .collect())
}

/// Regroups interval-major usage by log id, keeping interval order.
#[allow(clippy::cast_precision_loss)]
pub fn group_by_log(intervals: &[IntervalUsage]) -> HashMap<String, Vec<DailyUsage>> {
    let mut by_log: HashMap<String, Vec<DailyUsage>> = HashMap::new();

    for interval in intervals {
        for log in &interval.logs {
            by_log
                .entry(log.log_id.clone())
                .or_default()
                .push(DailyUsage::new(interval.day(), log.bytes as f64));
        }
    }

    by_log
}
