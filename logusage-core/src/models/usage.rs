//! Usage-related types.
//!
//! - [`DailyUsage`] - One decoded day of usage for a log
//! - [`UsageSample`] - A labeled per-log sample ready for exposition
//! - [`AccountUsage`] - Account-wide aggregate over a window

use serde::{Deserialize, Serialize};

use super::log::LogEntity;
use super::window::CollectionWindow;

/// Status label recorded when a request never produced an HTTP response.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;

// ============================================================================
// Daily Usage
// ============================================================================

/// One day of usage for a single log, as decoded from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyUsage {
    /// Calendar day as reported by the provider (`YYYY-MM-DD`).
    pub day: String,
    /// Bytes ingested on that day.
    pub bytes: f64,
    /// True if the provider value was missing or not numeric and was
    /// replaced by zero.
    #[serde(default)]
    pub unparsed: bool,
}

impl DailyUsage {
    /// Creates a parsed daily usage entry.
    pub fn new(day: impl Into<String>, bytes: f64) -> Self {
        Self {
            day: day.into(),
            bytes,
            unparsed: false,
        }
    }

    /// Creates an entry whose usage value could not be parsed.
    pub fn unparsed(day: impl Into<String>) -> Self {
        Self {
            day: day.into(),
            bytes: 0.0,
            unparsed: true,
        }
    }
}

// ============================================================================
// Usage Sample
// ============================================================================

/// A per-log usage sample attributed to one log-set membership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageSample {
    /// Log identifier.
    pub log_id: String,
    /// Log display name.
    pub log_name: String,
    /// Name of the log-set the usage is attributed to.
    pub logset: String,
    /// Day of the usage; `None` for the zero sample of a log without data.
    pub day: Option<String>,
    /// Byte count, never negative.
    pub bytes: f64,
    /// HTTP status of the usage request ([`TRANSPORT_FAILURE_STATUS`] if none).
    pub status: u16,
}

impl UsageSample {
    /// Creates a sample for one reported day.
    pub fn daily(log: &LogEntity, logset: &str, usage: &DailyUsage, status: u16) -> Self {
        Self {
            log_id: log.id.clone(),
            log_name: log.name.clone(),
            logset: logset.to_string(),
            day: Some(usage.day.clone()),
            bytes: usage.bytes.max(0.0),
            status,
        }
    }

    /// Creates the zero-byte sample of an observed log with no usage data.
    pub fn zero(log: &LogEntity, logset: &str, status: u16) -> Self {
        Self {
            log_id: log.id.clone(),
            log_name: log.name.clone(),
            logset: logset.to_string(),
            day: None,
            bytes: 0.0,
            status,
        }
    }
}

// ============================================================================
// Account Usage
// ============================================================================

/// Account-level aggregate usage over a collection window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountUsage {
    /// Account or organization identifier.
    pub account_id: String,
    /// Account display name.
    pub name: String,
    /// Total bytes over the window.
    pub bytes: f64,
    /// Window the aggregate covers.
    pub window: CollectionWindow,
}
