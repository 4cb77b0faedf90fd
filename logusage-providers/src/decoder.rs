//! Tagged decoding of provider payloads.
//!
//! Every response the exporter reads is one of four JSON shapes. Callers name
//! the shape they expect with a [`PayloadKind`] and get back the matching
//! [`Payload`] variant, or a [`DecodeError`] carrying the kind and cause.

use logusage_core::{DailyUsage, LogEntity};
use std::fmt;

use crate::error::DecodeError;
use crate::{logentries, rapid7};

// ============================================================================
// Payload Kind
// ============================================================================

/// The payload shapes understood by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// Account or organization aggregate usage.
    AccountUsage,
    /// Log and log-set listing from the management API.
    LogListing,
    /// Per-log daily usage with string-encoded byte counts.
    LogDailyUsage,
    /// Per-day usage of every log in the account.
    AggregatedDailyUsage,
}

impl PayloadKind {
    /// Short name used in logs and errors.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AccountUsage => "account usage",
            Self::LogListing => "log listing",
            Self::LogDailyUsage => "log daily usage",
            Self::AggregatedDailyUsage => "aggregated daily usage",
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// Decoded Records
// ============================================================================

/// Account aggregate as reported by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountTotals {
    /// Account or organization identifier.
    pub id: String,
    /// Account display name.
    pub name: String,
    /// Bytes over the requested period.
    pub period_usage: f64,
}

/// Daily usage of a single log.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogDailyUsage {
    /// Log identifier echoed by the provider, if any.
    pub log_id: String,
    /// One entry per reported day, in response order.
    pub days: Vec<DailyUsage>,
}

impl LogDailyUsage {
    /// Number of days whose usage value was replaced by zero.
    pub fn parse_events(&self) -> usize {
        self.days.iter().filter(|d| d.unparsed).count()
    }
}

/// Usage of one log within an aggregated interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogIntervalUsage {
    /// Log identifier.
    pub log_id: String,
    /// Bytes ingested during the interval.
    pub bytes: u64,
}

/// One interval (day) of account-wide usage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalUsage {
    /// Interval start as reported (date or date-time).
    pub interval: String,
    /// Usage per log during the interval.
    pub logs: Vec<LogIntervalUsage>,
}

impl IntervalUsage {
    /// Calendar day of the interval (`YYYY-MM-DD`).
    pub fn day(&self) -> &str {
        self.interval
            .split(['T', ' '])
            .next()
            .unwrap_or(&self.interval)
    }
}

// ============================================================================
// Payload
// ============================================================================

/// A decoded payload, one variant per [`PayloadKind`].
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Account aggregate.
    AccountUsage(AccountTotals),
    /// Discovered logs in listing order.
    LogListing(Vec<LogEntity>),
    /// Daily usage of one log.
    LogDailyUsage(LogDailyUsage),
    /// Per-interval usage of all logs.
    AggregatedDailyUsage(Vec<IntervalUsage>),
}

impl Payload {
    /// Returns the kind of this payload.
    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::AccountUsage(_) => PayloadKind::AccountUsage,
            Self::LogListing(_) => PayloadKind::LogListing,
            Self::LogDailyUsage(_) => PayloadKind::LogDailyUsage,
            Self::AggregatedDailyUsage(_) => PayloadKind::AggregatedDailyUsage,
        }
    }
}

/// Decodes `bytes` as the given payload kind.
///
/// # Errors
///
/// Returns a [`DecodeError`] for malformed JSON or missing required fields.
pub fn decode(kind: PayloadKind, bytes: &[u8]) -> Result<Payload, DecodeError> {
    match kind {
        PayloadKind::AccountUsage => {
            logentries::parser::parse_account_usage(bytes).map(Payload::AccountUsage)
        }
        PayloadKind::LogListing => {
            logentries::parser::parse_log_listing(bytes).map(Payload::LogListing)
        }
        PayloadKind::LogDailyUsage => {
            logentries::parser::parse_log_daily_usage(bytes).map(Payload::LogDailyUsage)
        }
        PayloadKind::AggregatedDailyUsage => {
            rapid7::parser::parse_aggregated_usage(bytes).map(Payload::AggregatedDailyUsage)
        }
    }
}

/// Decodes an account aggregate.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_account_usage(bytes: &[u8]) -> Result<AccountTotals, DecodeError> {
    match decode(PayloadKind::AccountUsage, bytes)? {
        Payload::AccountUsage(totals) => Ok(totals),
        other => Err(mismatch(PayloadKind::AccountUsage, &other)),
    }
}

/// Decodes a log listing.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_listing(bytes: &[u8]) -> Result<Vec<LogEntity>, DecodeError> {
    match decode(PayloadKind::LogListing, bytes)? {
        Payload::LogListing(logs) => Ok(logs),
        other => Err(mismatch(PayloadKind::LogListing, &other)),
    }
}

/// Decodes the daily usage of one log.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_log_daily_usage(bytes: &[u8]) -> Result<LogDailyUsage, DecodeError> {
    match decode(PayloadKind::LogDailyUsage, bytes)? {
        Payload::LogDailyUsage(usage) => Ok(usage),
        other => Err(mismatch(PayloadKind::LogDailyUsage, &other)),
    }
}

/// Decodes aggregated per-day usage.
///
/// # Errors
///
/// See [`decode`].
pub fn decode_aggregated_usage(bytes: &[u8]) -> Result<Vec<IntervalUsage>, DecodeError> {
    match decode(PayloadKind::AggregatedDailyUsage, bytes)? {
        Payload::AggregatedDailyUsage(intervals) => Ok(intervals),
        other => Err(mismatch(PayloadKind::AggregatedDailyUsage, &other)),
    }
}

fn mismatch(expected: PayloadKind, got: &Payload) -> DecodeError {
    DecodeError::new(expected, format!("decoder produced {} instead", got.kind()))
}

// ============================================================================
// Tests
// ============================================================================
