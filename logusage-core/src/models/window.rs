//! Collection windows and rate budgets.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::error::CoreError;

/// Date format used in usage query parameters.
const QUERY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Default number of usage requests per window.
pub const DEFAULT_RATE_LIMIT: u32 = 400;

/// Default pause once the budget is spent.
pub const DEFAULT_COOLDOWN_SECS: u64 = 300;

// ============================================================================
// Collection Window
// ============================================================================

/// An inclusive range of calendar dates a usage query covers.
///
/// Invariant: `from <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionWindow {
    from: NaiveDate,
    to: NaiveDate,
}

impl CollectionWindow {
    /// A window covering exactly one day.
    pub fn single_day(day: NaiveDate) -> Self {
        Self { from: day, to: day }
    }

    /// A single-day window for the day before `today`.
    pub fn yesterday(today: NaiveDate) -> Self {
        Self::single_day(today.pred_opt().unwrap_or(today))
    }

    /// The full calendar month containing `day`, first through last day.
    pub fn month_of(day: NaiveDate) -> Self {
        let first = day.with_day(1).unwrap_or(day);
        let last = first
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .unwrap_or(day);
        Self { from: first, to: last }
    }

    /// First day of the window.
    pub fn from(&self) -> NaiveDate {
        self.from
    }

    /// Last day of the window.
    pub fn to(&self) -> NaiveDate {
        self.to
    }

    /// `from` formatted as a query parameter.
    pub fn from_param(&self) -> String {
        self.from.format(QUERY_DATE_FORMAT).to_string()
    }

    /// `to` formatted as a query parameter.
    pub fn to_param(&self) -> String {
        self.to.format(QUERY_DATE_FORMAT).to_string()
    }
}

impl fmt::Display for CollectionWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.from_param(), self.to_param())
    }
}

// ============================================================================
// Rate Budget
// ============================================================================

/// Static configuration of the fixed-window request budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateBudget {
    limit: u32,
    cooldown: Duration,
}

impl RateBudget {
    /// Creates a budget of `limit` requests followed by a `cooldown` pause.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidConfig` if `limit` is zero.
    pub fn new(limit: u32, cooldown: Duration) -> Result<Self, CoreError> {
        if limit == 0 {
            return Err(CoreError::InvalidConfig(
                "rate limit must be at least 1".to_string(),
            ));
        }
        Ok(Self { limit, cooldown })
    }

    /// Requests allowed before a pause.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Pause applied once the limit is reached.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl Default for RateBudget {
    fn default() -> Self {
        Self {
            limit: DEFAULT_RATE_LIMIT,
            cooldown: Duration::from_secs(DEFAULT_COOLDOWN_SECS),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
