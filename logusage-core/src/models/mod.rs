//! Domain models for the log usage exporter.
//!
//! ## Submodules
//!
//! - [`service`] - Service variant, region, and credential
//! - [`log`] - Logs and log-sets as discovered from the management API
//! - [`usage`] - Usage samples and account aggregates
//! - [`window`] - Collection windows and rate budgets

mod log;
mod service;
mod usage;
mod window;

// Re-export everything at the models level
pub use log::{LogEntity, LogSet};
pub use service::{Credential, Region, ServiceVariant};
pub use usage::{AccountUsage, DailyUsage, TRANSPORT_FAILURE_STATUS, UsageSample};
pub use window::{CollectionWindow, DEFAULT_COOLDOWN_SECS, DEFAULT_RATE_LIMIT, RateBudget};

#[cfg(test)]
mod serde_tests;
