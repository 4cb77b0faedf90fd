// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Log Usage Core
//!
//! Core types and models shared by every crate of the log usage exporter.
//!
//! ## Key Types
//!
//! ### Account & Service
//! - [`ServiceVariant`] - Which provider family is polled (Logentries / Rapid7)
//! - [`Region`] - Data-center region for region-aware variants
//! - [`Credential`] - API key plus account selector, immutable per process
//!
//! ### Logs
//! - [`LogSet`] - A named grouping of logs
//! - [`LogEntity`] - A log and the log-sets it belongs to
//!
//! ### Usage
//! - [`UsageSample`] - One per-log, per-day byte count
//! - [`AccountUsage`] - Account-wide aggregate for a window
//! - [`DailyUsage`] - A single decoded day of usage
//!
//! ### Windows & Budgets
//! - [`CollectionWindow`] - Inclusive calendar date range
//! - [`RateBudget`] - Static fixed-window rate limit configuration

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Account & service
    Credential,
    Region,
    ServiceVariant,
    // Logs
    LogEntity,
    LogSet,
    // Usage
    AccountUsage,
    DailyUsage,
    TRANSPORT_FAILURE_STATUS,
    UsageSample,
    // Windows & budgets
    CollectionWindow,
    DEFAULT_COOLDOWN_SECS,
    DEFAULT_RATE_LIMIT,
    RateBudget,
};
