// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Log Usage Providers
//!
//! Service-specific knowledge for the log usage exporter.
//!
//! Each service module includes:
//!
//! - **API**: endpoint constants and URL builders
//! - **Parser**: response parsing for the shapes that service returns
//! - **Descriptor**: how usage is collected for that service
//!
//! ## Supported Services
//!
//! | Service | Listing | Per-log usage | Aggregated usage | Account window |
//! |---------|---------|---------------|------------------|----------------|
//! | Logentries | ✅ | ✅ | ❌ | Today |
//! | Rapid7 InsightOps | ✅ | ❌ | ✅ | Current month |
//!
//! ## Usage
//!
//! ```ignore
//! use logusage_providers::{ServiceDescriptor, decoder};
//!
//! let desc = ServiceDescriptor::for_credential(&credential);
//! let response = client.fetch(&desc.listing_url(), credential.api_key()).await?;
//! let logs = decoder::decode_listing(response.body.as_bytes())?;
//! ```

pub mod decoder;
pub mod descriptor;
pub mod error;

// Service modules (alphabetical)
pub mod logentries;
pub mod rapid7;

#[cfg(test)]
mod parser_edge_tests;

// Re-export key types
pub use decoder::{
    AccountTotals, IntervalUsage, LogDailyUsage, LogIntervalUsage, Payload, PayloadKind, decode,
};
pub use descriptor::{AccountWindow, ServiceDescriptor, UsageMode};
pub use error::DecodeError;

// Re-export service descriptors
pub use logentries::logentries_descriptor;
pub use rapid7::{group_by_log, rapid7_descriptor};
