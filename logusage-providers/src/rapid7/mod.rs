//! Rapid7 InsightOps service implementation.
//!
//! The API is region-aware. Per-log usage comes from a single aggregated
//! request joined against the log listing; the account aggregate covers the
//! current calendar month.

pub mod api;
pub(crate) mod parser;

pub use parser::group_by_log;

use logusage_core::{Region, ServiceVariant};

use crate::descriptor::{AccountWindow, ServiceDescriptor, UsageMode};

/// Builds the Rapid7 descriptor for a region.
pub fn rapid7_descriptor(region: Region) -> ServiceDescriptor {
    ServiceDescriptor {
        variant: ServiceVariant::Rapid7,
        base_url: api::api_base(region),
        usage_mode: UsageMode::Aggregated,
        account_window: AccountWindow::CurrentMonth,
    }
}
