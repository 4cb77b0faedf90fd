//! Logentries service implementation.
//!
//! Usage is fetched per log, one request per log-set membership, for
//! yesterday's single-day window. The account aggregate covers today.

pub mod api;
pub(crate) mod parser;

pub use api::LOGENTRIES_API_BASE;

use logusage_core::ServiceVariant;

use crate::descriptor::{AccountWindow, ServiceDescriptor, UsageMode};

/// Builds the Logentries descriptor.
pub fn logentries_descriptor() -> ServiceDescriptor {
    ServiceDescriptor {
        variant: ServiceVariant::Logentries,
        base_url: LOGENTRIES_API_BASE.to_string(),
        usage_mode: UsageMode::PerLog,
        account_window: AccountWindow::Today,
    }
}
