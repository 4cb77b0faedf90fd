//! Service descriptor system.
//!
//! A descriptor holds everything variant-specific the collector needs:
//! - Base URL (region-aware for Rapid7)
//! - How per-log usage is obtained ([`UsageMode`])
//! - Which window the account aggregate covers ([`AccountWindow`])
//! - Endpoint URL builders

use chrono::NaiveDate;
use logusage_core::{CollectionWindow, Credential, ServiceVariant};

use crate::logentries::{self, logentries_descriptor};
use crate::rapid7::{self, rapid7_descriptor};

// ============================================================================
// Usage Mode & Account Window
// ============================================================================

/// How per-log usage is fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageMode {
    /// One request per log-set membership of every log.
    PerLog,
    /// One request for all logs, joined against the listing.
    Aggregated,
}

/// The window covered by the account aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountWindow {
    /// Today only.
    Today,
    /// The current calendar month.
    CurrentMonth,
}

impl AccountWindow {
    /// Resolves the window relative to `today`.
    pub fn resolve(&self, today: NaiveDate) -> CollectionWindow {
        match self {
            Self::Today => CollectionWindow::single_day(today),
            Self::CurrentMonth => CollectionWindow::month_of(today),
        }
    }
}

// ============================================================================
// Service Descriptor
// ============================================================================

/// Static configuration of one service variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Service variant.
    pub variant: ServiceVariant,
    /// API base URL without trailing slash.
    pub base_url: String,
    /// How per-log usage is fetched.
    pub usage_mode: UsageMode,
    /// Window of the account aggregate.
    pub account_window: AccountWindow,
}

impl ServiceDescriptor {
    /// Returns the descriptor matching a credential's variant and region.
    pub fn for_credential(credential: &Credential) -> Self {
        match credential.variant() {
            ServiceVariant::Logentries => logentries_descriptor(),
            ServiceVariant::Rapid7 => rapid7_descriptor(credential.region()),
        }
    }

    /// Overrides the base URL (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Metric namespace for this variant.
    pub fn namespace(&self) -> &'static str {
        self.variant.namespace()
    }

    /// Window of per-log usage queries: yesterday.
    pub fn log_usage_window(&self, today: NaiveDate) -> CollectionWindow {
        CollectionWindow::yesterday(today)
    }

    /// URL of the log listing.
    pub fn listing_url(&self) -> String {
        logentries::api::listing_url(&self.base_url)
    }

    /// URL of the account aggregate for `window`.
    pub fn account_usage_url(&self, credential: &Credential, window: &CollectionWindow) -> String {
        match self.variant {
            ServiceVariant::Logentries => logentries::api::account_usage_url(
                &self.base_url,
                credential.account_id().unwrap_or_default(),
                window,
            ),
            ServiceVariant::Rapid7 => rapid7::api::organization_usage_url(&self.base_url, window),
        }
    }

    /// URL of one log's daily usage for `window`.
    pub fn log_usage_url(
        &self,
        credential: &Credential,
        log_id: &str,
        window: &CollectionWindow,
    ) -> String {
        logentries::api::log_usage_url(
            &self.base_url,
            credential.account_id().unwrap_or_default(),
            log_id,
            window,
        )
    }

    /// URL of the aggregated per-day usage of all logs.
    pub fn aggregated_usage_url(&self) -> String {
        rapid7::api::aggregated_usage_url(&self.base_url)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use logusage_core::Region;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_logentries_descriptor() {
        let cred =
            Credential::new("k", Some("acct".into()), ServiceVariant::Logentries, Region::Us)
                .unwrap();
        let desc = ServiceDescriptor::for_credential(&cred);

        assert_eq!(desc.usage_mode, UsageMode::PerLog);
        assert_eq!(desc.namespace(), "logentries");
        assert_eq!(desc.listing_url(), "https://rest.logentries.com/management/logs");

        let window = desc.account_window.resolve(date(2024, 5, 3));
        assert_eq!(
            desc.account_usage_url(&cred, &window),
            "https://rest.logentries.com/usage/accounts/acct?from=2024-05-03&to=2024-05-03"
        );
    }

    #[test]
    fn test_rapid7_descriptor_is_region_aware() {
        let cred = Credential::new("k", None, ServiceVariant::Rapid7, Region::Eu).unwrap();
        let desc = ServiceDescriptor::for_credential(&cred);

        assert_eq!(desc.usage_mode, UsageMode::Aggregated);
        assert_eq!(desc.listing_url(), "https://eu.rest.logs.insight.rapid7.com/management/logs");

        let window = desc.account_window.resolve(date(2024, 5, 3));
        assert_eq!(
            desc.account_usage_url(&cred, &window),
            "https://eu.rest.logs.insight.rapid7.com/usage/organizations?from=2024-05-01&to=2024-05-31"
        );
    }

    #[test]
    fn test_log_usage_window_is_yesterday() {
        let desc = logentries_descriptor();
        let window = desc.log_usage_window(date(2024, 3, 1));
        assert_eq!(window.from_param(), "2024-02-29");
    }

    #[test]
    fn test_base_url_override_strips_trailing_slash() {
        let desc = logentries_descriptor().with_base_url("http://127.0.0.1:8080/");
        assert_eq!(desc.listing_url(), "http://127.0.0.1:8080/management/logs");
    }
}
