//! Logentries REST endpoints.

use logusage_core::CollectionWindow;
use url::form_urlencoded::byte_serialize;

// ============================================================================
// Constants
// ============================================================================

/// Logentries API base URL.
pub const LOGENTRIES_API_BASE: &str = "https://rest.logentries.com";

/// Log listing endpoint.
pub(crate) const LOGS_ENDPOINT: &str = "/management/logs";

/// Account usage endpoint prefix.
const ACCOUNT_USAGE_ENDPOINT: &str = "/usage/accounts";

// ============================================================================
// URL Builders
// ============================================================================

/// Query-escapes a path component.
pub(crate) fn escape(component: &str) -> String {
    byte_serialize(component.as_bytes()).collect()
}

/// `GET {base}/management/logs`
pub fn listing_url(base: &str) -> String {
    format!("{base}{LOGS_ENDPOINT}")
}

/// `GET {base}/usage/accounts/{account}?from=..&to=..`
pub fn account_usage_url(base: &str, account_id: &str, window: &CollectionWindow) -> String {
    format!(
        "{base}{ACCOUNT_USAGE_ENDPOINT}/{}?from={}&to={}",
        escape(account_id),
        window.from_param(),
        window.to_param()
    )
}

/// `GET {base}/usage/accounts/{account}/logs/{log}/?from=..&to=..`
pub fn log_usage_url(
    base: &str,
    account_id: &str,
    log_id: &str,
    window: &CollectionWindow,
) -> String {
    format!(
        "{base}{ACCOUNT_USAGE_ENDPOINT}/{}/logs/{}/?from={}&to={}",
        escape(account_id),
        escape(log_id),
        window.from_param(),
        window.to_param()
    )
}
