//! Rapid7 InsightOps REST endpoints.

use logusage_core::{CollectionWindow, Region};

/// Host suffix after the region prefix.
const API_HOST_SUFFIX: &str = "rest.logs.insight.rapid7.com";

/// Organization usage endpoint.
const ORGANIZATION_USAGE_ENDPOINT: &str = "/usage/organizations";

/// Aggregated per-log usage endpoint.
const LOGS_USAGE_ENDPOINT: &str = "/usage/organizations/logs";

/// Returns the region-specific API base URL.
pub fn api_base(region: Region) -> String {
    format!("https://{}.{API_HOST_SUFFIX}", region.code())
}

/// `GET {base}/usage/organizations?from=..&to=..`
pub fn organization_usage_url(base: &str, window: &CollectionWindow) -> String {
    format!(
        "{base}{ORGANIZATION_USAGE_ENDPOINT}?from={}&to={}",
        window.from_param(),
        window.to_param()
    )
}

/// `GET {base}/usage/organizations/logs?time_range=yesterday&interval=day`
pub fn aggregated_usage_url(base: &str) -> String {
    format!("{base}{LOGS_USAGE_ENDPOINT}?time_range=yesterday&interval=day")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_api_base_per_region() {
        assert_eq!(api_base(Region::Eu), "https://eu.rest.logs.insight.rapid7.com");
        assert_eq!(api_base(Region::Au), "https://au.rest.logs.insight.rapid7.com");
    }

    #[test]
    fn test_organization_usage_url_month_window() {
        let window = CollectionWindow::month_of(NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
        assert_eq!(
            organization_usage_url(&api_base(Region::Us), &window),
            "https://us.rest.logs.insight.rapid7.com/usage/organizations?from=2024-02-01&to=2024-02-29"
        );
    }

    #[test]
    fn test_aggregated_usage_url() {
        assert_eq!(
            aggregated_usage_url("https://ca.rest.logs.insight.rapid7.com"),
            "https://ca.rest.logs.insight.rapid7.com/usage/organizations/logs?time_range=yesterday&interval=day"
        );
    }
}
