//! Prometheus rendering of a cycle.
//!
//! A fresh [`Registry`] is built for every scrape so label sets seen in an
//! earlier cycle never linger.

use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};
use std::collections::HashSet;
use tracing::warn;

use crate::collector::CycleReport;
use crate::error::CollectorError;

/// Content type of the text exposition format.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

/// Version reported by the build info gauge.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gauges describing one cycle.
pub struct UsageMetrics {
    up: Gauge,
    period_usage_daily: GaugeVec,
    log_usage_daily: GaugeVec,
    log_usage_errors: Gauge,
    log_usage_parse_events: Gauge,
    scrape_duration_seconds: Gauge,
    build_info: GaugeVec,
}

impl UsageMetrics {
    /// Creates the gauges under `namespace` (`logentries` or `rapid7`).
    pub fn new(namespace: &str) -> Result<Self, CollectorError> {
        Ok(Self {
            up: Gauge::with_opts(Opts::new(
                format!("{namespace}_up"),
                "Whether the log listing could be fetched and decoded",
            ))?,
            period_usage_daily: GaugeVec::new(
                Opts::new(
                    format!("{namespace}_period_usage_daily"),
                    "Account usage in bytes over the reported period",
                ),
                &["account", "from", "to"],
            )?,
            log_usage_daily: GaugeVec::new(
                Opts::new(
                    format!("{namespace}_log_usage_daily"),
                    "Daily usage of a log in bytes",
                ),
                &["logname", "logset", "logid", "day", "status_code"],
            )?,
            log_usage_errors: Gauge::with_opts(Opts::new(
                format!("{namespace}_log_usage_errors"),
                "Usage requests that failed during the last collection",
            ))?,
            log_usage_parse_events: Gauge::with_opts(Opts::new(
                format!("{namespace}_log_usage_parse_events"),
                "Usage values that could not be parsed during the last collection",
            ))?,
            scrape_duration_seconds: Gauge::with_opts(Opts::new(
                format!("{namespace}_scrape_duration_seconds"),
                "Duration of the last collection in seconds",
            ))?,
            build_info: GaugeVec::new(
                Opts::new(
                    format!("{namespace}_exporter_build_info"),
                    "Exporter build information; always 1",
                ),
                &["version"],
            )?,
        })
    }

    /// Registers every gauge.
    pub fn register(&self, registry: &Registry) -> Result<(), CollectorError> {
        registry.register(Box::new(self.up.clone()))?;
        registry.register(Box::new(self.period_usage_daily.clone()))?;
        registry.register(Box::new(self.log_usage_daily.clone()))?;
        registry.register(Box::new(self.log_usage_errors.clone()))?;
        registry.register(Box::new(self.log_usage_parse_events.clone()))?;
        registry.register(Box::new(self.scrape_duration_seconds.clone()))?;
        registry.register(Box::new(self.build_info.clone()))?;
        Ok(())
    }

    /// Sets the gauges from a cycle report.
    ///
    /// Returns the number of samples whose label set repeated an earlier
    /// sample; the later value wins.
    #[allow(clippy::cast_precision_loss)]
    pub fn observe(&self, report: &CycleReport) -> usize {
        self.up.set(if report.up { 1.0 } else { 0.0 });

        if let Some(account) = &report.account {
            let label = if account.name.is_empty() {
                account.account_id.as_str()
            } else {
                account.name.as_str()
            };
            self.period_usage_daily
                .with_label_values(&[
                    label,
                    &account.window.from_param(),
                    &account.window.to_param(),
                ])
                .set(account.bytes);
        }

        let mut seen = HashSet::new();
        let mut overwritten = 0;
        for sample in &report.samples {
            let key = (
                sample.log_id.as_str(),
                sample.log_name.as_str(),
                sample.logset.as_str(),
                sample.day.as_deref(),
                sample.status,
            );
            if !seen.insert(key) {
                overwritten += 1;
                warn!(
                    log_id = %sample.log_id,
                    logset = %sample.logset,
                    day = sample.day.as_deref().unwrap_or_default(),
                    "Duplicate label set, earlier sample overwritten"
                );
            }

            self.log_usage_daily
                .with_label_values(&[
                    sample.log_name.as_str(),
                    sample.logset.as_str(),
                    sample.log_id.as_str(),
                    sample.day.as_deref().unwrap_or_default(),
                    &sample.status.to_string(),
                ])
                .set(sample.bytes);
        }

        self.log_usage_errors.set(report.errors as f64);
        self.log_usage_parse_events.set(report.parse_events as f64);
        self.scrape_duration_seconds.set(report.duration.as_secs_f64());
        self.build_info.with_label_values(&[VERSION]).set(1.0);

        overwritten
    }
}

/// Renders a cycle report in the Prometheus text format.
///
/// # Errors
///
/// Returns `CollectorError::Metrics` if a metric name is invalid or encoding
/// fails.
pub fn render(namespace: &str, report: &CycleReport) -> Result<String, CollectorError> {
    let registry = Registry::new();
    let metrics = UsageMetrics::new(namespace)?;
    metrics.register(&registry)?;
    metrics.observe(report);

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
