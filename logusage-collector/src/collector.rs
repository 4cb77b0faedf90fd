//! The collection cycle.
//!
//! One [`Collector::collect`] call runs a full cycle against the provider:
//!
//! ```text
//! Idle -> Discovering -> Iterating(index) -> Done
//! ```
//!
//! The account aggregate is fetched before discovery. While iterating, each
//! (log, log-set) pair goes through rate check, fetch, decode and emit.
//! Collection is best-effort: only a failed discovery marks the cycle down,
//! every other failure becomes a zero sample and an error count.
//!
//! The cycle runs under a mutex that also owns the [`RateLimiter`], so
//! overlapping scrapes serialize. The limiter's window is reset when a cycle
//! starts; only the budget configuration outlives a cycle.

use chrono::{Local, NaiveDate};
use logusage_core::{
    AccountUsage, Credential, DailyUsage, LogEntity, RateBudget, TRANSPORT_FAILURE_STATUS,
    UsageSample,
};
use logusage_fetch::{RateLimiter, UsageApi};
use logusage_providers::{DecodeError, ServiceDescriptor, UsageMode, decoder, group_by_log};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

// ============================================================================
// Cycle Phase & Report
// ============================================================================

/// Phase of a collection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// Nothing requested yet.
    Idle,
    /// Listing logs and log-sets.
    Discovering,
    /// Fetching usage for the log at `index` in discovery order.
    Iterating {
        /// Position of the current log.
        index: usize,
    },
    /// Cycle complete.
    Done,
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => f.write_str("idle"),
            Self::Discovering => f.write_str("discovering"),
            Self::Iterating { index } => write!(f, "iterating({index})"),
            Self::Done => f.write_str("done"),
        }
    }
}

/// Everything one cycle observed.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Whether discovery succeeded.
    pub up: bool,
    /// Account aggregate, if it could be fetched.
    pub account: Option<AccountUsage>,
    /// Per-log samples in discovery, membership, then day order.
    pub samples: Vec<UsageSample>,
    /// Failed usage fetches or decodes.
    pub errors: usize,
    /// Usage values that were not numeric.
    pub parse_events: usize,
    /// Wall time of the cycle.
    pub duration: Duration,
}

// ============================================================================
// Collector
// ============================================================================

/// Runs collection cycles for one credential.
pub struct Collector {
    api: Arc<dyn UsageApi>,
    credential: Credential,
    descriptor: ServiceDescriptor,
    limiter: Mutex<RateLimiter>,
}

impl Collector {
    /// Creates a collector using the descriptor matching the credential.
    pub fn new(api: Arc<dyn UsageApi>, credential: Credential, budget: RateBudget) -> Self {
        let descriptor = ServiceDescriptor::for_credential(&credential);
        Self {
            api,
            credential,
            descriptor,
            limiter: Mutex::new(RateLimiter::new(budget)),
        }
    }

    /// Replaces the service descriptor (e.g. to point at another base URL).
    pub fn with_descriptor(mut self, descriptor: ServiceDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }

    /// The service descriptor in use.
    pub fn descriptor(&self) -> &ServiceDescriptor {
        &self.descriptor
    }

    /// Snapshot of the rate limiter, waiting for any running cycle.
    pub async fn rate_limiter(&self) -> RateLimiter {
        self.limiter.lock().await.clone()
    }

    /// Runs one cycle relative to the local calendar date.
    pub async fn collect(&self) -> CycleReport {
        self.collect_at(Local::now().date_naive()).await
    }

    /// Runs one cycle with `today` as the reference date.
    #[instrument(name = "cycle", skip(self), fields(variant = %self.descriptor.variant))]
    pub async fn collect_at(&self, today: NaiveDate) -> CycleReport {
        let mut limiter = self.limiter.lock().await;
        limiter.reset();
        let started = Instant::now();

        let mut cycle = Cycle {
            api: self.api.as_ref(),
            credential: &self.credential,
            descriptor: &self.descriptor,
            limiter: &mut *limiter,
            phase: CyclePhase::Idle,
            samples: Vec::new(),
            errors: 0,
            parse_events: 0,
        };

        let account = cycle.fetch_account(today).await;

        let mode = self.descriptor.usage_mode;
        let up = match cycle.discover().await {
            Some(logs) => {
                match mode {
                    UsageMode::PerLog => cycle.iterate_per_log(&logs, today).await,
                    UsageMode::Aggregated => cycle.iterate_aggregated(&logs).await,
                }
                true
            }
            None => false,
        };

        cycle.transition(CyclePhase::Done);

        let report = CycleReport {
            up,
            account,
            samples: cycle.samples,
            errors: cycle.errors,
            parse_events: cycle.parse_events,
            duration: started.elapsed(),
        };

        if up {
            info!(
                samples = report.samples.len(),
                errors = report.errors,
                parse_events = report.parse_events,
                duration_secs = report.duration.as_secs_f64(),
                "Collection cycle finished"
            );
        } else {
            error!(
                errors = report.errors,
                duration_secs = report.duration.as_secs_f64(),
                "Collection cycle failed"
            );
        }

        report
    }
}

// ============================================================================
// Cycle
// ============================================================================

/// A response reduced to what the cycle needs.
struct Observed<T> {
    status: u16,
    value: Option<T>,
    failed: bool,
}

/// Mutable state of one running cycle.
struct Cycle<'a> {
    api: &'a dyn UsageApi,
    credential: &'a Credential,
    descriptor: &'a ServiceDescriptor,
    limiter: &'a mut RateLimiter,
    phase: CyclePhase,
    samples: Vec<UsageSample>,
    errors: usize,
    parse_events: usize,
}

impl Cycle<'_> {
    fn transition(&mut self, next: CyclePhase) {
        debug!(from = %self.phase, to = %next, "Cycle transition");
        self.phase = next;
    }

    /// Fetches and decodes one URL without touching the budget.
    ///
    /// Non-success responses are still decoded when they carry a body.
    async fn observe<T>(
        &self,
        url: &str,
        decode: fn(&[u8]) -> Result<T, DecodeError>,
    ) -> Observed<T> {
        let response = match self.api.fetch(url, self.credential.api_key()).await {
            Ok(response) => response,
            Err(e) => {
                warn!(url, timed_out = e.is_timeout(), error = %e, "Request failed");
                return Observed {
                    status: TRANSPORT_FAILURE_STATUS,
                    value: None,
                    failed: true,
                };
            }
        };

        let value = if response.is_success() || response.has_body() {
            match decode(response.body.as_bytes()) {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!(url, status = response.status, error = %e, "Decode failed");
                    None
                }
            }
        } else {
            None
        };

        Observed {
            status: response.status,
            failed: !response.is_success() || value.is_none(),
            value,
        }
    }

    /// Rate check, then [`Cycle::observe`].
    async fn request<T>(
        &mut self,
        url: &str,
        decode: fn(&[u8]) -> Result<T, DecodeError>,
    ) -> Observed<T> {
        debug!(issued = self.limiter.issued(), "Rate check");
        self.limiter.before_request().await;
        self.observe(url, decode).await
    }

    /// Pushes the samples for one membership.
    fn emit(&mut self, log: &LogEntity, logset: &str, days: &[DailyUsage], status: u16) {
        if days.is_empty() {
            self.samples.push(UsageSample::zero(log, logset, status));
        } else {
            self.samples
                .extend(days.iter().map(|day| UsageSample::daily(log, logset, day, status)));
        }
    }

    async fn fetch_account(&mut self, today: NaiveDate) -> Option<AccountUsage> {
        let window = self.descriptor.account_window.resolve(today);
        let url = self.descriptor.account_usage_url(self.credential, &window);

        let observed = self.request(&url, decoder::decode_account_usage).await;
        if observed.failed {
            self.errors += 1;
            warn!(status = observed.status, "Account usage unavailable");
        }

        let totals = observed.value?;
        let account_id = if totals.id.is_empty() {
            self.credential.account_id().unwrap_or_default().to_string()
        } else {
            totals.id
        };

        Some(AccountUsage {
            account_id,
            name: totals.name,
            bytes: totals.period_usage,
            window,
        })
    }

    async fn discover(&mut self) -> Option<Vec<LogEntity>> {
        self.transition(CyclePhase::Discovering);

        let url = self.descriptor.listing_url();
        match self.observe(&url, decoder::decode_listing).await {
            Observed {
                value: Some(logs),
                failed: false,
                ..
            } => {
                debug!(logs = logs.len(), "Discovered logs");
                Some(logs)
            }
            Observed { status, .. } => {
                error!(status, "Log discovery failed");
                None
            }
        }
    }

    async fn iterate_per_log(&mut self, logs: &[LogEntity], today: NaiveDate) {
        let window = self.descriptor.log_usage_window(today);

        for (index, log) in logs.iter().enumerate() {
            self.transition(CyclePhase::Iterating { index });

            for logset in log.membership_names() {
                let url = self.descriptor.log_usage_url(self.credential, &log.id, &window);
                let observed = self.request(&url, decoder::decode_log_daily_usage).await;
                if observed.failed {
                    self.errors += 1;
                }

                let emitted = self.samples.len();
                match observed.value {
                    Some(usage) => {
                        self.parse_events += usage.parse_events();
                        self.emit(log, logset, &usage.days, observed.status);
                    }
                    None => self.emit(log, logset, &[], observed.status),
                }
                debug!(
                    log_id = %log.id,
                    logset,
                    status = observed.status,
                    samples = self.samples.len() - emitted,
                    "Emitted usage"
                );
            }
        }
    }

    async fn iterate_aggregated(&mut self, logs: &[LogEntity]) {
        self.transition(CyclePhase::Iterating { index: 0 });

        let url = self.descriptor.aggregated_usage_url();
        let observed = self.request(&url, decoder::decode_aggregated_usage).await;
        if observed.failed {
            self.errors += 1;
        }

        let by_log = observed
            .value
            .as_deref()
            .map(group_by_log)
            .unwrap_or_default();

        let known: HashSet<&str> = logs.iter().map(|log| log.id.as_str()).collect();
        for log_id in by_log.keys().filter(|id| !known.contains(id.as_str())) {
            warn!(log_id = %log_id, "Usage reported for unknown log, ignoring");
        }

        for (index, log) in logs.iter().enumerate() {
            self.transition(CyclePhase::Iterating { index });

            let days = by_log.get(&log.id).map(Vec::as_slice).unwrap_or_default();
            for logset in log.membership_names() {
                self.emit(log, logset, days, observed.status);
            }
        }
    }
}
