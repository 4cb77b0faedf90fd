//! Fixed-window rate limiting for usage requests.
//!
//! The provider enforces an undisclosed per-minute quota. The limiter lets
//! `limit` requests through back to back, then pauses for the full cooldown
//! and replenishes the whole budget. There is no smoothing, and every
//! collection cycle starts from a fresh window via [`RateLimiter::reset`].

use logusage_core::RateBudget;
use tracing::{debug, info};

/// Fixed-window limiter consulted before every usage request.
///
/// Invariant: `issued <= budget.limit()`.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    budget: RateBudget,
    issued: u32,
    pauses: u64,
}

impl RateLimiter {
    /// Creates a limiter with an unused budget.
    pub fn new(budget: RateBudget) -> Self {
        Self {
            budget,
            issued: 0,
            pauses: 0,
        }
    }

    /// Requests issued since the last reset.
    pub fn issued(&self) -> u32 {
        self.issued
    }

    /// Number of cooldown pauses taken so far.
    pub fn pauses(&self) -> u64 {
        self.pauses
    }

    /// Returns true if the next request has to wait for the cooldown.
    pub fn is_exhausted(&self) -> bool {
        self.issued >= self.budget.limit()
    }

    /// Starts a fresh window. Called at the start of every cycle.
    pub fn reset(&mut self) {
        if self.issued > 0 {
            debug!(issued = self.issued, "Resetting rate budget");
        }
        self.issued = 0;
    }

    /// Accounts for one request, sleeping for the cooldown first if the
    /// budget is spent.
    pub async fn before_request(&mut self) {
        if self.is_exhausted() {
            let cooldown = self.budget.cooldown();
            info!(
                limit = self.budget.limit(),
                cooldown_secs = cooldown.as_secs(),
                "Rate limit reached, pausing"
            );
            tokio::time::sleep(cooldown).await;
            self.issued = 0;
            self.pauses += 1;
        }

        self.issued += 1;
        debug!(issued = self.issued, limit = self.budget.limit(), "Rate budget");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::Instant;

    fn limiter(limit: u32, cooldown_secs: u64) -> RateLimiter {
        RateLimiter::new(RateBudget::new(limit, Duration::from_secs(cooldown_secs)).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_up_to_limit_is_immediate() {
        let mut limiter = limiter(3, 60);
        let start = Instant::now();

        for _ in 0..3 {
            limiter.before_request().await;
        }

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.issued(), 3);
        assert!(limiter.is_exhausted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_after_limit_waits_for_cooldown() {
        let mut limiter = limiter(3, 60);
        let start = Instant::now();

        for _ in 0..4 {
            limiter.before_request().await;
        }

        assert!(start.elapsed() >= Duration::from_secs(60));
        assert_eq!(limiter.issued(), 1);
        assert_eq!(limiter.pauses(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_budget_fully_replenished_after_cooldown() {
        let mut limiter = limiter(2, 10);

        for _ in 0..3 {
            limiter.before_request().await;
        }
        let after_pause = Instant::now();

        limiter.before_request().await;
        assert_eq!(after_pause.elapsed(), Duration::ZERO);
        assert_eq!(limiter.issued(), 2);

        limiter.before_request().await;
        assert!(after_pause.elapsed() >= Duration::from_secs(10));
        assert_eq!(limiter.pauses(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_clears_spent_budget() {
        let mut limiter = limiter(2, 300);
        limiter.before_request().await;
        limiter.before_request().await;
        assert!(limiter.is_exhausted());

        limiter.reset();
        let start = Instant::now();
        limiter.before_request().await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(limiter.issued(), 1);
        assert_eq!(limiter.pauses(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_limit_of_one_pauses_between_every_request() {
        let mut limiter = limiter(1, 5);
        let start = Instant::now();

        for _ in 0..3 {
            limiter.before_request().await;
        }

        assert!(start.elapsed() >= Duration::from_secs(10));
        assert_eq!(limiter.pauses(), 2);
    }
}
