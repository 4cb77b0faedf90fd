// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Log Usage Fetch
//!
//! Network plumbing for the log usage exporter:
//!
//! - [`client::UsageApi`] - Trait for authenticated GET requests
//! - [`client::HttpClient`] - reqwest implementation with the `x-api-key` header
//! - [`rate_limit::RateLimiter`] - Fixed-window request budget
//!
//! The client never retries. Pacing is the caller's job, through the
//! rate limiter.
//!
//! ## Example
//!
//! ```ignore
//! use logusage_fetch::{HttpClient, RateLimiter, UsageApi};
//!
//! let client = HttpClient::new()?;
//! let mut limiter = RateLimiter::new(RateBudget::default());
//!
//! limiter.before_request().await;
//! let response = client.fetch(&url, credential.api_key()).await?;
//! if !response.is_success() {
//!     // caller decides
//! }
//! ```

pub mod client;
pub mod error;
pub mod rate_limit;

// Re-export key types at crate root
pub use client::{API_KEY_HEADER, ApiResponse, DEFAULT_TIMEOUT_SECS, HttpClient, UsageApi};
pub use error::FetchError;
pub use rate_limit::RateLimiter;
