//! Authenticated HTTP client for the provider REST API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::error::FetchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Header carrying the API key on every request.
pub const API_KEY_HEADER: &str = "x-api-key";

/// User agent string for the exporter.
const USER_AGENT: &str = concat!("logusage-exporter/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Api Response
// ============================================================================

/// Raw status and body of an upstream response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text, possibly empty.
    pub body: String,
}

impl ApiResponse {
    /// Creates a response.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Returns true if the body holds anything besides whitespace.
    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

// ============================================================================
// Usage Api Trait
// ============================================================================

/// Issues authenticated GET requests against the provider.
///
/// Implementations never retry. Any HTTP status is returned as `Ok`; only
/// failures to obtain a response at all are errors.
#[async_trait]
pub trait UsageApi: Send + Sync {
    /// Performs `GET url` with the API key header set.
    async fn fetch(&self, url: &str, api_key: &str) -> Result<ApiResponse, FetchError>;
}

// ============================================================================
// HTTP Client
// ============================================================================

/// reqwest-backed [`UsageApi`] implementation.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::ClientBuild` if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns `FetchError::ClientBuild` if the TLS backend cannot be
    /// initialized.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::ClientBuild)?;

        Ok(Self { inner: client })
    }
}

#[async_trait]
impl UsageApi for HttpClient {
    #[instrument(skip(self, api_key), fields(url = %url))]
    async fn fetch(&self, url: &str, api_key: &str) -> Result<ApiResponse, FetchError> {
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| FetchError::InvalidApiKey(e.to_string()))?;
        key.set_sensitive(true);

        debug!("GET request");
        let response = self
            .inner
            .get(url)
            .header(API_KEY_HEADER, key)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(FetchError::Transport)?;

        let status = response.status().as_u16();
        if response.status().is_success() {
            debug!(status, "Response received");
        } else {
            error!(status, "Non-success status code");
        }

        let body = response.text().await.map_err(FetchError::Body)?;
        Ok(ApiResponse { status, body })
    }
}

// ============================================================================
// Tests
// ============================================================================
