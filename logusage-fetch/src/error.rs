//! Fetch error types.

use thiserror::Error;

// ============================================================================
// Main Fetch Error
// ============================================================================

/// Error type for upstream requests.
///
/// Non-success HTTP statuses are not errors at this layer; they are returned
/// in [`crate::ApiResponse`] so the caller can decide what to do with them.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body could not be read.
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The API key cannot be sent as a header value.
    #[error("Invalid API key header: {0}")]
    InvalidApiKey(String),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

impl FetchError {
    /// Returns true if the request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            FetchError::Transport(e) | FetchError::Body(e) => e.is_timeout(),
            _ => false,
        }
    }
}
