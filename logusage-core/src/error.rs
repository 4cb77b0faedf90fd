//! Core error types for the log usage exporter.

use thiserror::Error;

/// Core error type.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown service variant selector.
    #[error("Unknown service variant: {0} (expected logentries or rapid7)")]
    UnknownVariant(String),

    /// Unknown region code.
    #[error("Unknown region: {0} (expected us, eu, ca or au)")]
    UnknownRegion(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Returns true if this error stems from user-supplied configuration.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidConfig(_) | CoreError::UnknownVariant(_) | CoreError::UnknownRegion(_)
        )
    }
}
