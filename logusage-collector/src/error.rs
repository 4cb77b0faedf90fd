//! Collector error types.

use logusage_core::CoreError;
use thiserror::Error;

/// Errors that can occur outside the best-effort collection cycle.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid value rejected by the domain model.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Metric construction or encoding error.
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),

    /// Encoded exposition was not valid UTF-8.
    #[error("Exposition encoding error: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

impl CollectorError {
    /// Returns true if this error stems from user-supplied configuration.
    ///
    /// A config file that exists but cannot be read or parsed counts as well.
    pub fn is_config(&self) -> bool {
        match self {
            CollectorError::Config(_)
            | CollectorError::Io(_)
            | CollectorError::Serialization(_) => true,
            CollectorError::Core(e) => e.is_config(),
            CollectorError::Metrics(_) | CollectorError::Encoding(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_classification() {
        assert!(CollectorError::Config("missing api key".into()).is_config());
        assert!(CollectorError::Core(CoreError::UnknownRegion("mars".into())).is_config());
        assert!(
            !CollectorError::Metrics(prometheus::Error::Msg("duplicate".into())).is_config()
        );
    }
}
