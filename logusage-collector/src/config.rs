//! Exporter configuration.
//!
//! Settings come from three layers, lowest precedence first:
//!
//! 1. Built-in defaults
//! 2. The optional JSON config file
//! 3. Command-line flags and their environment variables
//!
//! Each layer is a [`ConfigLayer`] of optional values. Layers are merged with
//! [`ConfigLayer::overlay`] and resolved into a validated [`ExporterConfig`].

use logusage_core::{
    Credential, DEFAULT_COOLDOWN_SECS, DEFAULT_RATE_LIMIT, RateBudget, Region, ServiceVariant,
};
use logusage_fetch::DEFAULT_TIMEOUT_SECS;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::CollectorError;
use crate::persistence::load_json_if_exists;

// ============================================================================
// Defaults
// ============================================================================

/// Default listen address.
pub const DEFAULT_LISTEN_ADDRESS: &str = ":9234";

/// Default metrics path.
pub const DEFAULT_METRICS_PATH: &str = "/metrics";

// ============================================================================
// Config Layer
// ============================================================================

/// One layer of partially specified settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigLayer {
    /// Address the exposition server binds to.
    pub listen_address: Option<String>,
    /// Path under which metrics are exposed.
    pub metrics_path: Option<String>,
    /// API key sent as `x-api-key`.
    pub api_key: Option<String>,
    /// Account identifier (required for Logentries).
    pub account_id: Option<String>,
    /// Service variant.
    pub variant: Option<ServiceVariant>,
    /// Rapid7 region.
    pub region: Option<Region>,
    /// Usage requests allowed before a cooldown.
    pub rate_limit: Option<u32>,
    /// Cooldown in seconds once the rate limit is reached.
    pub cooldown_secs: Option<u64>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Override of the API base URL.
    pub api_base_url: Option<String>,
    /// Verbose logging.
    pub debug: Option<bool>,
}

impl ConfigLayer {
    /// Loads a layer from a JSON file.
    ///
    /// A missing file yields an empty layer unless `required` is set.
    pub async fn load(path: &Path, required: bool) -> Result<Self, CollectorError> {
        match load_json_if_exists::<Self>(path).await? {
            Some(layer) => {
                info!(path = %path.display(), "Loaded configuration file");
                Ok(layer)
            }
            None if required => Err(CollectorError::Config(format!(
                "config file not found: {}",
                path.display()
            ))),
            None => {
                debug!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Returns `self` with every value set in `top` replaced by it.
    pub fn overlay(self, top: ConfigLayer) -> Self {
        Self {
            listen_address: top.listen_address.or(self.listen_address),
            metrics_path: top.metrics_path.or(self.metrics_path),
            api_key: top.api_key.or(self.api_key),
            account_id: top.account_id.or(self.account_id),
            variant: top.variant.or(self.variant),
            region: top.region.or(self.region),
            rate_limit: top.rate_limit.or(self.rate_limit),
            cooldown_secs: top.cooldown_secs.or(self.cooldown_secs),
            request_timeout_secs: top.request_timeout_secs.or(self.request_timeout_secs),
            api_base_url: top.api_base_url.or(self.api_base_url),
            debug: top.debug.or(self.debug),
        }
    }
}

// ============================================================================
// Exporter Config
// ============================================================================

/// Fully resolved and validated exporter configuration.
#[derive(Debug, Clone)]
pub struct ExporterConfig {
    /// Socket address of the exposition server.
    pub listen: SocketAddr,
    /// Path under which metrics are exposed, with a leading slash.
    pub metrics_path: String,
    /// Immutable API credential.
    pub credential: Credential,
    /// Fixed-window request budget.
    pub budget: RateBudget,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Override of the API base URL.
    pub api_base_url: Option<String>,
    /// Verbose logging.
    pub debug: bool,
}

impl ExporterConfig {
    /// Applies defaults to a merged layer and validates the result.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a missing API key, a missing account
    /// id for Logentries, an unparseable listen address, or a zero rate limit
    /// or timeout.
    pub fn resolve(layer: ConfigLayer) -> Result<Self, CollectorError> {
        let listen = parse_listen_address(
            layer.listen_address.as_deref().unwrap_or(DEFAULT_LISTEN_ADDRESS),
        )?;
        let metrics_path =
            normalize_metrics_path(layer.metrics_path.as_deref().unwrap_or(DEFAULT_METRICS_PATH))?;

        let api_key = layer
            .api_key
            .ok_or_else(|| CollectorError::Config("an API key is required".to_string()))?;
        let credential = Credential::new(
            api_key,
            layer.account_id,
            layer.variant.unwrap_or_default(),
            layer.region.unwrap_or_default(),
        )?;

        let budget = RateBudget::new(
            layer.rate_limit.unwrap_or(DEFAULT_RATE_LIMIT),
            Duration::from_secs(layer.cooldown_secs.unwrap_or(DEFAULT_COOLDOWN_SECS)),
        )?;

        let timeout_secs = layer.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            return Err(CollectorError::Config(
                "request timeout must be at least 1 second".to_string(),
            ));
        }

        let api_base_url = layer
            .api_base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            listen,
            metrics_path,
            credential,
            budget,
            request_timeout: Duration::from_secs(timeout_secs),
            api_base_url,
            debug: layer.debug.unwrap_or(false),
        })
    }
}

/// Parses a listen address; a bare `:port` binds all interfaces.
fn parse_listen_address(raw: &str) -> Result<SocketAddr, CollectorError> {
    let raw = raw.trim();
    let full = if raw.starts_with(':') {
        format!("0.0.0.0{raw}")
    } else {
        raw.to_string()
    };

    full.parse()
        .map_err(|e| CollectorError::Config(format!("invalid listen address {raw:?}: {e}")))
}

/// Ensures the metrics path is a non-root absolute path.
fn normalize_metrics_path(raw: &str) -> Result<String, CollectorError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(CollectorError::Config(
            "metrics path must not be the root path".to_string(),
        ));
    }

    if trimmed.starts_with('/') {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("/{trimmed}"))
    }
}

// ============================================================================
// Tests
// ============================================================================
