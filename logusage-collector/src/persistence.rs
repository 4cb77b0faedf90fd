//! File persistence helpers.
//!
//! Locates and reads the optional exporter config file.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::CollectorError;

// ============================================================================
// Default Paths
// ============================================================================

/// Returns the default configuration directory.
///
/// - macOS: `~/Library/Application Support/logusage-exporter`
/// - Linux: `~/.config/logusage-exporter`
/// - Windows: `%APPDATA%\logusage-exporter`
pub fn default_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|h| h.join("Library").join("Application Support").join("logusage-exporter"))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    #[cfg(not(target_os = "macos"))]
    {
        dirs::config_dir()
            .map(|c| c.join("logusage-exporter"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Returns the default config file path.
pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.json")
}

// ============================================================================
// File Operations
// ============================================================================

/// Loads data from a JSON file.
pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, CollectorError> {
    debug!(path = %path.display(), "Loading JSON file");

    let content = tokio::fs::read_to_string(path).await?;
    let data = serde_json::from_str(&content)?;

    debug!(path = %path.display(), "JSON file loaded");
    Ok(data)
}

/// Loads data from a JSON file, returning `None` if the file does not exist.
///
/// Any other failure (permissions, malformed JSON) is returned as an error.
pub async fn load_json_if_exists<T: DeserializeOwned>(
    path: &Path,
) -> Result<Option<T>, CollectorError> {
    match tokio::fs::try_exists(path).await {
        Ok(true) => load_json(path).await.map(Some),
        Ok(false) => {
            debug!(path = %path.display(), "File not found");
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

// ============================================================================
// Tests
// ============================================================================
