// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Log usage exporter - Logentries / Rapid7 usage as Prometheus metrics.
//!
//! # Examples
//!
//! ```bash
//! # Logentries account, default address :9234
//! logusage-exporter --apikey "$KEY" --account-id "$ACCOUNT"
//!
//! # Rapid7 InsightOps in the EU region
//! logusage-exporter --variant rapid7 --region eu --apikey "$KEY"
//!
//! # Settings from a config file, API key from the environment
//! LOGUSAGE_API_KEY="$KEY" logusage-exporter --config /etc/logusage/config.json
//!
//! # Custom address and path, verbose logging
//! logusage-exporter --telemetry.address 127.0.0.1:9000 --telemetry.endpoint /probe --debug
//! ```

mod server;

use clap::Parser;
use logusage_collector::{CollectorError, ConfigLayer, ExporterConfig, default_config_path};
use logusage_core::{Region, ServiceVariant};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

// ============================================================================
// CLI Definition
// ============================================================================

/// Log usage exporter - Logentries / Rapid7 usage as Prometheus metrics.
#[derive(Debug, Parser)]
#[command(name = "logusage-exporter")]
#[command(about = "Prometheus exporter for Logentries / Rapid7 log usage")]
#[command(long_about = r#"
Polls the Logentries or Rapid7 InsightOps REST API for account and per-log
daily usage on every scrape and exposes it as Prometheus metrics.

Every flag can also be given through its environment variable or the JSON
config file. Flags win over the environment, which wins over the file.

Supported services:
  • Logentries (logentries)          requires --account-id
  • Rapid7 InsightOps (rapid7)       region us, eu, ca or au
"#)]
#[command(version)]
pub struct Cli {
    /// Address on which to expose metrics (":9234" binds all interfaces).
    #[arg(long = "telemetry.address", env = "LOGUSAGE_LISTEN_ADDRESS")]
    pub listen_address: Option<String>,

    /// Path under which to expose metrics.
    #[arg(long = "telemetry.endpoint", env = "LOGUSAGE_METRICS_PATH")]
    pub metrics_path: Option<String>,

    /// API key sent as x-api-key.
    #[arg(long = "apikey", env = "LOGUSAGE_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Account identifier (required for Logentries).
    #[arg(long, alias = "logentriesID", env = "LOGUSAGE_ACCOUNT_ID")]
    pub account_id: Option<String>,

    /// Service variant: logentries or rapid7.
    #[arg(long, env = "LOGUSAGE_VARIANT")]
    pub variant: Option<ServiceVariant>,

    /// Rapid7 region: us, eu, ca or au.
    #[arg(long, env = "LOGUSAGE_REGION")]
    pub region: Option<Region>,

    /// Usage requests allowed before pausing.
    #[arg(long, env = "LOGUSAGE_RATE_LIMIT")]
    pub rate_limit: Option<u32>,

    /// Pause in seconds once the rate limit is reached.
    #[arg(long = "cooldown", env = "LOGUSAGE_COOLDOWN_SECS")]
    pub cooldown_secs: Option<u64>,

    /// Per-request timeout in seconds.
    #[arg(long = "request-timeout", env = "LOGUSAGE_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<u64>,

    /// Override of the API base URL (proxies, testing).
    #[arg(long, env = "LOGUSAGE_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Config file (default: the user config directory).
    #[arg(long, short, env = "LOGUSAGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, env = "LOGUSAGE_DEBUG")]
    pub debug: bool,
}

impl Cli {
    /// Settings given on the command line or in the environment.
    pub fn layer(&self) -> ConfigLayer {
        ConfigLayer {
            listen_address: self.listen_address.clone(),
            metrics_path: self.metrics_path.clone(),
            api_key: self.api_key.clone(),
            account_id: self.account_id.clone(),
            variant: self.variant,
            region: self.region,
            rate_limit: self.rate_limit,
            cooldown_secs: self.cooldown_secs,
            request_timeout_secs: self.request_timeout_secs,
            api_base_url: self.api_base_url.clone(),
            debug: self.debug.then_some(true),
        }
    }
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success or graceful shutdown.
    Success = 0,
    /// Bind, serve, or other runtime error.
    Error = 1,
    /// Invalid configuration.
    ConfigError = 2,
}

// ============================================================================
// Configuration & Logging
// ============================================================================

/// Merges the config file under the command line and validates the result.
async fn load_config(cli: &Cli) -> Result<ExporterConfig, CollectorError> {
    let file = match &cli.config {
        Some(path) => ConfigLayer::load(path, true).await?,
        None => ConfigLayer::load(&default_config_path(), false).await?,
    };

    ExporterConfig::resolve(file.overlay(cli.layer()))
}

fn setup_logging(debug: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug {
            EnvFilter::new("logusage=debug,info")
        } else {
            EnvFilter::new("logusage=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(debug).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            let code = if e.is_config() {
                ExitCode::ConfigError
            } else {
                ExitCode::Error
            };
            std::process::exit(code as i32);
        }
    };

    setup_logging(config.debug);

    if let Err(e) = server::run(config).await {
        error!(error = %format!("{e:#}"), "Exporter failed");
        eprintln!("Error: {e:#}");
        std::process::exit(ExitCode::Error as i32);
    }

    std::process::exit(ExitCode::Success as i32);
}

// ============================================================================
// Tests
// ============================================================================
