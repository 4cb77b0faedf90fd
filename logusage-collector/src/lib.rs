// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Log Usage Collector
//!
//! Collection cycle and exposition for the log usage exporter.
//!
//! This crate provides:
//!
//! - **Collector**: Runs one discovery + usage cycle per scrape under a
//!   shared rate budget
//! - **Exposition**: Renders a cycle as Prometheus text from a fresh registry
//! - **Config**: Layered settings (defaults, JSON file, flags) and validation
//!
//! ## Usage
//!
//! ```ignore
//! use logusage_collector::{Collector, exposition};
//! use logusage_fetch::HttpClient;
//!
//! let api = Arc::new(HttpClient::with_timeout(config.request_timeout)?);
//! let collector = Collector::new(api, config.credential, config.budget);
//!
//! let report = collector.collect().await;
//! let text = exposition::render(collector.descriptor().namespace(), &report)?;
//! ```

pub mod collector;
pub mod config;
pub mod error;
pub mod exposition;
pub mod persistence;

pub use collector::{Collector, CyclePhase, CycleReport};
pub use config::{ConfigLayer, DEFAULT_LISTEN_ADDRESS, DEFAULT_METRICS_PATH, ExporterConfig};
pub use error::CollectorError;
pub use exposition::{CONTENT_TYPE, UsageMetrics, render};
pub use persistence::{default_config_dir, default_config_path, load_json, load_json_if_exists};
