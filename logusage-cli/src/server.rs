//! HTTP exposition server.
//!
//! `GET /` serves a landing page, `GET <metrics path>` runs one collection
//! cycle and returns its Prometheus text. The cycle runs on its own task, so
//! a scraper that disconnects early does not cut it short.

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use logusage_collector::{CONTENT_TYPE, Collector, ExporterConfig, render};
use logusage_fetch::HttpClient;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    collector: Arc<Collector>,
    metrics_path: Arc<str>,
}

impl AppState {
    /// Creates handler state around a collector.
    pub fn new(collector: Arc<Collector>, metrics_path: &str) -> Self {
        Self {
            collector,
            metrics_path: Arc::from(metrics_path),
        }
    }
}

/// Builds the exporter routes.
pub fn router(state: AppState) -> Router {
    let metrics_path = state.metrics_path.to_string();
    Router::new()
        .route("/", get(landing))
        .route(&metrics_path, get(metrics))
        .with_state(state)
}

async fn landing(State(state): State<AppState>) -> Html<String> {
    let title = format!("{} Exporter", state.collector.descriptor().variant.display_name());
    Html(format!(
        "<html>\n\
         <head><title>{title}</title></head>\n\
         <body>\n\
         <h1>{title}</h1>\n\
         <p><a href=\"{path}\">Metrics</a></p>\n\
         </body>\n\
         </html>\n",
        path = state.metrics_path
    ))
}

async fn metrics(State(state): State<AppState>) -> Response {
    let collector = Arc::clone(&state.collector);
    let cycle = tokio::spawn(async move { collector.collect().await });

    let report = match cycle.await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Collection task failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match render(state.collector.descriptor().namespace(), &report) {
        Ok(body) => ([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

/// Binds the listen address and serves until Ctrl-C.
pub async fn run(config: ExporterConfig) -> Result<()> {
    let client = HttpClient::with_timeout(config.request_timeout)
        .context("failed to build HTTP client")?;

    let mut collector = Collector::new(Arc::new(client), config.credential.clone(), config.budget);
    if let Some(base_url) = &config.api_base_url {
        let descriptor = collector.descriptor().clone().with_base_url(base_url.as_str());
        collector = collector.with_descriptor(descriptor);
    }

    info!(
        variant = %collector.descriptor().variant,
        base_url = %collector.descriptor().base_url,
        rate_limit = config.budget.limit(),
        cooldown_secs = config.budget.cooldown().as_secs(),
        "Collector configured"
    );

    let app = router(AppState::new(Arc::new(collector), &config.metrics_path));

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;
    info!(address = %config.listen, path = %config.metrics_path, "Exporter listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Exporter stopped");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use logusage_core::{Credential, RateBudget, Region, ServiceVariant};
    use logusage_fetch::{ApiResponse, FetchError, UsageApi};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Upstream whose listing always fails.
    struct DownApi;

    #[async_trait]
    impl UsageApi for DownApi {
        async fn fetch(&self, _url: &str, _api_key: &str) -> Result<ApiResponse, FetchError> {
            Ok(ApiResponse::new(503, ""))
        }
    }

    /// Upstream listing two logs with three memberships, answering each
    /// per-log usage request after a delay.
    #[derive(Default)]
    struct SlowApi {
        usage_fetches: AtomicUsize,
    }

    #[async_trait]
    impl UsageApi for SlowApi {
        async fn fetch(&self, url: &str, _api_key: &str) -> Result<ApiResponse, FetchError> {
            if url.ends_with("/management/logs") {
                return Ok(ApiResponse::new(
                    200,
                    r#"{"logs": [
                        {"id": "A", "name": "alpha", "logsets_info": [
                            {"id": "1", "name": "s1"}, {"id": "2", "name": "s2"}
                        ]},
                        {"id": "B", "name": "beta", "logsets_info": [{"id": "1", "name": "s1"}]}
                    ]}"#,
                ));
            }
            if url.contains("/logs/") {
                tokio::time::sleep(Duration::from_millis(200)).await;
                self.usage_fetches.fetch_add(1, Ordering::SeqCst);
                return Ok(ApiResponse::new(200, r#"{"usage": {"daily_usage": []}}"#));
            }
            Ok(ApiResponse::new(404, ""))
        }
    }

    fn credential() -> Credential {
        Credential::new(
            "key",
            Some("acct".to_string()),
            ServiceVariant::Logentries,
            Region::Us,
        )
        .unwrap()
    }

    fn state() -> AppState {
        let collector = Collector::new(Arc::new(DownApi), credential(), RateBudget::default());
        AppState::new(Arc::new(collector), "/metrics")
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_landing_links_metrics_path() {
        let Html(page) = landing(State(state())).await;
        assert!(page.contains("Logentries Exporter"));
        assert!(page.contains("href=\"/metrics\""));
    }

    #[tokio::test]
    async fn test_degraded_scrape_still_served() {
        let response = metrics(State(state())).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );

        let body = body_text(response).await;
        assert!(body.contains("logentries_up 0"));
        assert!(body.contains("logentries_log_usage_errors 1"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_completes_after_scraper_disconnects() {
        let api = Arc::new(SlowApi::default());
        let collector = Collector::new(api.clone(), credential(), RateBudget::default());
        let state = AppState::new(Arc::new(collector), "/metrics");

        // Dropping the handler future is what axum does on disconnect
        let scrape = tokio::spawn(metrics(State(state)));
        tokio::time::sleep(Duration::from_millis(100)).await;
        scrape.abort();
        assert!(scrape.await.unwrap_err().is_cancelled());
        assert_eq!(api.usage_fetches.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(api.usage_fetches.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_router_builds_with_custom_path() {
        let _ = router(AppState::new(state().collector, "/probe"));
    }
}
