//! Prometheus metrics infrastructure

use std::sync::{Arc, LazyLock};
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use regex::Regex;

use super::config::MetricsConfig;

static DOMAIN_SEGMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"/[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+\.?(/|$)").ok());

static NUMERIC_SEGMENT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"/\d+(/|$)").ok());

const MAX_PATH_LABEL_LENGTH: usize = 50;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for PrometheusMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusMetrics").finish_non_exhaustive()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("mailhub_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!(path = %config.path, "Prometheus metrics initialized");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize Prometheus metrics");
            None
        }
    }
}

/// Create the metrics router, served at `path`
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Count a successfully provisioned domain
pub fn record_domain_created() {
    counter!("mailhub_domains_created_total").increment(1);
}

/// Count a successful API secret rotation
pub fn record_domain_key_regenerated() {
    counter!("mailhub_domain_keys_regenerated_total").increment(1);
}

/// Count a Mail API authentication attempt by outcome
/// (`success`, `rejected` or `error`)
pub fn record_auth_attempt(outcome: &'static str) {
    counter!("mailhub_auth_attempts_total", "outcome" => outcome).increment(1);
}

/// Collapse tenant names and numeric IDs so path labels stay low-cardinality
fn sanitize_path(path: &str) -> String {
    let mut sanitized = path.to_string();

    if let Some(re) = DOMAIN_SEGMENT.as_ref() {
        sanitized = re.replace_all(&sanitized, "/{domain}$2").into_owned();
    }

    if let Some(re) = NUMERIC_SEGMENT.as_ref() {
        sanitized = re.replace_all(&sanitized, "/{id}$1").into_owned();
    }

    if sanitized.len() > MAX_PATH_LABEL_LENGTH {
        let mut end = MAX_PATH_LABEL_LENGTH;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized.truncate(end);
    }

    sanitized
}
