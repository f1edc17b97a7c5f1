//! Observability infrastructure - Prometheus metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_auth_attempt, record_domain_created,
    record_domain_key_regenerated, record_http_request, PrometheusMetrics,
};
