//! Observability infrastructure - Metrics

mod config;
mod metrics;

pub use config::MetricsConfig;
pub use metrics::{
    create_metrics_router, init_metrics, record_audit_write_failure, record_http_request,
    AuditPhase, PrometheusMetrics, UNMATCHED_ROUTE,
};
