//! Observability module for logging and metrics.
//!
//! Structured logging goes through `tracing`; protocol call counters and
//! latencies go through the `metrics` facade and are optionally exported
//! to Prometheus.

mod logging;
mod metrics;

pub use logging::{LoggingError, init_tracing};
pub use metrics::{
    DEFAULT_METRICS_PORT, MetricsConfig, MetricsError, init_metrics, record_http_request,
    record_protocol_call, record_rate_quote,
};
