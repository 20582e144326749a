//! Prometheus metrics for the money market API.
//!
//! Covers lending protocol calls (rate reads and transactions), the last
//! quoted APY per market, and HTTP requests.
//!
//! # Example
//!
//! ```ignore
//! use money_market_api::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_protocol_call("supply", "ok", 14.2);
//! ```

use std::net::SocketAddr;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Default port for the Prometheus listener.
pub const DEFAULT_METRICS_PORT: u16 = 9090;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for latency measurements (in seconds).
    pub latency_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::with_addr(SocketAddr::from(([0, 0, 0, 0], DEFAULT_METRICS_PORT)))
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            // Rate reads finish in tens of milliseconds; mined transactions
            // take one or more block times.
            latency_buckets: vec![
                0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 15.0, 30.0, 60.0, 120.0,
            ],
        }
    }
}

/// Initialize the Prometheus metrics exporter.
///
/// This starts an HTTP server that exposes metrics at `/metrics`.
///
/// # Errors
///
/// Returns an error if the metrics exporter fails to start (e.g., port already in use).
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.latency_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

// ============================================================================
// Lending Protocol Metrics
// ============================================================================

/// Record a call to the lending protocol.
///
/// # Arguments
///
/// * `operation` - `"read_rates"`, `"supply"`, `"borrow"` or `"repay"`
/// * `status` - `"ok"` or `"error"`
/// * `latency_seconds` - Wall time of the call, including receipt wait
pub fn record_protocol_call(operation: &str, status: &str, latency_seconds: f64) {
    counter!(
        "lending_protocol_calls_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "lending_protocol_latency_seconds",
        "operation" => operation.to_string()
    )
    .record(latency_seconds);
}

/// Update the last quoted APY gauges for a market.
///
/// Non-finite values are skipped.
pub fn record_rate_quote(token: &str, supply_apy: f64, borrow_apy: f64) {
    if supply_apy.is_finite() {
        gauge!("market_supply_apy_percent", "token" => token.to_string()).set(supply_apy);
    }
    if borrow_apy.is_finite() {
        gauge!("market_borrow_apy_percent", "token" => token.to_string()).set(borrow_apy);
    }
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record an HTTP request.
///
/// # Arguments
///
/// * `route` - Matched route (e.g., `"/compound/supply"`)
/// * `status` - Response status code
pub fn record_http_request(route: &str, status: u16) {
    counter!(
        "http_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
