//! Prometheus metrics for the optimizer.
//!
//! Recording is always cheap: without an installed exporter the `metrics`
//! macros are no-ops, so library users and tests pay nothing.
//!
//! # Example
//!
//! ```ignore
//! use option_optimizer::observability::{init_metrics, MetricsConfig};
//!
//! let config = MetricsConfig::default();
//! init_metrics(&config)?;
//!
//! record_optimization_run("ok", 0.042);
//! ```

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for run durations (in seconds).
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 9090)),
            // 1ms to 10s
            duration_buckets: vec![
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        }
    }
}

impl MetricsConfig {
    /// Create a new metrics configuration with custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
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
        .set_buckets(&config.duration_buckets)
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

/// Record one optimizer run.
///
/// # Arguments
///
/// * `outcome` - "ok", "invalid_input" or "truncated"
/// * `duration_seconds` - Wall time from validation to ranked output
pub fn record_optimization_run(outcome: &str, duration_seconds: f64) {
    counter!("optimizer_runs_total", "outcome" => outcome.to_string()).increment(1);
    histogram!("optimizer_run_duration_seconds").record(duration_seconds);
}

/// Record candidates pulled from the generator and scored.
pub fn record_candidates_generated(count: usize) {
    counter!("optimizer_candidates_total").increment(count as u64);
}

/// Record candidates dropped before ranking.
///
/// # Arguments
///
/// * `reason` - "max_risk" or "duplicate"
/// * `count` - Number of candidates dropped
pub fn record_candidates_discarded(reason: &str, count: usize) {
    if count == 0 {
        return;
    }
    counter!(
        "optimizer_candidates_discarded_total",
        "reason" => reason.to_string()
    )
    .increment(count as u64);
}
