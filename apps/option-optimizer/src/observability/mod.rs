//! Observability module for metrics.
//!
//! Prometheus counters and histograms for optimizer runs. Logging setup
//! lives in [`crate::telemetry`].

mod metrics;

pub use metrics::{
    MetricsConfig, MetricsError, init_metrics, record_candidates_discarded,
    record_candidates_generated, record_optimization_run,
};
