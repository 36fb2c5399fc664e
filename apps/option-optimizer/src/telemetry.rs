//! Tracing Setup
//!
//! Installs the global `tracing` subscriber.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides `observability.logging.level` when set
//! - `observability.logging.format`: `json` (default) or `text`
//!
//! # Usage
//!
//! ```rust,ignore
//! use option_optimizer::telemetry::init_tracing;
//!
//! let config = load_config(None)?;
//! init_tracing(&config.observability.logging);
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// Returns `false` if a subscriber was already installed (for example by a
/// test harness); the existing one is left in place.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let span_events = if config.include_spans {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_span_events(span_events)
        .with_writer(std::io::stderr);

    let installed = if config.format == "text" {
        builder.with_target(true).try_init().is_ok()
    } else {
        builder.json().with_current_span(config.include_spans).try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.level, format = %config.format, "Tracing initialized");
    }
    installed
}
