//! Option Optimizer Binary
//!
//! Ranks option strategies for one scenario and prints the report as JSON.
//!
//! # Usage
//!
//! ```bash
//! OPTIMIZER_SCENARIO=scenario.json cargo run --bin option-optimizer
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `OPTIMIZER_SCENARIO`: Path to the scenario JSON
//!
//! ## Optional
//! - `OPTIMIZER_CONFIG`: Path to the YAML config (default: built-in defaults)
//! - `RUST_LOG`: Log level (overrides the config)
//!
//! # Scenario
//!
//! ```json
//! {
//!   "underlying": "IDX",
//!   "spot": 8211.0,
//!   "target_ranges": [[8600.0, null]],
//!   "expiration": "2026-12-18",
//!   "chain_file": "chain.json"
//! }
//! ```
//!
//! `chain_file` is resolved relative to the scenario file.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use serde::Deserialize;

use option_optimizer::application::use_cases::{
    OptimizeStrategiesCommand, OptimizeStrategiesUseCase,
};
use option_optimizer::config::{Config, load_config};
use option_optimizer::infrastructure::JsonFileChainSource;
use option_optimizer::observability::{MetricsConfig, init_metrics};
use option_optimizer::optimizer::StrategyOptimizer;
use option_optimizer::telemetry::init_tracing;

/// One optimization scenario read from disk.
#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(flatten)]
    command: OptimizeStrategiesCommand,
    chain_file: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::var("OPTIMIZER_CONFIG") {
        Ok(path) if !path.is_empty() => load_config(Some(&path))?,
        _ => Config::default(),
    };

    init_tracing(&config.observability.logging);

    if config.observability.metrics.enabled {
        let metrics = MetricsConfig::with_addr(config.observability.metrics.listen_addr);
        init_metrics(&metrics).context("failed to start metrics exporter")?;
    }

    let scenario_path = std::env::var("OPTIMIZER_SCENARIO")
        .context("OPTIMIZER_SCENARIO must name a scenario JSON file")?;
    let scenario = read_scenario(Path::new(&scenario_path))?;

    tracing::info!(
        underlying = %scenario.command.underlying,
        chain_file = %scenario.chain_file.display(),
        "Starting optimization"
    );

    let optimizer = Arc::new(StrategyOptimizer::new(
        config.optimizer.clone(),
        config.parallel.clone(),
    )?);
    let chain_source = Arc::new(JsonFileChainSource::new(scenario.chain_file));
    let use_case = OptimizeStrategiesUseCase::new(chain_source, optimizer);

    let report = use_case.execute(scenario.command).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Read the scenario and resolve its chain file against the scenario's directory.
fn read_scenario(path: &Path) -> anyhow::Result<Scenario> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario '{}'", path.display()))?;
    let mut scenario: Scenario = serde_json::from_str(&contents)
        .with_context(|| format!("invalid scenario '{}'", path.display()))?;

    if scenario.chain_file.is_relative() {
        if let Some(dir) = path.parent() {
            scenario.chain_file = dir.join(&scenario.chain_file);
        }
    }
    Ok(scenario)
}
