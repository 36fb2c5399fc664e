//! Optimize Strategies Use Case

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::application::ports::{ChainSourceError, ChainSourcePort};
use crate::error::OptimizerError;
use crate::optimizer::{OptimizationReport, OptimizationRequest, StrategyOptimizer, TargetRange};

/// Input of [`OptimizeStrategiesUseCase`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeStrategiesCommand {
    /// Underlying whose chain is loaded.
    pub underlying: String,
    /// Current underlying price.
    pub spot: f64,
    /// Where the strategy should pay off at expiration.
    pub target_ranges: Vec<TargetRange>,
    /// Expiration to use when the chain spans several.
    #[serde(default)]
    pub expiration: Option<NaiveDate>,
}

/// Errors from [`OptimizeStrategiesUseCase`].
#[derive(Debug, thiserror::Error)]
pub enum OptimizeStrategiesError {
    /// Chain source failure, unchanged.
    #[error(transparent)]
    ChainSource(#[from] ChainSourceError),

    /// Optimizer rejected the request.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),

    /// The blocking optimizer task panicked or was cancelled.
    #[error("Optimizer task failed: {message}")]
    TaskFailed {
        /// Error details.
        message: String,
    },
}

/// Use case for ranking strategies on a chain loaded from a chain source.
pub struct OptimizeStrategiesUseCase<C>
where
    C: ChainSourcePort,
{
    chain_source: Arc<C>,
    optimizer: Arc<StrategyOptimizer>,
}

impl<C> OptimizeStrategiesUseCase<C>
where
    C: ChainSourcePort,
{
    /// Create a new OptimizeStrategiesUseCase.
    pub const fn new(chain_source: Arc<C>, optimizer: Arc<StrategyOptimizer>) -> Self {
        Self {
            chain_source,
            optimizer,
        }
    }

    /// Execute the use case.
    ///
    /// The optimizer is CPU bound and runs on the blocking pool.
    pub async fn execute(
        &self,
        command: OptimizeStrategiesCommand,
    ) -> Result<OptimizationReport, OptimizeStrategiesError> {
        // 1. Load the chain
        let chain = self.chain_source.option_chain(&command.underlying).await?;
        debug!(
            underlying = %command.underlying,
            contracts = chain.len(),
            "Loaded option chain"
        );

        // 2. Optimize off the async runtime
        let request = OptimizationRequest {
            chain,
            spot: command.spot,
            target_ranges: command.target_ranges,
            expiration: command.expiration,
        };
        let optimizer = Arc::clone(&self.optimizer);
        let report = tokio::task::spawn_blocking(move || optimizer.optimize(&request))
            .await
            .map_err(|e| OptimizeStrategiesError::TaskFailed {
                message: e.to_string(),
            })??;

        info!(
            underlying = %command.underlying,
            returned = report.strategies.len(),
            "Strategies optimized"
        );
        Ok(report)
    }
}
