//! Optimizer façade: validation, filtering, generation, scoring.
//!
//! # Example
//!
//! ```ignore
//! use option_optimizer::optimizer::{
//!     OptimizationRequest, OptimizerConfig, ParallelConfig, StrategyOptimizer, TargetRange,
//! };
//!
//! let optimizer = StrategyOptimizer::new(OptimizerConfig::default(), ParallelConfig::default())?;
//! let report = optimizer.optimize(&OptimizationRequest {
//!     chain,
//!     spot: 8050.0,
//!     target_ranges: vec![TargetRange::at_least(8211.0)?],
//!     expiration: None,
//! })?;
//! ```

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use rayon::ThreadPool;
use serde::{Deserialize, Serialize};
use tracing::{Level, debug, info, span, warn};

use super::candidates::CandidateGenerator;
use super::config::{OptimizerConfig, ParallelConfig};
use super::filter::{filter_chain, filter_liquidity, select_relevant_strikes};
use super::ranges::{TargetRange, validate_ranges};
use super::scorer::{ScoredStrategy, ScoringContext, Verdict, reduce};
use crate::error::OptimizerError;
use crate::observability::{
    record_candidates_discarded, record_candidates_generated, record_optimization_run,
};
use crate::options::Contract;
use crate::pricing::EvaluationMesh;

/// One optimization call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationRequest {
    /// Option chain on one underlying.
    pub chain: Vec<Contract>,
    /// Current underlying price.
    pub spot: f64,
    /// Where the strategy should pay off at expiration.
    pub target_ranges: Vec<TargetRange>,
    /// Expiration to use when the chain spans several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<NaiveDate>,
}

/// Counters describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Contracts left after expiration and liquidity filtering.
    pub contracts_considered: usize,
    /// Distinct strikes kept by the chain filter.
    pub strikes_selected: usize,
    /// Candidates pulled from the generator.
    pub candidates_generated: usize,
    /// Candidates whose worst loss exceeded `max_risk`.
    pub candidates_discarded_by_risk: usize,
    /// Candidates with the same payoff as a cheaper one.
    pub duplicates_removed: usize,
    /// Whether the time budget stopped generation early.
    pub truncated_by_deadline: bool,
    /// Wall time of the run.
    pub elapsed_ms: u64,
}

/// Ranked strategies plus run statistics.
#[derive(Debug, Clone, Serialize)]
pub struct OptimizationReport {
    /// Best strategies, best first.
    pub strategies: Vec<ScoredStrategy>,
    /// Run statistics.
    pub stats: RunStats,
}

impl OptimizationReport {
    fn empty(stats: RunStats) -> Self {
        Self {
            strategies: Vec::new(),
            stats,
        }
    }
}

/// Strategy optimizer.
///
/// Holds its own rayon pool so concurrent optimizers never contend for the
/// global one. Safe to share between threads.
pub struct StrategyOptimizer {
    config: OptimizerConfig,
    parallel: ParallelConfig,
    pool: Arc<ThreadPool>,
}

impl std::fmt::Debug for StrategyOptimizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyOptimizer")
            .field("config", &self.config)
            .field("parallel", &self.parallel)
            .field("threads", &self.pool.current_num_threads())
            .finish()
    }
}

impl StrategyOptimizer {
    /// Create an optimizer and its worker pool.
    ///
    /// # Errors
    ///
    /// Returns `ThreadPool` if the worker pool cannot be built.
    pub fn new(config: OptimizerConfig, parallel: ParallelConfig) -> Result<Self, OptimizerError> {
        let mut builder = rayon::ThreadPoolBuilder::new()
            .thread_name(|i| format!("optimizer-score-{i}"));
        if parallel.max_threads > 0 {
            builder = builder.num_threads(parallel.max_threads);
        }
        let pool = builder
            .build()
            .map_err(|e| OptimizerError::thread_pool(e.to_string()))?;

        Ok(Self {
            config,
            parallel,
            pool: Arc::new(pool),
        })
    }

    /// Optimizer constraints.
    #[must_use]
    pub const fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Number of scoring threads.
    #[must_use]
    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Rank strategies for `request`.
    ///
    /// Every input check runs before any candidate is generated. An empty
    /// ranking is a valid outcome.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a bad request or configuration.
    pub fn optimize(
        &self,
        request: &OptimizationRequest,
    ) -> Result<OptimizationReport, OptimizerError> {
        let _span = span!(Level::INFO, "optimize", spot = request.spot).entered();
        let start = Instant::now();

        let result = self.run(request, start);
        let elapsed = start.elapsed().as_secs_f64();
        match &result {
            Ok(report) if report.stats.truncated_by_deadline => {
                record_optimization_run("truncated", elapsed);
            }
            Ok(_) => record_optimization_run("ok", elapsed),
            Err(e) => {
                warn!(error = %e, "Optimization rejected");
                record_optimization_run("invalid_input", elapsed);
            }
        }
        result
    }

    fn run(
        &self,
        request: &OptimizationRequest,
        start: Instant,
    ) -> Result<OptimizationReport, OptimizerError> {
        self.config.validate()?;
        validate_ranges(&request.target_ranges)?;
        if !request.spot.is_finite() || request.spot <= 0.0 {
            return Err(OptimizerError::invalid_input(format!(
                "spot must be positive and finite, got {}",
                request.spot
            )));
        }
        let chain = select_expiration(&request.chain, request.expiration)?;
        let mesh =
            EvaluationMesh::around(request.spot, self.config.range_pct, self.config.mesh_steps)?;

        let mut stats = RunStats::default();
        let liquid = filter_liquidity(&chain, self.config.min_liquidity);
        stats.contracts_considered = liquid.len();
        if liquid.is_empty() {
            info!(
                min_liquidity = ?self.config.min_liquidity,
                "No contract passed the liquidity filter"
            );
            stats.elapsed_ms = elapsed_ms(start);
            return Ok(OptimizationReport::empty(stats));
        }

        let relevant = select_relevant_strikes(
            &liquid,
            request.spot,
            &request.target_ranges,
            self.config.max_strikes_per_side,
        )?;
        stats.strikes_selected = relevant.len();
        debug!(
            atm = %relevant.atm(),
            strikes = relevant.len(),
            "Selected relevant strikes"
        );

        let generator = CandidateGenerator::new(
            filter_chain(&liquid, &relevant),
            &relevant,
            self.config.max_legs,
        );
        let context = ScoringContext::new(&mesh, &request.target_ranges, self.config.max_risk);
        let deadline = self
            .config
            .time_budget_ms
            .map(|ms| start + Duration::from_millis(ms));

        let mut evaluations = Vec::new();
        let mut candidates = generator.iter().enumerate();
        let batch_size = self.parallel.batch_size.max(1);
        loop {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                stats.truncated_by_deadline = true;
                break;
            }
            let batch: Vec<_> = candidates.by_ref().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            stats.candidates_generated += batch.len();

            let verdicts = self.pool.install(|| {
                context.evaluate_batch(batch, self.parallel.min_parallel_candidates)
            });
            for verdict in verdicts {
                match verdict {
                    Verdict::Kept(evaluation) => evaluations.push(evaluation),
                    Verdict::OverRisk => stats.candidates_discarded_by_risk += 1,
                }
            }
        }

        let reduced = reduce(evaluations, self.config.dedup_epsilon, self.config.top_n, &mesh);
        stats.duplicates_removed = reduced.duplicates_removed;
        stats.elapsed_ms = elapsed_ms(start);

        record_candidates_generated(stats.candidates_generated);
        record_candidates_discarded("max_risk", stats.candidates_discarded_by_risk);
        record_candidates_discarded("duplicate", stats.duplicates_removed);

        if stats.truncated_by_deadline {
            warn!(
                budget_ms = ?self.config.time_budget_ms,
                generated = stats.candidates_generated,
                "Time budget exhausted, returning partial ranking"
            );
        }
        info!(
            generated = stats.candidates_generated,
            discarded_by_risk = stats.candidates_discarded_by_risk,
            duplicates = stats.duplicates_removed,
            returned = reduced.ranked.len(),
            elapsed_ms = stats.elapsed_ms,
            "Optimization complete"
        );

        Ok(OptimizationReport {
            strategies: reduced.ranked,
            stats,
        })
    }
}

/// Contracts of the single expiration the run works on.
///
/// The chain must be non-empty and cover one underlying. With an explicit
/// `expiration` only matching contracts are kept; without one the chain must
/// carry a single expiration.
fn select_expiration(
    chain: &[Contract],
    expiration: Option<NaiveDate>,
) -> Result<Vec<Contract>, OptimizerError> {
    if chain.is_empty() {
        return Err(OptimizerError::invalid_input("option chain is empty"));
    }

    let underlyings: BTreeSet<&str> = chain.iter().map(Contract::underlying).collect();
    if underlyings.len() > 1 {
        return Err(
            OptimizerError::invalid_input("option chain spans several underlyings").with_context(
                "underlyings",
                underlyings.into_iter().collect::<Vec<_>>().join(","),
            ),
        );
    }

    match expiration {
        Some(date) => {
            let selected: Vec<Contract> = chain
                .iter()
                .filter(|c| c.expiration() == date)
                .cloned()
                .collect();
            if selected.is_empty() {
                return Err(OptimizerError::invalid_input(
                    "no contract in the chain expires on the requested date",
                )
                .with_context("expiration", date.to_string()));
            }
            Ok(selected)
        }
        None => {
            let expirations: BTreeSet<NaiveDate> = chain.iter().map(Contract::expiration).collect();
            if expirations.len() > 1 {
                return Err(OptimizerError::invalid_input(
                    "option chain spans several expirations; pick one",
                )
                .with_context("expirations", expirations.len().to_string()));
            }
            Ok(chain.to_vec())
        }
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}
