//! Strategy composition and optimization.
//!
//! Pipeline, left to right:
//! 1. Chain filter: a bounded set of strikes near spot and near the range boundaries
//! 2. Candidate generator: lazy sequence of single legs, spreads and wing structures
//! 3. Scorer: expiration P&L of each candidate on the evaluation mesh (parallel)
//! 4. Ranker: deduplicate equal payoffs, sort, keep the top N (sequential)

mod candidates;
mod config;
mod engine;
mod filter;
mod ranges;
mod scorer;

pub use candidates::CandidateGenerator;
pub use config::{OptimizerConfig, ParallelConfig};
pub use engine::{OptimizationReport, OptimizationRequest, RunStats, StrategyOptimizer};
pub use filter::{RelevantStrikes, filter_chain, filter_liquidity, select_relevant_strikes};
pub use ranges::{TargetRange, in_any, validate_ranges};
pub use scorer::{DEFAULT_DEDUP_EPSILON, ScoredStrategy, rank};
