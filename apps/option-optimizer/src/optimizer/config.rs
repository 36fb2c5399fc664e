//! Optimizer constraints and worker pool settings.

use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;
use crate::pricing::{DEFAULT_MESH_STEPS, DEFAULT_RANGE_PCT};

/// Constraints applied to one optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Maximum legs per strategy. Archetypes with more legs are not generated.
    #[serde(default = "default_max_legs")]
    pub max_legs: usize,
    /// Largest acceptable loss at expiration (absolute value). `None` = no limit.
    #[serde(default)]
    pub max_risk: Option<f64>,
    /// Minimum traded volume, in whole contracts. Compared against
    /// `Contract::volume`, which is a contract count, so fractional thresholds
    /// are rejected when parsing. Contracts with unknown volume are kept.
    #[serde(default)]
    pub min_liquidity: Option<u64>,
    /// Number of strategies returned.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Half-width of the evaluation mesh as a fraction of spot.
    #[serde(default = "default_range_pct")]
    pub range_pct: f64,
    /// Number of mesh points.
    #[serde(default = "default_mesh_steps")]
    pub mesh_steps: usize,
    /// Strike cap on each side of spot.
    #[serde(default = "default_max_strikes_per_side")]
    pub max_strikes_per_side: usize,
    /// Relative tolerance when comparing P&L vectors for duplicates.
    #[serde(default = "default_dedup_epsilon")]
    pub dedup_epsilon: f64,
    /// Stop pulling new candidates after this many milliseconds.
    #[serde(default)]
    pub time_budget_ms: Option<u64>,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            max_legs: default_max_legs(),
            max_risk: None,
            min_liquidity: None,
            top_n: default_top_n(),
            range_pct: default_range_pct(),
            mesh_steps: default_mesh_steps(),
            max_strikes_per_side: default_max_strikes_per_side(),
            dedup_epsilon: default_dedup_epsilon(),
            time_budget_ms: None,
        }
    }
}

impl OptimizerConfig {
    /// Check every constraint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` naming the first offending field.
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.max_legs < 1 {
            return Err(OptimizerError::invalid_input("max_legs must be at least 1"));
        }
        if self.top_n < 1 {
            return Err(OptimizerError::invalid_input("top_n must be at least 1"));
        }
        if !self.range_pct.is_finite() || self.range_pct <= 0.0 || self.range_pct > 1.0 {
            return Err(OptimizerError::invalid_input(format!(
                "range_pct must be in (0, 1], got {}",
                self.range_pct
            )));
        }
        if self.mesh_steps < 2 {
            return Err(OptimizerError::invalid_input(format!(
                "mesh_steps must be at least 2, got {}",
                self.mesh_steps
            )));
        }
        if self.max_strikes_per_side < 1 {
            return Err(OptimizerError::invalid_input(
                "max_strikes_per_side must be at least 1",
            ));
        }
        if !self.dedup_epsilon.is_finite() || self.dedup_epsilon < 0.0 {
            return Err(OptimizerError::invalid_input(format!(
                "dedup_epsilon must be a non-negative number, got {}",
                self.dedup_epsilon
            )));
        }
        if let Some(max_risk) = self.max_risk {
            if !max_risk.is_finite() || max_risk < 0.0 {
                return Err(OptimizerError::invalid_input(format!(
                    "max_risk must be a non-negative number, got {max_risk}"
                )));
            }
        }
        Ok(())
    }
}

/// Worker pool used for candidate scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Maximum number of threads to use (0 = use all available).
    #[serde(default)]
    pub max_threads: usize,
    /// Batches smaller than this are scored on the calling thread.
    #[serde(default = "default_min_parallel_candidates")]
    pub min_parallel_candidates: usize,
    /// Candidates pulled from the generator between deadline checks.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            min_parallel_candidates: default_min_parallel_candidates(),
            batch_size: default_batch_size(),
        }
    }
}

const fn default_max_legs() -> usize {
    4
}

const fn default_top_n() -> usize {
    5
}

const fn default_range_pct() -> f64 {
    DEFAULT_RANGE_PCT
}

const fn default_mesh_steps() -> usize {
    DEFAULT_MESH_STEPS
}

const fn default_max_strikes_per_side() -> usize {
    6
}

const fn default_dedup_epsilon() -> f64 {
    1e-6
}

const fn default_min_parallel_candidates() -> usize {
    64
}

const fn default_batch_size() -> usize {
    512
}
