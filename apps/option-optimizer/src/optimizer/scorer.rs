//! Scorer and ranker.
//!
//! Scoring is a parallel map over candidates: P&L on the mesh, max loss and
//! max profit, the mean P&L inside the target ranges. Deduplication, sorting
//! and truncation happen in a single-threaded reduce so the output does not
//! depend on scheduling.

use std::cmp::Ordering;

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{Level, span};

use super::ranges::{TargetRange, in_any, validate_ranges};
use crate::error::OptimizerError;
use crate::options::Strategy;
use crate::pricing::{EvaluationMesh, find_breakevens, max_of, min_of, strategy_pnl_at_finish};

/// Relative tolerance used by [`rank`] when comparing P&L vectors.
pub const DEFAULT_DEDUP_EPSILON: f64 = 1e-6;

/// A ranked candidate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredStrategy {
    /// The candidate.
    pub strategy: Strategy,
    /// Net debit (positive) or credit (negative) at reference prices.
    pub cost: Decimal,
    /// Mean P&L over mesh points inside any target range; 0 when none is.
    pub score: f64,
    /// Largest P&L on the mesh.
    pub max_profit: f64,
    /// Smallest P&L on the mesh.
    pub max_loss: f64,
    /// Prices where the P&L crosses zero.
    pub breakevens: Vec<f64>,
}

/// Candidate after the parallel map.
#[derive(Debug, Clone)]
pub(crate) struct Evaluation {
    index: usize,
    strategy: Strategy,
    pnl: Vec<f64>,
    score: f64,
    max_profit: f64,
    max_loss: f64,
}

/// Outcome of scoring one candidate.
#[derive(Debug, Clone)]
pub(crate) enum Verdict {
    Kept(Evaluation),
    OverRisk,
}

/// Mesh, range membership and risk limit shared by every candidate of a run.
#[derive(Debug, Clone)]
pub(crate) struct ScoringContext<'a> {
    mesh: &'a EvaluationMesh,
    in_range: Vec<bool>,
    max_risk: Option<f64>,
}

impl<'a> ScoringContext<'a> {
    pub(crate) fn new(
        mesh: &'a EvaluationMesh,
        target_ranges: &[TargetRange],
        max_risk: Option<f64>,
    ) -> Self {
        let in_range = mesh
            .prices()
            .iter()
            .map(|&p| in_any(target_ranges, p))
            .collect();
        Self {
            mesh,
            in_range,
            max_risk,
        }
    }

    /// Score one candidate. `index` is its position in generation order.
    pub(crate) fn evaluate(&self, index: usize, strategy: Strategy) -> Verdict {
        let pnl = strategy_pnl_at_finish(&strategy, self.mesh.prices());
        let max_loss = min_of(&pnl).unwrap_or(0.0);
        let max_profit = max_of(&pnl).unwrap_or(0.0);

        if let Some(limit) = self.max_risk {
            if max_loss < 0.0 && -max_loss > limit {
                return Verdict::OverRisk;
            }
        }

        let (sum, count) = pnl
            .iter()
            .zip(&self.in_range)
            .filter(|(_, inside)| **inside)
            .fold((0.0, 0usize), |(s, n), (v, _)| (s + v, n + 1));
        let score = if count == 0 { 0.0 } else { sum / count as f64 };

        Verdict::Kept(Evaluation {
            index,
            strategy,
            pnl,
            score,
            max_profit,
            max_loss,
        })
    }

    /// Score a batch, in parallel when it is at least `min_parallel` long.
    ///
    /// Output order matches input order.
    pub(crate) fn evaluate_batch(
        &self,
        batch: Vec<(usize, Strategy)>,
        min_parallel: usize,
    ) -> Vec<Verdict> {
        if batch.len() >= min_parallel {
            batch
                .into_par_iter()
                .map(|(index, strategy)| {
                    let _span = span!(Level::TRACE, "score_candidate", index).entered();
                    self.evaluate(index, strategy)
                })
                .collect()
        } else {
            batch
                .into_iter()
                .map(|(index, strategy)| self.evaluate(index, strategy))
                .collect()
        }
    }
}

/// Result of the reduce step.
#[derive(Debug, Clone)]
pub(crate) struct Reduced {
    pub(crate) ranked: Vec<ScoredStrategy>,
    pub(crate) duplicates_removed: usize,
}

/// Deduplicate, sort and keep the best `top_n`.
pub(crate) fn reduce(
    mut evaluations: Vec<Evaluation>,
    dedup_epsilon: f64,
    top_n: usize,
    mesh: &EvaluationMesh,
) -> Reduced {
    // Cheapest representative of each payoff profile wins
    evaluations.sort_by(|a, b| {
        a.strategy
            .cost()
            .cmp(&b.strategy.cost())
            .then(a.index.cmp(&b.index))
    });

    let before = evaluations.len();
    let mut kept: Vec<Evaluation> = Vec::with_capacity(before);
    for candidate in evaluations {
        let duplicate = kept
            .iter()
            .any(|k| same_profile(&k.pnl, &candidate.pnl, dedup_epsilon));
        if !duplicate {
            kept.push(candidate);
        }
    }
    let duplicates_removed = before - kept.len();

    kept.sort_by(compare_ranked);
    kept.truncate(top_n);

    let ranked = kept
        .into_iter()
        .map(|e| ScoredStrategy {
            cost: e.strategy.cost(),
            breakevens: find_breakevens(mesh.prices(), &e.pnl),
            strategy: e.strategy,
            score: e.score,
            max_profit: e.max_profit,
            max_loss: e.max_loss,
        })
        .collect();

    Reduced {
        ranked,
        duplicates_removed,
    }
}

/// Score descending, then |cost|, leg count and generation order ascending.
fn compare_ranked(a: &Evaluation, b: &Evaluation) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.strategy.cost().abs().cmp(&b.strategy.cost().abs()))
        .then_with(|| a.strategy.leg_count().cmp(&b.strategy.leg_count()))
        .then_with(|| a.index.cmp(&b.index))
}

/// Element-wise equality within a relative tolerance.
fn same_profile(a: &[f64], b: &[f64], epsilon: f64) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| (x - y).abs() <= epsilon * x.abs().max(y.abs()).max(1.0))
}

/// Rank `candidates` against `target_ranges` on `mesh` and keep the best `top_n`.
///
/// Candidates whose worst loss exceeds `max_risk` are dropped silently. An
/// empty result is a valid outcome.
///
/// # Errors
///
/// Returns `InvalidInput` if the ranges are empty or overlap, `top_n < 1`, or
/// `max_risk` is negative or not finite.
pub fn rank<I>(
    candidates: I,
    target_ranges: &[TargetRange],
    mesh: &EvaluationMesh,
    max_risk: Option<f64>,
    top_n: usize,
) -> Result<Vec<ScoredStrategy>, OptimizerError>
where
    I: IntoIterator<Item = Strategy>,
{
    validate_ranges(target_ranges)?;
    if top_n < 1 {
        return Err(OptimizerError::invalid_input("top_n must be at least 1"));
    }
    if let Some(limit) = max_risk {
        if !limit.is_finite() || limit < 0.0 {
            return Err(OptimizerError::invalid_input(format!(
                "max_risk must be a non-negative number, got {limit}"
            )));
        }
    }

    let context = ScoringContext::new(mesh, target_ranges, max_risk);
    let batch: Vec<(usize, Strategy)> = candidates.into_iter().enumerate().collect();
    let evaluations = context
        .evaluate_batch(batch, 1)
        .into_iter()
        .filter_map(|verdict| match verdict {
            Verdict::Kept(evaluation) => Some(evaluation),
            Verdict::OverRisk => None,
        })
        .collect();

    Ok(reduce(evaluations, DEFAULT_DEDUP_EPSILON, top_n, mesh).ranked)
}
