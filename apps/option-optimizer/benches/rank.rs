//! Ranking Benchmarks
//!
//! Measures candidate generation plus scoring on a synthetic chain, and a
//! full optimizer run (filter, generate, score, rank).

#![allow(clippy::unwrap_used)]

use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{Criterion, criterion_group, criterion_main};
use rust_decimal::Decimal;

use option_optimizer::optimizer::{
    CandidateGenerator, OptimizationRequest, OptimizerConfig, ParallelConfig, StrategyOptimizer,
    TargetRange, filter_chain, rank, select_relevant_strikes,
};
use option_optimizer::options::Contract;
use option_optimizer::pricing::EvaluationMesh;

const SPOT: f64 = 8211.0;

/// Calls and puts every 100 points from 7000 to 9500 with a crude premium skew.
fn synthetic_chain() -> Vec<Contract> {
    let expiry = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap_or_default();
    let mut chain = Vec::new();
    for step in 0..=25_i64 {
        let strike = 7000 + step * 100;
        let call_price = ((SPOT as i64 - strike).max(0) + 40 + (25 - step) * 3).max(1);
        let put_price = ((strike - SPOT as i64).max(0) + 40 + step * 3).max(1);
        if let Ok(call) = Contract::call(
            format!("IDX C{strike}"),
            "IDX",
            Decimal::from(strike),
            expiry,
            Decimal::from(call_price),
        ) {
            chain.push(call);
        }
        if let Ok(put) = Contract::put(
            format!("IDX P{strike}"),
            "IDX",
            Decimal::from(strike),
            expiry,
            Decimal::from(put_price),
        ) {
            chain.push(put);
        }
    }
    chain
}

fn bench_rank(c: &mut Criterion) {
    let chain = synthetic_chain();
    let ranges = vec![TargetRange::at_least(8600.0).unwrap()];
    let relevant = select_relevant_strikes(&chain, SPOT, &ranges, 6).unwrap();
    let generator = CandidateGenerator::new(filter_chain(&chain, &relevant), &relevant, 4);
    let mesh = EvaluationMesh::around(SPOT, 0.2, 100).unwrap();

    c.bench_function("rank_four_leg_candidates", |b| {
        b.iter(|| {
            let ranked = rank(generator.iter(), black_box(&ranges), &mesh, None, 5);
            black_box(ranked)
        });
    });
}

fn bench_optimize(c: &mut Criterion) {
    let optimizer =
        StrategyOptimizer::new(OptimizerConfig::default(), ParallelConfig::default()).unwrap();
    let request = OptimizationRequest {
        chain: synthetic_chain(),
        spot: SPOT,
        target_ranges: vec![TargetRange::between(7800.0, 8600.0).unwrap()],
        expiration: None,
    };

    c.bench_function("optimize_full_pipeline", |b| {
        b.iter(|| black_box(optimizer.optimize(black_box(&request))));
    });
}

criterion_group!(benches, bench_rank, bench_optimize);
criterion_main!(benches);
