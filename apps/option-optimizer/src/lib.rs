// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::default_trait_access,
        clippy::items_after_statements,
        clippy::or_fun_call
    )
)]

//! Option Optimizer - Rust Core Library
//!
//! Composes option strategies from a chain, scores their expiration payoff
//! against target price ranges and reports the best ones. Also computes
//! mark-to-market and expiration P&L for recorded positions.
//!
//! # Architecture (Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Core**: pure, synchronous computation
//!   - `options`: contracts, legs, strategies, operations
//!   - `pricing`: payoff, P&L curves, breakevens, current P&L
//!   - `optimizer`: chain filter, candidate generation, scoring, ranking
//!
//! - **Application**: Use cases and orchestration
//!   - `ports`: `ChainSourcePort`, `PriceLookupPort`, `PositionStorePort`
//!   - `use_cases`: `OptimizeStrategies`, `EvaluatePosition`, `RecordStrategy`
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `market_data`: in-memory market, JSON chain snapshots
//!   - `persistence`: in-memory position store
//!
//! Cross-cutting: `config` (YAML), `telemetry` (tracing), `observability`
//! (Prometheus metrics).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Core
// =============================================================================

/// Crate-wide error type.
pub mod error;

/// Contracts, legs, strategies and operations.
pub mod options;

/// Payoff and P&L computation.
pub mod pricing;

/// Strategy composition and ranking.
pub mod optimizer;

// =============================================================================
// Hexagonal Layers
// =============================================================================

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// YAML configuration loading.
pub mod config;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{ErrorCode, OptimizerError};
pub use optimizer::{
    OptimizationReport, OptimizationRequest, OptimizerConfig, ParallelConfig, RunStats,
    ScoredStrategy, StrategyOptimizer, TargetRange, rank,
};
pub use options::{
    Contract, Leg, Operation, OperationLeg, OperationSide, OptionKind, Strategy, StrategyType,
};
pub use pricing::{CurrentPnl, EvaluationMesh, PnlCurve, current_pnl, pnl_curve_at_finish};

pub use application::ports::{
    ChainSourceError, ChainSourcePort, PositionStoreError, PositionStorePort, PriceLookupError,
    PriceLookupPort,
};
pub use application::use_cases::{
    EvaluatePositionUseCase, OptimizeStrategiesUseCase, RecordStrategyUseCase,
};
pub use infrastructure::{InMemoryMarketData, InMemoryPositionStore, JsonFileChainSource};
