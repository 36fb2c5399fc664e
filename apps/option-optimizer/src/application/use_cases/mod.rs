//! Application Use Cases
//!
//! Use cases orchestrate the optimizer core and the driven ports.

mod evaluate_position;
mod optimize_strategies;
mod record_strategy;

pub use evaluate_position::{EvaluatePositionError, EvaluatePositionUseCase, PositionEvaluation};
pub use optimize_strategies::{
    OptimizeStrategiesCommand, OptimizeStrategiesError, OptimizeStrategiesUseCase,
};
pub use record_strategy::{RecordStrategyError, RecordStrategyUseCase};
