//! Option contracts, strategy legs and recorded operations.
//!
//! This module provides:
//! - `Contract`: an immutable, validated chain entry
//! - `Leg` / `Strategy`: signed positions on one underlying and one expiration
//! - `Operation` / `OperationLeg`: trades coming back from the position store

mod leg;
mod operation;
mod strategy;
mod types;

pub use leg::Leg;
pub use operation::{Operation, OperationLeg, OperationSide};
pub use strategy::{Strategy, StrategyType};
pub use types::{Contract, OptionKind};
