//! Payoff and P&L engine.
//!
//! This module provides:
//! - Expiration payoff of single options and multi-leg positions
//! - Expiration P&L curves on an evaluation mesh, with breakevens
//! - Mark-to-market P&L and net composition of recorded operations
//!
//! # Example
//!
//! ```ignore
//! use option_optimizer::pricing::{EvaluationMesh, PnlCurve};
//!
//! let mesh = EvaluationMesh::around(8000.0, 0.2, 100)?;
//! let curve = PnlCurve::on_mesh(strategy.legs(), &mesh);
//! let breakevens = curve.breakevens();
//! ```

mod curve;
mod mesh;
mod payoff;
mod pnl;

pub use curve::{PnlCurve, find_breakevens, pnl_curve_at_finish};
pub(crate) use curve::{max_of, min_of};
pub use mesh::{DEFAULT_MESH_STEPS, DEFAULT_RANGE_PCT, EvaluationMesh};
pub(crate) use payoff::decimal_to_f64;
pub use payoff::{
    PayoffLeg, expiration_payoff, payoff_vector, pnl_at_finish, strategy_pnl_at_finish,
};
pub use pnl::{CurrentPnl, PositionComposition, current_pnl, position_composition};
