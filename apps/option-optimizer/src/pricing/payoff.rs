//! Expiration payoff and P&L at expiration.
//!
//! Contracts are European, so a leg's value at expiration is its intrinsic
//! value. P&L subtracts the entry premium:
//!
//! ```text
//! pnl(S_T) = Σ q_i × (payoff_i(S_T) − entry_i)
//! ```
//!
//! Every function here is pure and vectorized over a slice of underlying
//! prices; the output always has the length of the input slice.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::options::{Leg, OperationLeg, OptionKind, Strategy};

/// Anything that can be priced at expiration.
pub trait PayoffLeg {
    /// Call or put.
    fn kind(&self) -> OptionKind;
    /// Strike price.
    fn strike(&self) -> Decimal;
    /// Positive for long, negative for short.
    fn signed_quantity(&self) -> i64;
    /// Premium paid or received per contract.
    fn entry_price(&self) -> Decimal;
}

impl PayoffLeg for Leg {
    fn kind(&self) -> OptionKind {
        self.contract().kind()
    }

    fn strike(&self) -> Decimal {
        self.contract().strike()
    }

    fn signed_quantity(&self) -> i64 {
        Self::signed_quantity(self)
    }

    fn entry_price(&self) -> Decimal {
        self.contract().reference_price()
    }
}

impl PayoffLeg for OperationLeg {
    fn kind(&self) -> OptionKind {
        self.kind
    }

    fn strike(&self) -> Decimal {
        self.strike
    }

    fn signed_quantity(&self) -> i64 {
        self.operation.signed_quantity()
    }

    fn entry_price(&self) -> Decimal {
        self.operation.price()
    }
}

/// Convert a decimal price into the float domain used by payoff vectors.
pub(crate) fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Intrinsic value of one option at expiration. Never negative.
#[must_use]
pub fn expiration_payoff(kind: OptionKind, strike: f64, spot_at_expiry: f64) -> f64 {
    match kind {
        OptionKind::Call => (spot_at_expiry - strike).max(0.0),
        OptionKind::Put => (strike - spot_at_expiry).max(0.0),
    }
}

/// Intrinsic value of one option for each price in `prices`.
#[must_use]
pub fn payoff_vector(kind: OptionKind, strike: f64, prices: &[f64]) -> Vec<f64> {
    prices
        .iter()
        .map(|&s| expiration_payoff(kind, strike, s))
        .collect()
}

/// Total P&L at expiration of `legs` for each price in `prices`.
#[must_use]
pub fn pnl_at_finish<L: PayoffLeg>(legs: &[L], prices: &[f64]) -> Vec<f64> {
    let mut total = vec![0.0; prices.len()];

    for leg in legs {
        let quantity = leg.signed_quantity() as f64;
        let strike = decimal_to_f64(leg.strike());
        let entry = decimal_to_f64(leg.entry_price());
        let kind = leg.kind();

        for (acc, &s) in total.iter_mut().zip(prices) {
            *acc += quantity * (expiration_payoff(kind, strike, s) - entry);
        }
    }

    total
}

/// P&L at expiration of a strategy, entered at reference prices.
#[must_use]
pub fn strategy_pnl_at_finish(strategy: &Strategy, prices: &[f64]) -> Vec<f64> {
    pnl_at_finish(strategy.legs(), prices)
}
