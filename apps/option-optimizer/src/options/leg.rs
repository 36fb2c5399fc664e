//! Strategy leg: one contract plus a signed quantity.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::OptimizerError;

use super::types::Contract;

/// A single leg of a strategy.
///
/// The contract is shared: candidate strategies built from the same filtered
/// chain point at the same `Contract` values. Only serialized: a leg is always
/// built through [`Leg::new`] so the quantity is never zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leg {
    contract: Arc<Contract>,
    quantity: i64,
}

impl Leg {
    /// Create a leg from a signed quantity (positive = long, negative = short).
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `quantity` is zero.
    pub fn new(contract: Arc<Contract>, quantity: i64) -> Result<Self, OptimizerError> {
        if quantity == 0 {
            return Err(OptimizerError::invalid_input("leg quantity must be nonzero")
                .with_context("symbol", contract.symbol()));
        }
        Ok(Self { contract, quantity })
    }

    /// Long `quantity` contracts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `quantity` is zero.
    pub fn long(contract: Arc<Contract>, quantity: u32) -> Result<Self, OptimizerError> {
        Self::new(contract, i64::from(quantity))
    }

    /// Short `quantity` contracts.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when `quantity` is zero.
    pub fn short(contract: Arc<Contract>, quantity: u32) -> Result<Self, OptimizerError> {
        Self::new(contract, -i64::from(quantity))
    }

    /// The contract traded by this leg.
    #[must_use]
    pub fn contract(&self) -> &Contract {
        &self.contract
    }

    /// Shared handle to the contract.
    #[must_use]
    pub fn contract_handle(&self) -> &Arc<Contract> {
        &self.contract
    }

    /// Signed quantity (positive for long, negative for short).
    #[must_use]
    pub const fn signed_quantity(&self) -> i64 {
        self.quantity
    }

    /// Premium paid (positive) or received (negative) for this leg.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        Decimal::from(self.quantity) * self.contract.reference_price()
    }

    /// The same leg with its direction flipped.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            contract: Arc::clone(&self.contract),
            quantity: -self.quantity,
        }
    }
}
