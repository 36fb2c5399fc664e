//! Recorded trades of an open position.
//!
//! Operations come from the position store: each one is a BUY or SELL of a
//! contract at a fill price. They feed the mark-to-market P&L and, once paired
//! with contract terms, the expiration curve.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;

use super::types::OptionKind;

/// Trade side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationSide {
    /// Opened long / bought.
    Buy,
    /// Opened short / sold.
    Sell,
}

impl OperationSide {
    /// +1 for a buy, -1 for a sell.
    #[must_use]
    pub const fn sign(self) -> i64 {
        match self {
            Self::Buy => 1,
            Self::Sell => -1,
        }
    }
}

impl std::fmt::Display for OperationSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// A single recorded trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    symbol: String,
    side: OperationSide,
    quantity: u64,
    price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operation_date: Option<NaiveDate>,
}

impl Operation {
    /// Create a new operation.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty symbol, a zero quantity or a
    /// negative price.
    pub fn new(
        symbol: impl Into<String>,
        side: OperationSide,
        quantity: u64,
        price: Decimal,
    ) -> Result<Self, OptimizerError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(OptimizerError::invalid_input("operation symbol must not be empty"));
        }
        if quantity == 0 {
            return Err(OptimizerError::invalid_input("operation quantity must be positive")
                .with_context("symbol", symbol));
        }
        if price < Decimal::ZERO {
            return Err(OptimizerError::invalid_input(format!(
                "operation price must not be negative, got {price}"
            ))
            .with_context("symbol", symbol));
        }
        Ok(Self::from_parts(symbol, side, quantity, price))
    }

    /// Build from parts already known to be valid.
    pub(crate) fn from_parts(
        symbol: impl Into<String>,
        side: OperationSide,
        quantity: u64,
        price: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            price,
            operation_date: None,
        }
    }

    /// Set the trade date.
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.operation_date = Some(date);
        self
    }

    /// Contract symbol.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Buy or sell.
    #[must_use]
    pub const fn side(&self) -> OperationSide {
        self.side
    }

    /// Unsigned quantity.
    #[must_use]
    pub const fn quantity(&self) -> u64 {
        self.quantity
    }

    /// Fill price.
    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Trade date, if recorded.
    #[must_use]
    pub const fn operation_date(&self) -> Option<NaiveDate> {
        self.operation_date
    }

    /// +quantity for a buy, -quantity for a sell.
    #[must_use]
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * i64::try_from(self.quantity).unwrap_or(i64::MAX)
    }
}

/// An operation joined with the terms of the contract it traded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLeg {
    /// The recorded trade.
    pub operation: Operation,
    /// Call or put.
    pub kind: OptionKind,
    /// Strike price.
    pub strike: Decimal,
}

impl OperationLeg {
    /// Pair an operation with its contract terms.
    #[must_use]
    pub const fn new(operation: Operation, kind: OptionKind, strike: Decimal) -> Self {
        Self {
            operation,
            kind,
            strike,
        }
    }
}
