//! Core option contract types.
//!
//! Contracts are European: the engine only ever evaluates them at expiration.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;

/// Option kind (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    /// Call option (right to buy).
    Call,
    /// Put option (right to sell).
    Put,
}

impl OptionKind {
    /// Single-letter code used in generated labels.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Call => 'C',
            Self::Put => 'P',
        }
    }
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "Call"),
            Self::Put => write!(f, "Put"),
        }
    }
}

/// Wire shape of a contract before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContractRecord {
    symbol: String,
    underlying: String,
    strike: Decimal,
    kind: OptionKind,
    expiration: NaiveDate,
    #[serde(default)]
    reference_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    volume: Option<u64>,
}

/// A tradable option contract on one underlying.
///
/// Immutable once built. `reference_price` is the last traded premium; it may
/// be stale or zero, but never negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContractRecord", into = "ContractRecord")]
pub struct Contract {
    symbol: String,
    underlying: String,
    strike: Decimal,
    kind: OptionKind,
    expiration: NaiveDate,
    reference_price: Decimal,
    volume: Option<u64>,
}

impl Contract {
    /// Create a new contract.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for an empty symbol, a non-positive strike or a
    /// negative reference price.
    pub fn new(
        symbol: impl Into<String>,
        underlying: impl Into<String>,
        kind: OptionKind,
        strike: Decimal,
        expiration: NaiveDate,
        reference_price: Decimal,
    ) -> Result<Self, OptimizerError> {
        let symbol = symbol.into();
        if symbol.trim().is_empty() {
            return Err(OptimizerError::invalid_input("contract symbol must not be empty"));
        }
        if strike <= Decimal::ZERO {
            return Err(
                OptimizerError::invalid_input(format!("strike must be positive, got {strike}"))
                    .with_context("symbol", symbol),
            );
        }
        if reference_price < Decimal::ZERO {
            return Err(OptimizerError::invalid_input(format!(
                "reference price must not be negative, got {reference_price}"
            ))
            .with_context("symbol", symbol));
        }

        Ok(Self {
            symbol,
            underlying: underlying.into(),
            strike,
            kind,
            expiration,
            reference_price,
            volume: None,
        })
    }

    /// Create a call contract.
    ///
    /// # Errors
    ///
    /// See [`Contract::new`].
    pub fn call(
        symbol: impl Into<String>,
        underlying: impl Into<String>,
        strike: Decimal,
        expiration: NaiveDate,
        reference_price: Decimal,
    ) -> Result<Self, OptimizerError> {
        Self::new(symbol, underlying, OptionKind::Call, strike, expiration, reference_price)
    }

    /// Create a put contract.
    ///
    /// # Errors
    ///
    /// See [`Contract::new`].
    pub fn put(
        symbol: impl Into<String>,
        underlying: impl Into<String>,
        strike: Decimal,
        expiration: NaiveDate,
        reference_price: Decimal,
    ) -> Result<Self, OptimizerError> {
        Self::new(symbol, underlying, OptionKind::Put, strike, expiration, reference_price)
    }

    /// Attach the last traded volume.
    #[must_use]
    pub const fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// Contract symbol (unique identifier).
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Underlying symbol.
    #[must_use]
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Strike price.
    #[must_use]
    pub const fn strike(&self) -> Decimal {
        self.strike
    }

    /// Call or put.
    #[must_use]
    pub const fn kind(&self) -> OptionKind {
        self.kind
    }

    /// Expiration date.
    #[must_use]
    pub const fn expiration(&self) -> NaiveDate {
        self.expiration
    }

    /// Last traded premium.
    #[must_use]
    pub const fn reference_price(&self) -> Decimal {
        self.reference_price
    }

    /// Last traded volume, if known.
    #[must_use]
    pub const fn volume(&self) -> Option<u64> {
        self.volume
    }

    /// Check if this is a call option.
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self.kind, OptionKind::Call)
    }

    /// Check if this is a put option.
    #[must_use]
    pub const fn is_put(&self) -> bool {
        matches!(self.kind, OptionKind::Put)
    }
}

impl TryFrom<ContractRecord> for Contract {
    type Error = OptimizerError;

    fn try_from(record: ContractRecord) -> Result<Self, Self::Error> {
        let contract = Self::new(
            record.symbol,
            record.underlying,
            record.kind,
            record.strike,
            record.expiration,
            record.reference_price,
        )?;
        Ok(match record.volume {
            Some(volume) => contract.with_volume(volume),
            None => contract,
        })
    }
}

impl From<Contract> for ContractRecord {
    fn from(contract: Contract) -> Self {
        Self {
            symbol: contract.symbol,
            underlying: contract.underlying,
            strike: contract.strike,
            kind: contract.kind,
            expiration: contract.expiration,
            reference_price: contract.reference_price,
            volume: contract.volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 12, 18).unwrap()
    }

    #[test]
    fn test_option_kind_display() {
        assert_eq!(format!("{}", OptionKind::Call), "Call");
        assert_eq!(format!("{}", OptionKind::Put), "Put");
        assert_eq!(OptionKind::Put.code(), 'P');
    }

    #[test]
    fn test_contract_creation() {
        let contract = Contract::call("GGALC8200DI", "GGAL", dec!(8200), expiry(), dec!(310.5))
            .unwrap()
            .with_volume(42);

        assert_eq!(contract.symbol(), "GGALC8200DI");
        assert_eq!(contract.underlying(), "GGAL");
        assert!(contract.is_call());
        assert!(!contract.is_put());
        assert_eq!(contract.volume(), Some(42));
    }

    #[test]
    fn test_zero_reference_price_is_accepted() {
        let contract = Contract::put("P100", "XYZ", dec!(100), expiry(), Decimal::ZERO).unwrap();
        assert_eq!(contract.reference_price(), Decimal::ZERO);
    }

    #[test]
    fn test_invalid_contracts_rejected() {
        assert!(Contract::call("", "XYZ", dec!(100), expiry(), dec!(1)).is_err());
        assert!(Contract::call("C0", "XYZ", Decimal::ZERO, expiry(), dec!(1)).is_err());
        assert!(Contract::call("C100", "XYZ", dec!(100), expiry(), dec!(-0.5)).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{"symbol":"C1","underlying":"XYZ","strike":"-5","kind":"Call",
            "expiration":"2026-12-18","reference_price":"1"}"#;
        assert!(serde_json::from_str::<Contract>(json).is_err());

        let json = r#"{"symbol":"C1","underlying":"XYZ","strike":"105","kind":"Put",
            "expiration":"2026-12-18"}"#;
        let contract: Contract = serde_json::from_str(json).unwrap();
        assert_eq!(contract.kind(), OptionKind::Put);
        assert_eq!(contract.reference_price(), Decimal::ZERO);
    }
}
