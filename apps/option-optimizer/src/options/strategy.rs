//! Strategy type definitions.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::OptimizerError;

use super::leg::Leg;
use super::operation::{Operation, OperationSide};
use super::types::Contract;

/// Archetype of an options strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StrategyType {
    /// Long call.
    LongCall,
    /// Short call.
    ShortCall,
    /// Long put.
    LongPut,
    /// Short put.
    ShortPut,
    /// Bull Call Spread (long lower call, short higher call).
    BullCallSpread,
    /// Bear Call Spread (short lower call, long higher call).
    BearCallSpread,
    /// Bull Put Spread (long lower put, short higher put).
    BullPutSpread,
    /// Bear Put Spread (short lower put, long higher put).
    BearPutSpread,
    /// Long call and long put at the same strike.
    LongStraddle,
    /// Short call and short put at the same strike.
    ShortStraddle,
    /// Long call and long put at different strikes.
    LongStrangle,
    /// Short call and short put at different strikes.
    ShortStrangle,
    /// Long wings, two short calls at the body.
    LongCallButterfly,
    /// Short wings, two long calls at the body.
    ShortCallButterfly,
    /// Long wings, two short puts at the body.
    LongPutButterfly,
    /// Short wings, two long puts at the body.
    ShortPutButterfly,
    /// Short straddle at the body, long put and call wings.
    IronButterfly,
    /// Long straddle at the body, short put and call wings.
    ReverseIronButterfly,
    /// Short put and call bodies, long put and call wings.
    IronCondor,
    /// Long put and call bodies, short put and call wings.
    ReverseIronCondor,
    /// Long call wings, short call bodies.
    LongCallCondor,
    /// Short call wings, long call bodies.
    ShortCallCondor,
    /// Long put wings, short put bodies.
    LongPutCondor,
    /// Short put wings, long put bodies.
    ShortPutCondor,
    /// Any other combination of legs.
    Custom,
}

impl StrategyType {
    /// The archetype obtained by flipping every leg.
    #[must_use]
    pub const fn inverse(self) -> Self {
        match self {
            Self::LongCall => Self::ShortCall,
            Self::ShortCall => Self::LongCall,
            Self::LongPut => Self::ShortPut,
            Self::ShortPut => Self::LongPut,
            Self::BullCallSpread => Self::BearCallSpread,
            Self::BearCallSpread => Self::BullCallSpread,
            Self::BullPutSpread => Self::BearPutSpread,
            Self::BearPutSpread => Self::BullPutSpread,
            Self::LongStraddle => Self::ShortStraddle,
            Self::ShortStraddle => Self::LongStraddle,
            Self::LongStrangle => Self::ShortStrangle,
            Self::ShortStrangle => Self::LongStrangle,
            Self::LongCallButterfly => Self::ShortCallButterfly,
            Self::ShortCallButterfly => Self::LongCallButterfly,
            Self::LongPutButterfly => Self::ShortPutButterfly,
            Self::ShortPutButterfly => Self::LongPutButterfly,
            Self::IronButterfly => Self::ReverseIronButterfly,
            Self::ReverseIronButterfly => Self::IronButterfly,
            Self::IronCondor => Self::ReverseIronCondor,
            Self::ReverseIronCondor => Self::IronCondor,
            Self::LongCallCondor => Self::ShortCallCondor,
            Self::ShortCallCondor => Self::LongCallCondor,
            Self::LongPutCondor => Self::ShortPutCondor,
            Self::ShortPutCondor => Self::LongPutCondor,
            Self::Custom => Self::Custom,
        }
    }
}

/// A multi-leg strategy on one underlying and one expiration.
///
/// Invariants enforced by [`Strategy::new`]:
/// - at least one leg after netting
/// - every leg shares the underlying and the expiration of the first leg
/// - at most one leg per contract symbol, none with zero quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Strategy {
    strategy_type: StrategyType,
    legs: Vec<Leg>,
    cost: Decimal,
}

impl Strategy {
    /// Build a strategy, netting legs that trade the same contract.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `legs` is empty, mixes underlyings or
    /// expirations, or nets out to a flat position.
    pub fn new(strategy_type: StrategyType, legs: Vec<Leg>) -> Result<Self, OptimizerError> {
        let Some(first) = legs.first() else {
            return Err(OptimizerError::invalid_input("strategy requires at least one leg"));
        };
        let underlying = first.contract().underlying().to_string();
        let expiration = first.contract().expiration();

        let mut positions: Vec<(Arc<Contract>, i64)> = Vec::with_capacity(legs.len());
        for leg in legs {
            let contract = leg.contract();
            if contract.underlying() != underlying {
                return Err(OptimizerError::invalid_input(
                    "strategy legs must share one underlying",
                )
                .with_context("expected", underlying)
                .with_context("found", contract.underlying()));
            }
            if contract.expiration() != expiration {
                return Err(OptimizerError::invalid_input(
                    "strategy legs must share one expiration",
                )
                .with_context("expected", expiration.to_string())
                .with_context("found", contract.expiration().to_string()));
            }

            match positions
                .iter_mut()
                .find(|(existing, _)| existing.symbol() == contract.symbol())
            {
                Some((_, quantity)) => *quantity += leg.signed_quantity(),
                None => positions.push((Arc::clone(leg.contract_handle()), leg.signed_quantity())),
            }
        }

        let netted: Vec<Leg> = positions
            .into_iter()
            .filter_map(|(contract, quantity)| Leg::new(contract, quantity).ok())
            .collect();

        if netted.is_empty() {
            return Err(OptimizerError::invalid_input(
                "degenerate strategy: every leg nets to zero",
            ));
        }

        let cost = netted.iter().map(Leg::cost).sum();
        Ok(Self {
            strategy_type,
            legs: netted,
            cost,
        })
    }

    /// Archetype tag.
    #[must_use]
    pub const fn strategy_type(&self) -> StrategyType {
        self.strategy_type
    }

    /// Legs in generation order.
    #[must_use]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Number of legs.
    #[must_use]
    pub fn leg_count(&self) -> usize {
        self.legs.len()
    }

    /// Net premium: positive is a debit, negative a credit.
    #[must_use]
    pub const fn cost(&self) -> Decimal {
        self.cost
    }

    /// Whether opening the strategy collects premium.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        self.cost < Decimal::ZERO
    }

    /// Underlying shared by every leg.
    #[must_use]
    pub fn underlying(&self) -> &str {
        self.legs[0].contract().underlying()
    }

    /// Expiration shared by every leg.
    #[must_use]
    pub fn expiration(&self) -> NaiveDate {
        self.legs[0].contract().expiration()
    }

    /// The same strategy with every leg flipped.
    #[must_use]
    pub fn inverted(&self) -> Self {
        Self {
            strategy_type: self.strategy_type.inverse(),
            legs: self.legs.iter().map(Leg::inverted).collect(),
            cost: -self.cost,
        }
    }

    /// Operations that would open this strategy at reference prices.
    ///
    /// This is the shape handed to the position store once a strategy is
    /// chosen.
    #[must_use]
    pub fn to_operations(&self) -> Vec<Operation> {
        self.legs
            .iter()
            .map(|leg| {
                let side = if leg.signed_quantity() > 0 {
                    OperationSide::Buy
                } else {
                    OperationSide::Sell
                };
                Operation::from_parts(
                    leg.contract().symbol(),
                    side,
                    leg.signed_quantity().unsigned_abs(),
                    leg.contract().reference_price(),
                )
            })
            .collect()
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.strategy_type)?;
        for (i, leg) in self.legs.iter().enumerate() {
            let sep = if i == 0 { " " } else { " / " };
            write!(
                f,
                "{sep}{:+} {}{}",
                leg.signed_quantity(),
                leg.contract().kind().code(),
                leg.contract().strike()
            )?;
        }
        Ok(())
    }
}
