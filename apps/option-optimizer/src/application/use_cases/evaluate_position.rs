//! Evaluate Position Use Case

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::application::ports::{PriceLookupError, PriceLookupPort};
use crate::error::OptimizerError;
use crate::options::{Operation, OperationLeg};
use crate::pricing::{
    CurrentPnl, DEFAULT_MESH_STEPS, DEFAULT_RANGE_PCT, PnlCurve, PositionComposition, current_pnl,
    pnl_curve_at_finish, position_composition,
};

/// Snapshot of an open position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionEvaluation {
    /// Net quantity per contract.
    pub composition: Vec<PositionComposition>,
    /// Mark-to-market P&L.
    pub current_pnl: CurrentPnl,
    /// P&L at expiration.
    pub expiration_curve: PnlCurve,
}

/// Errors from [`EvaluatePositionUseCase`].
#[derive(Debug, thiserror::Error)]
pub enum EvaluatePositionError {
    /// Price lookup failure, unchanged.
    #[error(transparent)]
    PriceLookup(#[from] PriceLookupError),

    /// Curve parameters rejected.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}

/// Use case for valuing a recorded position.
pub struct EvaluatePositionUseCase<P>
where
    P: PriceLookupPort,
{
    price_lookup: Arc<P>,
    range_pct: f64,
    steps: usize,
}

impl<P> EvaluatePositionUseCase<P>
where
    P: PriceLookupPort,
{
    /// Create a new EvaluatePositionUseCase with the default curve mesh.
    pub const fn new(price_lookup: Arc<P>) -> Self {
        Self {
            price_lookup,
            range_pct: DEFAULT_RANGE_PCT,
            steps: DEFAULT_MESH_STEPS,
        }
    }

    /// Use a different curve mesh.
    #[must_use]
    pub const fn with_mesh(mut self, range_pct: f64, steps: usize) -> Self {
        self.range_pct = range_pct;
        self.steps = steps;
        self
    }

    /// Execute the use case.
    ///
    /// The expiration curve is centred on `spot` when given, otherwise on the
    /// average strike of the legs.
    pub async fn execute(
        &self,
        legs: &[OperationLeg],
        spot: Option<f64>,
    ) -> Result<PositionEvaluation, EvaluatePositionError> {
        let operations: Vec<Operation> = legs.iter().map(|l| l.operation.clone()).collect();

        // 1. Live prices for the distinct symbols
        let symbols: Vec<String> = operations
            .iter()
            .map(|op| op.symbol().to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let prices = if symbols.is_empty() {
            Default::default()
        } else {
            self.price_lookup.latest_prices(&symbols).await?
        };
        debug!(
            symbols = symbols.len(),
            priced = prices.len(),
            "Fetched live prices"
        );

        // 2. Mark to market
        let current_pnl = current_pnl(&operations, &prices);

        // 3. Expiration curve
        let expiration_curve = match spot {
            Some(center) => pnl_curve_at_finish(legs, center, self.range_pct, self.steps)?,
            None => PnlCurve::centered_on_strikes(legs, self.range_pct, self.steps)?,
        };

        Ok(PositionEvaluation {
            composition: position_composition(&operations),
            current_pnl,
            expiration_curve,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockPriceLookupPort;
    use crate::options::{OperationSide, OptionKind};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn legs() -> Vec<OperationLeg> {
        vec![
            OperationLeg::new(
                Operation::new("A", OperationSide::Buy, 10, dec!(100)).unwrap(),
                OptionKind::Call,
                dec!(1000),
            ),
            OperationLeg::new(
                Operation::new("B", OperationSide::Sell, 10, dec!(50)).unwrap(),
                OptionKind::Call,
                dec!(1100),
            ),
        ]
    }

    #[tokio::test]
    async fn test_current_pnl_from_live_prices() {
        let mut lookup = MockPriceLookupPort::new();
        lookup
            .expect_latest_prices()
            .withf(|symbols| symbols == ["A".to_string(), "B".to_string()])
            .times(1)
            .returning(|_| {
                Ok(HashMap::from([
                    ("A".to_string(), dec!(120)),
                    ("B".to_string(), dec!(40)),
                ]))
            });

        let use_case = EvaluatePositionUseCase::new(Arc::new(lookup));
        let evaluation = use_case.execute(&legs(), Some(1050.0)).await.unwrap();

        assert_eq!(evaluation.current_pnl.total, dec!(300));
        assert_eq!(evaluation.composition.len(), 2);
        assert_eq!(evaluation.expiration_curve.prices.len(), DEFAULT_MESH_STEPS);
    }

    #[tokio::test]
    async fn test_missing_prices_fall_back_to_entry() {
        let mut lookup = MockPriceLookupPort::new();
        lookup.expect_latest_prices().returning(|_| Ok(HashMap::new()));

        let use_case = EvaluatePositionUseCase::new(Arc::new(lookup)).with_mesh(0.1, 11);
        let evaluation = use_case.execute(&legs(), None).await.unwrap();

        assert_eq!(evaluation.current_pnl.total, Decimal::ZERO);
        // Centred on the average strike, 1050
        assert!((evaluation.expiration_curve.prices[5] - 1050.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_lookup_error_is_surfaced_unchanged() {
        let mut lookup = MockPriceLookupPort::new();
        lookup.expect_latest_prices().returning(|_| {
            Err(PriceLookupError::RateLimited {
                retry_after_secs: 30,
            })
        });

        let use_case = EvaluatePositionUseCase::new(Arc::new(lookup));
        let err = use_case.execute(&legs(), None).await.unwrap_err();
        assert!(matches!(
            err,
            EvaluatePositionError::PriceLookup(PriceLookupError::RateLimited {
                retry_after_secs: 30
            })
        ));
    }

    #[tokio::test]
    async fn test_empty_position_skips_lookup() {
        let mut lookup = MockPriceLookupPort::new();
        lookup.expect_latest_prices().times(0);

        let use_case = EvaluatePositionUseCase::new(Arc::new(lookup));
        let evaluation = use_case.execute(&[], None).await.unwrap();
        assert!(evaluation.composition.is_empty());
        assert!(evaluation.expiration_curve.is_empty());
        assert_eq!(evaluation.current_pnl.total, Decimal::ZERO);
    }
}
