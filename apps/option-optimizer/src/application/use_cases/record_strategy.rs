//! Record Strategy Use Case

use std::sync::Arc;

use tracing::info;

use crate::application::ports::{PositionStoreError, PositionStorePort};
use crate::error::OptimizerError;
use crate::options::{Operation, Strategy};

/// Errors from [`RecordStrategyUseCase`].
#[derive(Debug, thiserror::Error)]
pub enum RecordStrategyError {
    /// Position store failure, unchanged.
    #[error(transparent)]
    PositionStore(#[from] PositionStoreError),

    /// Request rejected before reaching the store.
    #[error(transparent)]
    Optimizer(#[from] OptimizerError),
}

/// Use case for handing a chosen strategy to the position store.
pub struct RecordStrategyUseCase<S>
where
    S: PositionStorePort,
{
    store: Arc<S>,
}

impl<S> RecordStrategyUseCase<S>
where
    S: PositionStorePort,
{
    /// Create a new RecordStrategyUseCase.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Record `strategy` under `position` at reference prices.
    ///
    /// Returns the operations that were stored.
    pub async fn execute(
        &self,
        position: &str,
        strategy: &Strategy,
    ) -> Result<Vec<Operation>, RecordStrategyError> {
        if position.trim().is_empty() {
            return Err(OptimizerError::invalid_input("position name must not be empty").into());
        }

        let operations = strategy.to_operations();
        self.store.record_operations(position, &operations).await?;

        info!(
            position,
            strategy = %strategy,
            operations = operations.len(),
            "Strategy recorded"
        );
        Ok(operations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockPositionStorePort;
    use crate::options::{Contract, Leg, OperationSide, StrategyType};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn spread() -> Strategy {
        let expiry = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
        let low = Arc::new(Contract::call("C100", "IDX", dec!(100), expiry, dec!(5)).unwrap());
        let high = Arc::new(Contract::call("C110", "IDX", dec!(110), expiry, dec!(2)).unwrap());
        Strategy::new(
            StrategyType::BullCallSpread,
            vec![Leg::long(low, 1).unwrap(), Leg::short(high, 1).unwrap()],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_records_buy_and_sell_operations() {
        let mut store = MockPositionStorePort::new();
        store
            .expect_record_operations()
            .withf(|position, ops| {
                position == "bull-1"
                    && ops.len() == 2
                    && ops[0].side() == OperationSide::Buy
                    && ops[1].side() == OperationSide::Sell
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = RecordStrategyUseCase::new(Arc::new(store));
        let operations = use_case.execute("bull-1", &spread()).await.unwrap();

        assert_eq!(operations[0].price(), dec!(5));
        assert_eq!(operations[1].quantity(), 1);
    }

    #[tokio::test]
    async fn test_store_error_is_surfaced_unchanged() {
        let mut store = MockPositionStorePort::new();
        store.expect_record_operations().returning(|_, _| {
            Err(PositionStoreError::StorageError {
                message: "disk full".to_string(),
            })
        });

        let use_case = RecordStrategyUseCase::new(Arc::new(store));
        let err = use_case.execute("bull-1", &spread()).await.unwrap_err();
        assert_eq!(err.to_string(), "Position store error: disk full");
    }

    #[tokio::test]
    async fn test_empty_position_name_rejected() {
        let mut store = MockPositionStorePort::new();
        store.expect_record_operations().times(0);

        let use_case = RecordStrategyUseCase::new(Arc::new(store));
        let err = use_case.execute("  ", &spread()).await.unwrap_err();
        assert!(matches!(err, RecordStrategyError::Optimizer(e) if e.is_invalid_input()));
    }
}
