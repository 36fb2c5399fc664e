//! Mark-to-market P&L and net composition of an open position.

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use serde::Serialize;

use crate::options::Operation;

/// Current P&L of a set of operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentPnl {
    /// Sum over all operations.
    pub total: Decimal,
    /// P&L of each operation, in input order.
    pub per_operation: Vec<Decimal>,
}

/// Net quantity held in one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionComposition {
    /// Contract symbol.
    pub symbol: String,
    /// Buys minus sells. Zero when the position is flat.
    pub net_quantity: i64,
}

/// `Σ q_i × (current_i − entry_i)`.
///
/// A symbol missing from `current_prices` is valued at its entry price, so it
/// contributes zero.
#[must_use]
pub fn current_pnl(
    operations: &[Operation],
    current_prices: &HashMap<String, Decimal>,
) -> CurrentPnl {
    let per_operation: Vec<Decimal> = operations
        .iter()
        .map(|op| {
            let current = current_prices
                .get(op.symbol())
                .copied()
                .unwrap_or_else(|| op.price());
            Decimal::from(op.signed_quantity()) * (current - op.price())
        })
        .collect();

    CurrentPnl {
        total: per_operation.iter().copied().sum(),
        per_operation,
    }
}

/// Net quantity per symbol, ordered by symbol.
#[must_use]
pub fn position_composition(operations: &[Operation]) -> Vec<PositionComposition> {
    let mut net: BTreeMap<&str, i64> = BTreeMap::new();
    for op in operations {
        *net.entry(op.symbol()).or_insert(0) += op.signed_quantity();
    }

    net.into_iter()
        .map(|(symbol, net_quantity)| PositionComposition {
            symbol: symbol.to_string(),
            net_quantity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OperationSide;
    use rust_decimal_macros::dec;

    fn ops() -> Vec<Operation> {
        vec![
            Operation::new("A", OperationSide::Buy, 10, dec!(100)).unwrap(),
            Operation::new("B", OperationSide::Sell, 10, dec!(50)).unwrap(),
        ]
    }

    #[test]
    fn test_current_pnl_worked_example() {
        let prices = HashMap::from([("A".to_string(), dec!(120)), ("B".to_string(), dec!(40))]);
        let pnl = current_pnl(&ops(), &prices);
        assert_eq!(pnl.total, dec!(300));
        assert_eq!(pnl.per_operation, vec![dec!(200), dec!(100)]);
    }

    #[test]
    fn test_missing_price_falls_back_to_entry() {
        let prices = HashMap::from([("A".to_string(), dec!(120))]);
        let pnl = current_pnl(&ops(), &prices);
        assert_eq!(pnl.total, dec!(200));
        assert_eq!(pnl.per_operation[1], Decimal::ZERO);
    }

    #[test]
    fn test_no_operations() {
        let pnl = current_pnl(&[], &HashMap::new());
        assert_eq!(pnl.total, Decimal::ZERO);
        assert!(pnl.per_operation.is_empty());
    }

    #[test]
    fn test_composition_nets_by_symbol() {
        let operations = vec![
            Operation::new("Z", OperationSide::Buy, 3, dec!(1)).unwrap(),
            Operation::new("A", OperationSide::Buy, 2, dec!(1)).unwrap(),
            Operation::new("Z", OperationSide::Sell, 1, dec!(1)).unwrap(),
            Operation::new("A", OperationSide::Sell, 2, dec!(1)).unwrap(),
        ];
        let composition = position_composition(&operations);
        assert_eq!(
            composition,
            vec![
                PositionComposition { symbol: "A".into(), net_quantity: 0 },
                PositionComposition { symbol: "Z".into(), net_quantity: 2 },
            ]
        );
    }
}
