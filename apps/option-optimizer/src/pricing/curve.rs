//! Expiration P&L curves and the summary figures read off them.

use rust_decimal::Decimal;
use serde::Serialize;

use super::mesh::EvaluationMesh;
use super::payoff::{PayoffLeg, decimal_to_f64, pnl_at_finish};
use crate::error::OptimizerError;

/// A sampled expiration P&L curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PnlCurve {
    /// Underlying prices at expiration.
    pub prices: Vec<f64>,
    /// P&L at each price.
    pub pnl: Vec<f64>,
}

impl PnlCurve {
    /// Evaluate `legs` on `mesh`.
    #[must_use]
    pub fn on_mesh<L: PayoffLeg>(legs: &[L], mesh: &EvaluationMesh) -> Self {
        let prices = mesh.prices().to_vec();
        let pnl = pnl_at_finish(legs, &prices);
        Self { prices, pnl }
    }

    /// Curve centred on the average strike of `legs`.
    ///
    /// Used when the underlying price is not known.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for bad `range_pct`/`steps`.
    pub fn centered_on_strikes<L: PayoffLeg>(
        legs: &[L],
        range_pct: f64,
        steps: usize,
    ) -> Result<Self, OptimizerError> {
        let Some(center) = average_strike(legs) else {
            return Ok(Self::default());
        };
        pnl_curve_at_finish(legs, center, range_pct, steps)
    }

    /// True when no point was sampled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Largest sampled P&L.
    #[must_use]
    pub fn max_profit(&self) -> Option<f64> {
        max_of(&self.pnl)
    }

    /// Smallest sampled P&L.
    #[must_use]
    pub fn max_loss(&self) -> Option<f64> {
        min_of(&self.pnl)
    }

    /// Prices where the curve crosses zero.
    #[must_use]
    pub fn breakevens(&self) -> Vec<f64> {
        find_breakevens(&self.prices, &self.pnl)
    }
}

/// Expiration P&L of `legs` on `linspace(center·(1−range_pct), center·(1+range_pct), steps)`.
///
/// An empty leg list yields an empty curve.
///
/// # Errors
///
/// Returns `InvalidInput` if the mesh parameters are invalid.
pub fn pnl_curve_at_finish<L: PayoffLeg>(
    legs: &[L],
    center: f64,
    range_pct: f64,
    steps: usize,
) -> Result<PnlCurve, OptimizerError> {
    if legs.is_empty() {
        return Ok(PnlCurve::default());
    }
    let mesh = EvaluationMesh::around(center, range_pct, steps)?;
    Ok(PnlCurve::on_mesh(legs, &mesh))
}

fn average_strike<L: PayoffLeg>(legs: &[L]) -> Option<f64> {
    if legs.is_empty() {
        return None;
    }
    let sum: Decimal = legs.iter().map(PayoffLeg::strike).sum();
    Some(decimal_to_f64(sum) / legs.len() as f64)
}

/// Zero crossings of `pnl` sampled at `prices`.
///
/// A sign change between two neighbours adds the linearly interpolated
/// price. A run of exact zeros counts once, at its middle, and only when the
/// P&L on either side of the run has opposite signs; a curve that merely
/// touches or rests on zero has no breakeven there. Output is ascending.
#[must_use]
pub fn find_breakevens(prices: &[f64], pnl: &[f64]) -> Vec<f64> {
    let n = prices.len().min(pnl.len());
    let mut out = Vec::new();

    let mut i = 0;
    while i < n {
        if pnl[i] == 0.0 {
            let start = i;
            while i < n && pnl[i] == 0.0 {
                i += 1;
            }
            let before = start.checked_sub(1).map(|k| pnl[k]);
            let after = (i < n).then(|| pnl[i]);
            if let (Some(a), Some(b)) = (before, after) {
                if (a < 0.0) != (b < 0.0) {
                    out.push((prices[start] + prices[i - 1]) / 2.0);
                }
            }
            continue;
        }
        if i + 1 < n {
            let (a, b) = (pnl[i], pnl[i + 1]);
            if b != 0.0 && (a < 0.0) != (b < 0.0) {
                let t = a / (a - b);
                out.push(prices[i] + t * (prices[i + 1] - prices[i]));
            }
        }
        i += 1;
    }

    out
}

pub(crate) fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

pub(crate) fn min_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Operation, OperationLeg, OperationSide, OptionKind};
    use rust_decimal_macros::dec;

    fn put_leg(side: OperationSide, qty: u64, price: Decimal, strike: Decimal) -> OperationLeg {
        OperationLeg::new(
            Operation::new(format!("P{strike}"), side, qty, price).unwrap(),
            OptionKind::Put,
            strike,
        )
    }

    #[test]
    fn test_empty_legs_give_empty_curve() {
        let legs: Vec<OperationLeg> = Vec::new();
        let curve = pnl_curve_at_finish(&legs, 100.0, 0.2, 100).unwrap();
        assert!(curve.is_empty());
        assert!(curve.pnl.is_empty());
        assert_eq!(curve.max_profit(), None);
        assert!(PnlCurve::centered_on_strikes(&legs, 0.2, 100).unwrap().is_empty());
    }

    #[test]
    fn test_curve_length_and_bounds() {
        let legs = vec![put_leg(OperationSide::Buy, 1, dec!(2), dec!(100))];
        let curve = pnl_curve_at_finish(&legs, 100.0, 0.2, 41).unwrap();
        assert_eq!(curve.prices.len(), 41);
        assert_eq!(curve.pnl.len(), 41);
        assert!((curve.max_profit().unwrap() - 18.0).abs() < 1e-9);
        assert!((curve.max_loss().unwrap() + 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_centered_on_average_strike() {
        let legs = vec![
            put_leg(OperationSide::Buy, 1, dec!(5), dec!(90)),
            put_leg(OperationSide::Sell, 1, dec!(1), dec!(110)),
        ];
        let curve = PnlCurve::centered_on_strikes(&legs, 0.1, 3).unwrap();
        assert!((curve.prices[1] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_mesh_is_rejected() {
        let legs = vec![put_leg(OperationSide::Buy, 1, dec!(2), dec!(100))];
        assert!(pnl_curve_at_finish(&legs, 100.0, 0.2, 1).is_err());
    }

    #[test]
    fn test_breakeven_interpolated() {
        let b = find_breakevens(&[90.0, 100.0, 110.0], &[-5.0, -5.0, 5.0]);
        assert_eq!(b, vec![105.0]);
    }

    #[test]
    fn test_breakeven_on_mesh_point() {
        let b = find_breakevens(&[90.0, 100.0, 110.0], &[-5.0, 0.0, 5.0]);
        assert_eq!(b, vec![100.0]);
    }

    #[test]
    fn test_two_breakevens() {
        let b = find_breakevens(&[80.0, 100.0, 120.0], &[10.0, -10.0, 10.0]);
        assert_eq!(b, vec![90.0, 110.0]);
    }

    #[test]
    fn test_flat_zero_run_between_signs_counts_once() {
        let b = find_breakevens(
            &[90.0, 95.0, 100.0, 105.0, 110.0],
            &[-5.0, 0.0, 0.0, 0.0, 5.0],
        );
        assert_eq!(b, vec![100.0]);
    }

    #[test]
    fn test_flat_zero_at_edge_is_not_a_breakeven() {
        // Zero-premium long call: flat at zero below the strike
        let b = find_breakevens(&[80.0, 90.0, 100.0, 110.0], &[0.0, 0.0, 0.0, 10.0]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_tangent_touch_is_not_a_breakeven() {
        let b = find_breakevens(&[90.0, 100.0, 110.0], &[5.0, 0.0, 5.0]);
        assert!(b.is_empty());
        let b = find_breakevens(&[90.0, 100.0, 105.0, 110.0], &[-5.0, 0.0, 0.0, -5.0]);
        assert!(b.is_empty());
    }

    #[test]
    fn test_zero_premium_long_call_curve_has_no_breakeven() {
        let legs = vec![OperationLeg::new(
            Operation::new("C100", OperationSide::Buy, 1, Decimal::ZERO).unwrap(),
            OptionKind::Call,
            dec!(100),
        )];
        let curve = pnl_curve_at_finish(&legs, 100.0, 0.2, 41).unwrap();
        assert!(curve.breakevens().is_empty());
    }

    #[test]
    fn test_no_breakeven() {
        assert!(find_breakevens(&[1.0, 2.0], &[1.0, 2.0]).is_empty());
        assert!(find_breakevens(&[], &[]).is_empty());
    }
}
