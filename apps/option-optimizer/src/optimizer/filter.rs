//! Chain filter: reduce an option chain to the strikes worth combining.
//!
//! Anchors are the strike nearest spot (ATM) and the strike nearest each
//! finite range boundary. Anchors are always kept. Each side of spot
//! (below: `strike < spot`, above: `strike ≥ spot`) is then topped up to
//! `max_strikes_per_side` with the strikes closest to any anchor price.

use std::collections::BTreeSet;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use super::ranges::TargetRange;
use crate::error::OptimizerError;
use crate::options::Contract;
use crate::pricing::decimal_to_f64;

/// Ordered set of selected strikes, annotated with its anchors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelevantStrikes {
    atm: Decimal,
    boundary_anchors: BTreeSet<Decimal>,
    strikes: BTreeSet<Decimal>,
}

impl RelevantStrikes {
    /// Strike nearest spot.
    #[must_use]
    pub const fn atm(&self) -> Decimal {
        self.atm
    }

    /// Strikes nearest each finite range boundary.
    #[must_use]
    pub const fn boundary_anchors(&self) -> &BTreeSet<Decimal> {
        &self.boundary_anchors
    }

    /// All selected strikes, ascending.
    #[must_use]
    pub const fn strikes(&self) -> &BTreeSet<Decimal> {
        &self.strikes
    }

    /// Whether `strike` was selected.
    #[must_use]
    pub fn contains(&self, strike: Decimal) -> bool {
        self.strikes.contains(&strike)
    }

    /// Number of selected strikes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.strikes.len()
    }

    /// Never true for a set built by [`select_relevant_strikes`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }

    /// Nearest selected strike strictly below `strike`.
    #[must_use]
    pub fn below(&self, strike: Decimal) -> Option<Decimal> {
        self.strikes.range(..strike).next_back().copied()
    }

    /// Nearest selected strike strictly above `strike`.
    #[must_use]
    pub fn above(&self, strike: Decimal) -> Option<Decimal> {
        self.strikes
            .range(strike..)
            .find(|&&s| s > strike)
            .copied()
    }

    /// Lowest and highest selected strike.
    #[must_use]
    pub fn extremes(&self) -> Option<(Decimal, Decimal)> {
        Some((*self.strikes.first()?, *self.strikes.last()?))
    }
}

/// Select the strikes candidates are built from.
///
/// # Errors
///
/// Returns `InvalidInput` if `chain` is empty, `spot` is not positive and
/// finite, or `max_strikes_per_side < 1`.
pub fn select_relevant_strikes(
    chain: &[Contract],
    spot: f64,
    target_ranges: &[TargetRange],
    max_strikes_per_side: usize,
) -> Result<RelevantStrikes, OptimizerError> {
    if chain.is_empty() {
        return Err(OptimizerError::invalid_input("option chain is empty"));
    }
    if !spot.is_finite() || spot <= 0.0 {
        return Err(OptimizerError::invalid_input(format!(
            "spot must be positive and finite, got {spot}"
        )));
    }
    if max_strikes_per_side < 1 {
        return Err(OptimizerError::invalid_input(
            "max_strikes_per_side must be at least 1",
        ));
    }

    let available: Vec<(Decimal, f64)> = chain
        .iter()
        .map(Contract::strike)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(|k| (k, decimal_to_f64(k)))
        .collect();

    let boundary_prices: Vec<f64> = target_ranges
        .iter()
        .flat_map(|r| r.finite_bounds())
        .collect();

    let Some(atm) = nearest_strike(&available, spot) else {
        return Err(OptimizerError::invalid_input("option chain has no strikes"));
    };
    let boundary_anchors: BTreeSet<Decimal> = boundary_prices
        .iter()
        .filter_map(|&b| nearest_strike(&available, b))
        .collect();

    let mut anchor_prices = Vec::with_capacity(boundary_prices.len() + 1);
    anchor_prices.push(spot);
    anchor_prices.extend(boundary_prices);

    let is_anchor = |k: Decimal| k == atm || boundary_anchors.contains(&k);

    let mut strikes = BTreeSet::new();
    let (below, above): (Vec<_>, Vec<_>) = available.iter().partition(|(_, k)| *k < spot);

    for side in [below, above] {
        let mut selected = 0usize;
        let mut rest = Vec::new();
        for &(k, kf) in side {
            if is_anchor(k) {
                strikes.insert(k);
                selected += 1;
            } else {
                rest.push((distance_to_anchors(kf, &anchor_prices), k));
            }
        }
        // Closest first, ties to the lower strike
        rest.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        let free = max_strikes_per_side.saturating_sub(selected);
        strikes.extend(rest.into_iter().take(free).map(|(_, k)| k));
    }

    Ok(RelevantStrikes {
        atm,
        boundary_anchors,
        strikes,
    })
}

/// Contracts whose strike was selected, in chain order.
#[must_use]
pub fn filter_chain(chain: &[Contract], relevant: &RelevantStrikes) -> Vec<Arc<Contract>> {
    chain
        .iter()
        .filter(|c| relevant.contains(c.strike()))
        .cloned()
        .map(Arc::new)
        .collect()
}

/// Drop contracts whose known volume is below `min_liquidity`.
///
/// Contracts without volume data are kept.
#[must_use]
pub fn filter_liquidity(chain: &[Contract], min_liquidity: Option<u64>) -> Vec<Contract> {
    match min_liquidity {
        Some(min) => chain
            .iter()
            .filter(|c| c.volume().is_none_or(|v| v >= min))
            .cloned()
            .collect(),
        None => chain.to_vec(),
    }
}

/// Strike nearest `price`; ties go to the lower strike. `available` is ascending.
fn nearest_strike(available: &[(Decimal, f64)], price: f64) -> Option<Decimal> {
    let mut best: Option<(f64, Decimal)> = None;
    for &(k, kf) in available {
        let d = (kf - price).abs();
        match best {
            Some((bd, _)) if d >= bd => {}
            _ => best = Some((d, k)),
        }
    }
    best.map(|(_, k)| k)
}

fn distance_to_anchors(strike: f64, anchors: &[f64]) -> f64 {
    anchors
        .iter()
        .map(|a| (strike - a).abs())
        .fold(f64::INFINITY, f64::min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::OptionKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn chain(strikes: &[i64]) -> Vec<Contract> {
        let expiry = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
        strikes
            .iter()
            .flat_map(|&k| {
                [OptionKind::Call, OptionKind::Put].map(|kind| {
                    Contract::new(
                        format!("{}{k}", kind.code()),
                        "IDX",
                        kind,
                        Decimal::from(k),
                        expiry,
                        dec!(10),
                    )
                    .unwrap()
                })
            })
            .collect()
    }

    #[test]
    fn test_boundary_anchor_and_atm_included() {
        let chain = chain(&[8000, 8200, 8400]);
        let ranges = [TargetRange::at_least(8211.0).unwrap()];
        let relevant = select_relevant_strikes(&chain, 8050.0, &ranges, 1).unwrap();

        assert_eq!(relevant.atm(), dec!(8000));
        assert!(relevant.contains(dec!(8200)));
        assert!(relevant.contains(dec!(8000)));
        assert!(relevant.boundary_anchors().contains(&dec!(8200)));
        assert!(!relevant.contains(dec!(8400)));
    }

    #[test]
    fn test_atm_tie_goes_to_lower_strike() {
        let chain = chain(&[90, 110]);
        let ranges = [TargetRange::at_least(200.0).unwrap()];
        let relevant = select_relevant_strikes(&chain, 100.0, &ranges, 6).unwrap();
        assert_eq!(relevant.atm(), dec!(90));
    }

    #[test]
    fn test_cap_per_side() {
        let chain = chain(&[80, 85, 90, 95, 100, 105, 110, 115, 120]);
        let ranges = [TargetRange::between(98.0, 102.0).unwrap()];
        let relevant = select_relevant_strikes(&chain, 100.0, &ranges, 2).unwrap();

        // 100 anchors spot and both bounds; 95 and 90 fill below, 105 fills above
        let strikes: Vec<Decimal> = relevant.strikes().iter().copied().collect();
        assert_eq!(strikes, vec![dec!(90), dec!(95), dec!(100), dec!(105)]);
    }

    #[test]
    fn test_anchors_kept_beyond_cap() {
        let chain = chain(&[50, 100, 150]);
        let ranges = [
            TargetRange::below(55.0).unwrap(),
            TargetRange::at_least(145.0).unwrap(),
        ];
        let relevant = select_relevant_strikes(&chain, 100.0, &ranges, 1).unwrap();
        // Above spot holds ATM 100 and boundary anchor 150 despite the cap of 1
        assert_eq!(relevant.len(), 3);
    }

    #[test]
    fn test_unbounded_range_contributes_no_anchor() {
        let chain = chain(&[90, 100, 110]);
        let ranges = [TargetRange::new(None, None).unwrap()];
        let relevant = select_relevant_strikes(&chain, 100.0, &ranges, 6).unwrap();
        assert!(relevant.boundary_anchors().is_empty());
        assert_eq!(relevant.len(), 3);
    }

    #[test]
    fn test_invalid_inputs() {
        let ranges = [TargetRange::at_least(1.0).unwrap()];
        assert!(select_relevant_strikes(&[], 100.0, &ranges, 6).is_err());
        assert!(select_relevant_strikes(&chain(&[100]), 0.0, &ranges, 6).is_err());
        assert!(select_relevant_strikes(&chain(&[100]), f64::NAN, &ranges, 6).is_err());
        assert!(select_relevant_strikes(&chain(&[100]), 100.0, &ranges, 0).is_err());
    }

    #[test]
    fn test_neighbours() {
        let chain = chain(&[90, 100, 110]);
        let ranges = [TargetRange::at_least(1.0).unwrap()];
        let relevant = select_relevant_strikes(&chain, 100.0, &ranges, 6).unwrap();
        assert_eq!(relevant.below(dec!(100)), Some(dec!(90)));
        assert_eq!(relevant.above(dec!(100)), Some(dec!(110)));
        assert_eq!(relevant.above(dec!(110)), None);
        assert_eq!(relevant.extremes(), Some((dec!(90), dec!(110))));
    }

    #[test]
    fn test_filter_chain_and_liquidity() {
        let mut contracts = chain(&[90, 100]);
        contracts[0] = contracts[0].clone().with_volume(5);
        contracts[1] = contracts[1].clone().with_volume(500);

        let liquid = filter_liquidity(&contracts, Some(100));
        assert_eq!(liquid.len(), 3);
        assert!(liquid.iter().all(|c| c.volume().is_none_or(|v| v >= 100)));
        assert_eq!(filter_liquidity(&contracts, None).len(), 4);

        let ranges = [TargetRange::at_least(1.0).unwrap()];
        let relevant = select_relevant_strikes(&contracts, 100.0, &ranges, 1).unwrap();
        let filtered = filter_chain(&contracts, &relevant);
        assert!(filtered.iter().all(|c| relevant.contains(c.strike())));
    }
}
