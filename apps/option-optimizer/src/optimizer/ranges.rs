//! Target price ranges at expiration.
//!
//! A range is half-open, `lower ≤ p < upper`, and either bound may be
//! missing to mean unbounded. On the wire a range is either an object
//! (`{"lower": 8211, "upper": null}`) or a pair (`[8211, null]`).

use serde::{Deserialize, Serialize};

use crate::error::OptimizerError;

/// A price band the strategy should profit in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RangeRecord")]
pub struct TargetRange {
    lower: Option<f64>,
    upper: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RangeRecord {
    Pair(Option<f64>, Option<f64>),
    Bounds {
        #[serde(default)]
        lower: Option<f64>,
        #[serde(default)]
        upper: Option<f64>,
    },
}

impl TryFrom<RangeRecord> for TargetRange {
    type Error = OptimizerError;

    fn try_from(record: RangeRecord) -> Result<Self, Self::Error> {
        match record {
            RangeRecord::Pair(lower, upper) | RangeRecord::Bounds { lower, upper } => {
                Self::new(lower, upper)
            }
        }
    }
}

impl TargetRange {
    /// Create a range. `None` means unbounded on that side.
    ///
    /// An infinite bound on its own side (`lower = −∞`, `upper = +∞`) is the
    /// same as `None`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a bound is NaN, if `lower = +∞` or
    /// `upper = −∞`, or if `lower ≥ upper` when both are given.
    pub fn new(lower: Option<f64>, upper: Option<f64>) -> Result<Self, OptimizerError> {
        let lower = lower.filter(|lo| *lo != f64::NEG_INFINITY);
        let upper = upper.filter(|hi| *hi != f64::INFINITY);
        for bound in [lower, upper].into_iter().flatten() {
            if !bound.is_finite() {
                return Err(OptimizerError::invalid_input(format!(
                    "range bound {bound} is not allowed on that side"
                )));
            }
        }
        if let (Some(lo), Some(hi)) = (lower, upper) {
            if lo >= hi {
                return Err(OptimizerError::invalid_input(format!(
                    "range lower bound {lo} must be below upper bound {hi}"
                )));
            }
        }
        Ok(Self { lower, upper })
    }

    /// `[lower, +∞)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `lower` is NaN or +∞.
    pub fn at_least(lower: f64) -> Result<Self, OptimizerError> {
        Self::new(Some(lower), None)
    }

    /// `(−∞, upper)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `upper` is NaN or −∞.
    pub fn below(upper: f64) -> Result<Self, OptimizerError> {
        Self::new(None, Some(upper))
    }

    /// `[lower, upper)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a bound is NaN or the bounds are out of order.
    pub fn between(lower: f64, upper: f64) -> Result<Self, OptimizerError> {
        Self::new(Some(lower), Some(upper))
    }

    /// Lower bound, `None` = −∞.
    #[must_use]
    pub const fn lower(&self) -> Option<f64> {
        self.lower
    }

    /// Upper bound, `None` = +∞.
    #[must_use]
    pub const fn upper(&self) -> Option<f64> {
        self.upper
    }

    /// Whether `price` lies in `[lower, upper)`.
    #[must_use]
    pub fn contains(&self, price: f64) -> bool {
        self.lower.is_none_or(|lo| price >= lo) && self.upper.is_none_or(|hi| price < hi)
    }

    /// The finite bounds of this range.
    pub fn finite_bounds(self) -> impl Iterator<Item = f64> {
        [self.lower, self.upper].into_iter().flatten()
    }

    /// Whether the two ranges share at least one price.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        let starts_before_other_ends = match (self.lower, other.upper) {
            (Some(lo), Some(hi)) => lo < hi,
            _ => true,
        };
        let other_starts_before_end = match (other.lower, self.upper) {
            (Some(lo), Some(hi)) => lo < hi,
            _ => true,
        };
        starts_before_other_ends && other_starts_before_end
    }
}

impl std::fmt::Display for TargetRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.lower {
            Some(lo) => write!(f, "[{lo}, ")?,
            None => write!(f, "(-inf, ")?,
        }
        match self.upper {
            Some(hi) => write!(f, "{hi})"),
            None => write!(f, "+inf)"),
        }
    }
}

/// Check a set of ranges supplied together.
///
/// # Errors
///
/// Returns `InvalidInput` if the set is empty or two ranges overlap.
pub fn validate_ranges(ranges: &[TargetRange]) -> Result<(), OptimizerError> {
    if ranges.is_empty() {
        return Err(OptimizerError::invalid_input("at least one target range is required"));
    }
    for (i, a) in ranges.iter().enumerate() {
        for b in &ranges[i + 1..] {
            if a.overlaps(b) {
                return Err(OptimizerError::invalid_input("target ranges must not overlap")
                    .with_context("first", a.to_string())
                    .with_context("second", b.to_string()));
            }
        }
    }
    Ok(())
}

/// Whether `price` is inside any of `ranges`.
#[must_use]
pub fn in_any(ranges: &[TargetRange], price: f64) -> bool {
    ranges.iter().any(|r| r.contains(price))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_half_open_membership() {
        let range = TargetRange::between(100.0, 110.0).unwrap();
        assert!(range.contains(100.0));
        assert!(range.contains(109.99));
        assert!(!range.contains(110.0));
        assert!(!range.contains(99.99));
    }

    #[test]
    fn test_unbounded_sides() {
        let up = TargetRange::at_least(8211.0).unwrap();
        assert!(up.contains(8211.0));
        assert!(up.contains(1e12));
        assert!(!up.contains(8210.0));

        let down = TargetRange::below(50.0).unwrap();
        assert!(down.contains(-1e12));
        assert!(!down.contains(50.0));

        let all = TargetRange::new(None, None).unwrap();
        assert!(all.contains(0.0));
        assert_eq!(all.finite_bounds().count(), 0);
    }

    #[test_case(Some(10.0), Some(10.0) ; "equal bounds")]
    #[test_case(Some(11.0), Some(10.0) ; "inverted bounds")]
    #[test_case(Some(f64::NAN), None ; "nan lower")]
    #[test_case(Some(f64::INFINITY), None ; "lower at plus infinity")]
    #[test_case(None, Some(f64::NEG_INFINITY) ; "upper at minus infinity")]
    #[test_case(None, Some(f64::NAN) ; "nan upper")]
    fn test_invalid_range(lower: Option<f64>, upper: Option<f64>) {
        assert!(TargetRange::new(lower, upper).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_infinite_bounds_mean_unbounded() {
        assert_eq!(
            TargetRange::new(Some(8211.0), Some(f64::INFINITY)).unwrap(),
            TargetRange::at_least(8211.0).unwrap()
        );
        assert_eq!(
            TargetRange::new(Some(f64::NEG_INFINITY), Some(7900.0)).unwrap(),
            TargetRange::below(7900.0).unwrap()
        );
        let all = TargetRange::new(Some(f64::NEG_INFINITY), Some(f64::INFINITY)).unwrap();
        assert_eq!(all, TargetRange::new(None, None).unwrap());
    }

    #[test]
    fn test_adjacent_ranges_do_not_overlap() {
        let ranges = [
            TargetRange::between(1.0, 2.0).unwrap(),
            TargetRange::between(2.0, 3.0).unwrap(),
        ];
        assert!(validate_ranges(&ranges).is_ok());
    }

    #[test]
    fn test_overlapping_ranges_rejected() {
        let ranges = [
            TargetRange::between(1.0, 5.0).unwrap(),
            TargetRange::at_least(4.0).unwrap(),
        ];
        let err = validate_ranges(&ranges).unwrap_err();
        assert!(err.is_invalid_input());
        assert_eq!(err.context().len(), 2);
    }

    #[test]
    fn test_two_unbounded_below_overlap() {
        let a = TargetRange::below(5.0).unwrap();
        let b = TargetRange::below(1.0).unwrap();
        assert!(a.overlaps(&b));
    }

    #[test]
    fn test_empty_range_set_rejected() {
        assert!(validate_ranges(&[]).is_err());
    }

    #[test]
    fn test_deserialize_pair_and_object() {
        let pair: TargetRange = serde_json::from_str("[8211, null]").unwrap();
        assert_eq!(pair, TargetRange::at_least(8211.0).unwrap());

        let object: TargetRange = serde_json::from_str(r#"{"upper": 7500}"#).unwrap();
        assert_eq!(object, TargetRange::below(7500.0).unwrap());

        assert!(serde_json::from_str::<TargetRange>("[10, 5]").is_err());
    }

    #[test]
    fn test_in_any() {
        let ranges = [
            TargetRange::below(90.0).unwrap(),
            TargetRange::at_least(110.0).unwrap(),
        ];
        assert!(in_any(&ranges, 80.0));
        assert!(!in_any(&ranges, 100.0));
        assert!(in_any(&ranges, 110.0));
    }
}
