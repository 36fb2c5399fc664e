//! Evaluation mesh: the underlying prices a payoff is sampled at.

use serde::Serialize;

use crate::error::OptimizerError;

/// Default half-width of the mesh as a fraction of spot.
pub const DEFAULT_RANGE_PCT: f64 = 0.2;

/// Default number of mesh points.
pub const DEFAULT_MESH_STEPS: usize = 100;

/// Strictly ascending sequence of at least two underlying prices.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMesh {
    prices: Vec<f64>,
}

impl EvaluationMesh {
    /// Evenly spaced prices from `center × (1 − range_pct)` to
    /// `center × (1 + range_pct)`, both ends included.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if `center` is not positive and finite,
    /// `range_pct` is outside `(0, 1]`, or `steps < 2`.
    pub fn around(center: f64, range_pct: f64, steps: usize) -> Result<Self, OptimizerError> {
        if !center.is_finite() || center <= 0.0 {
            return Err(OptimizerError::invalid_input(format!(
                "mesh center must be positive and finite, got {center}"
            )));
        }
        if !range_pct.is_finite() || range_pct <= 0.0 || range_pct > 1.0 {
            return Err(OptimizerError::invalid_input(format!(
                "range_pct must be in (0, 1], got {range_pct}"
            )));
        }
        if steps < 2 {
            return Err(OptimizerError::invalid_input(format!(
                "mesh needs at least 2 steps, got {steps}"
            )));
        }

        let min = center * (1.0 - range_pct);
        let max = center * (1.0 + range_pct);
        let step = (max - min) / (steps - 1) as f64;
        let mut prices: Vec<f64> = (0..steps).map(|i| min + step * i as f64).collect();
        // Pin the last point so float drift never moves the upper edge
        if let Some(last) = prices.last_mut() {
            *last = max;
        }

        Ok(Self { prices })
    }

    /// Use an explicit price grid.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if fewer than two prices are given, or they are
    /// not finite and strictly ascending.
    pub fn from_prices(prices: Vec<f64>) -> Result<Self, OptimizerError> {
        if prices.len() < 2 {
            return Err(OptimizerError::invalid_input(format!(
                "mesh needs at least 2 prices, got {}",
                prices.len()
            )));
        }
        if prices.iter().any(|p| !p.is_finite()) {
            return Err(OptimizerError::invalid_input("mesh prices must be finite"));
        }
        if prices.windows(2).any(|w| w[0] >= w[1]) {
            return Err(OptimizerError::invalid_input(
                "mesh prices must be strictly ascending",
            ));
        }
        Ok(Self { prices })
    }

    /// The sampled prices.
    #[must_use]
    pub fn prices(&self) -> &[f64] {
        &self.prices
    }

    /// Number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    /// Always false; a mesh has at least two points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Lowest price.
    #[must_use]
    pub fn lower(&self) -> f64 {
        self.prices[0]
    }

    /// Highest price.
    #[must_use]
    pub fn upper(&self) -> f64 {
        self.prices[self.prices.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_around_matches_linspace() {
        let mesh = EvaluationMesh::around(100.0, 0.1, 3).unwrap();
        assert_eq!(mesh.len(), 3);
        let prices = mesh.prices();
        assert!((prices[0] - 90.0).abs() < 1e-9);
        assert!((prices[1] - 100.0).abs() < 1e-9);
        assert!((prices[2] - 110.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_mesh_spans_twenty_percent() {
        let mesh = EvaluationMesh::around(8000.0, DEFAULT_RANGE_PCT, DEFAULT_MESH_STEPS).unwrap();
        assert_eq!(mesh.len(), 100);
        assert!((mesh.lower() - 6400.0).abs() < 1e-9);
        assert!((mesh.upper() - 9600.0).abs() < 1e-9);
        assert!(mesh.prices().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_invalid_mesh_parameters() {
        assert!(EvaluationMesh::around(100.0, 0.2, 1).unwrap_err().is_invalid_input());
        assert!(EvaluationMesh::around(0.0, 0.2, 10).is_err());
        assert!(EvaluationMesh::around(f64::NAN, 0.2, 10).is_err());
        assert!(EvaluationMesh::around(100.0, 0.0, 10).is_err());
        assert!(EvaluationMesh::around(100.0, 1.5, 10).is_err());
    }

    #[test]
    fn test_from_prices_validation() {
        assert!(EvaluationMesh::from_prices(vec![1.0]).is_err());
        assert!(EvaluationMesh::from_prices(vec![2.0, 1.0]).is_err());
        assert!(EvaluationMesh::from_prices(vec![1.0, 1.0]).is_err());
        assert!(EvaluationMesh::from_prices(vec![1.0, f64::INFINITY]).is_err());
        assert!(!EvaluationMesh::from_prices(vec![1.0, 2.0]).unwrap().is_empty());
    }
}
