//! Ordinary linear model: `y = w · x + b`.

use bioactivity_common::{BioactivityError, Result};
use bioactivity_descriptors::FeatureMatrix;
use serde::{Deserialize, Serialize};

use crate::{ensure_width, Regressor};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressor {
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearRegressor {
    pub fn new(coefficients: Vec<f64>, intercept: f64) -> Self {
        Self { coefficients, intercept }
    }

    pub fn validate(&self) -> Result<()> {
        if self.coefficients.is_empty() {
            return Err(BioactivityError::Model("linear model has no coefficients".into()));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(BioactivityError::Model("linear model has non-finite parameters".into()));
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        ensure_width(features, self.coefficients.len())?;
        Ok(features
            .rows()
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&self.coefficients)
                    .map(|(x, w)| x * w)
                    .sum::<f64>()
                    + self.intercept
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dot_product_plus_intercept() {
        let model = LinearRegressor::new(vec![0.5, -1.0], 6.0);
        let x = FeatureMatrix::new(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 0.0], vec![2.0, 1.0]],
        )
        .unwrap();
        assert_eq!(model.predict(&x).unwrap(), vec![6.5, 6.0]);
    }

    #[test]
    fn test_width_mismatch() {
        let model = LinearRegressor::new(vec![0.5, -1.0, 2.0], 0.0);
        let x = FeatureMatrix::new(vec!["a".into()], vec![vec![1.0]]).unwrap();
        let err = model.predict(&x).unwrap_err();
        assert!(err.to_string().contains("expecting 3 features"));
    }

    #[test]
    fn test_validate_rejects_nan() {
        assert!(LinearRegressor::new(vec![f64::NAN], 0.0).validate().is_err());
        assert!(LinearRegressor::new(vec![], 0.0).validate().is_err());
        assert!(LinearRegressor::new(vec![1.0], 0.0).validate().is_ok());
    }
}
