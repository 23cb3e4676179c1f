//! bioactivity-model: the trained regressor behind a single predict entry point.
//!
//! Models are exported from the training side as a JSON artifact holding the
//! estimator parameters and, optionally, the feature names it was fitted on.

pub mod artifact;
pub mod linear;
pub mod forest;

use bioactivity_common::Result;
use bioactivity_descriptors::FeatureMatrix;

pub use artifact::{check_schema, ModelArtifact};
pub use forest::RandomForestRegressor;
pub use linear::LinearRegressor;

/// A fitted regression model: one score per feature-matrix row.
pub trait Regressor: Send + Sync {
    /// Number of input columns the model was fitted on.
    fn n_features(&self) -> usize;

    /// Training-time column names, when the artifact recorded them.
    fn feature_names(&self) -> Option<&[String]> {
        None
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;
}

/// Shared input guard: the matrix must have exactly the fitted column count.
pub(crate) fn ensure_width(features: &FeatureMatrix, expected: usize) -> Result<()> {
    if features.n_columns() != expected {
        return Err(bioactivity_common::BioactivityError::Model(format!(
            "X has {} features, but the model is expecting {} features as input",
            features.n_columns(),
            expected
        )));
    }
    Ok(())
}
