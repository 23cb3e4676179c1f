//! On-disk model artifact and startup schema validation.

use std::path::Path;

use bioactivity_common::{BioactivityError, Result};
use bioactivity_descriptors::{FeatureMatrix, ReferenceFeatureList};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::forest::RandomForestRegressor;
use crate::linear::LinearRegressor;
use crate::Regressor;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Estimator {
    Linear(LinearRegressor),
    RandomForest(RandomForestRegressor),
}

impl Estimator {
    fn as_regressor(&self) -> &dyn Regressor {
        match self {
            Estimator::Linear(m) => m,
            Estimator::RandomForest(m) => m,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            Estimator::Linear(m) => m.validate(),
            Estimator::RandomForest(m) => m.validate(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Estimator::Linear(_) => "linear",
            Estimator::RandomForest(_) => "random_forest",
        }
    }
}

/// A persisted regression model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(default)]
    pub name: Option<String>,
    /// Quantity being predicted, e.g. "pIC50".
    #[serde(default)]
    pub target: Option<String>,
    /// Columns the estimator was fitted on, in order.
    #[serde(default)]
    pub feature_names: Option<Vec<String>>,
    pub estimator: Estimator,
}

impl ModelArtifact {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BioactivityError::MissingArtifact {
                kind: "model",
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let artifact = Self::from_json(&content)?;
        info!(
            "Loaded {} model {:?} from {:?} ({} features)",
            artifact.estimator.kind(),
            artifact.name.as_deref().unwrap_or("unnamed"),
            path,
            artifact.n_features()
        );
        Ok(artifact)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let mut artifact: ModelArtifact = serde_json::from_str(content)
            .map_err(|e| BioactivityError::Model(format!("cannot decode model artifact: {}", e)))?;
        if let (Estimator::RandomForest(forest), Some(names)) = (&mut artifact.estimator, &artifact.feature_names) {
            if forest.n_features == 0 {
                forest.n_features = names.len();
            }
        }
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn validate(&self) -> Result<()> {
        self.estimator.validate()?;
        if let Some(names) = &self.feature_names {
            if names.len() != self.estimator.as_regressor().n_features() {
                return Err(BioactivityError::Model(format!(
                    "artifact lists {} feature names for an estimator with {} features",
                    names.len(),
                    self.estimator.as_regressor().n_features()
                )));
            }
        }
        Ok(())
    }
}

impl Regressor for ModelArtifact {
    fn n_features(&self) -> usize {
        self.estimator.as_regressor().n_features()
    }

    fn feature_names(&self) -> Option<&[String]> {
        self.feature_names.as_deref()
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        self.estimator.as_regressor().predict(features)
    }
}

/// Validate that the model and the reference feature list describe the same
/// input schema. Names are compared when the model recorded them; otherwise
/// only the column count can be checked.
pub fn check_schema(model: &dyn Regressor, reference: &ReferenceFeatureList) -> Result<()> {
    match model.feature_names() {
        Some(names) if names != reference.names() => {
            let position = names
                .iter()
                .zip(reference.names())
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| names.len().min(reference.len()));
            Err(BioactivityError::SchemaMismatch(format!(
                "model feature names differ from the reference list at position {} \
                 (model has {}, reference has {})",
                position + 1,
                names.len(),
                reference.len()
            )))
        }
        Some(_) => Ok(()),
        None if model.n_features() != reference.len() => Err(BioactivityError::SchemaMismatch(format!(
            "model expects {} features but the reference list has {}",
            model.n_features(),
            reference.len()
        ))),
        None => Ok(()),
    }
}
