//! Random forest of axis-aligned regression trees.
//!
//! Trees use the scikit-learn node layout: node 0 is the root, children always
//! have a larger index than their parent, and a sample goes left when
//! `x[feature] <= threshold`. The forest prediction is the mean of its trees.

use bioactivity_common::{BioactivityError, Result};
use bioactivity_descriptors::FeatureMatrix;
use serde::{Deserialize, Serialize};

use crate::{ensure_width, Regressor};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        for (id, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split { feature, threshold, left, right } => {
                    if feature >= n_features {
                        return Err(format!("node {} splits on feature {} of {}", id, feature, n_features));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", id));
                    }
                    for child in [left, right] {
                        if child <= id || child >= self.nodes.len() {
                            return Err(format!("node {} has invalid child {}", id, child));
                        }
                    }
                }
                Node::Leaf { value } if !value.is_finite() => {
                    return Err(format!("leaf {} has non-finite value", id));
                }
                Node::Leaf { .. } => {}
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf. Terminates because validated children
    /// always point forward.
    fn evaluate(&self, x: &[f64]) -> f64 {
        let mut id = 0;
        loop {
            match self.nodes[id] {
                Node::Leaf { value } => return value,
                Node::Split { feature, threshold, left, right } => {
                    id = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    /// Input width. May be omitted from an artifact that lists its
    /// feature names; the loader fills it in from them.
    #[serde(default)]
    pub n_features: usize,
    pub trees: Vec<Tree>,
}

impl RandomForestRegressor {
    pub fn new(n_features: usize, trees: Vec<Tree>) -> Result<Self> {
        let forest = Self { n_features, trees };
        forest.validate()?;
        Ok(forest)
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_features == 0 {
            return Err(BioactivityError::Model("random forest declares zero features; set n_features or feature_names".into()));
        }
        if self.trees.is_empty() {
            return Err(BioactivityError::Model("random forest has no trees".into()));
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features)
                .map_err(|e| BioactivityError::Model(format!("tree {}: {}", i, e)))?;
        }
        Ok(())
    }
}

impl Regressor for RandomForestRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>> {
        ensure_width(features, self.n_features)?;
        let n_trees = self.trees.len() as f64;
        Ok(features
            .rows()
            .iter()
            .map(|row| self.trees.iter().map(|t| t.evaluate(row)).sum::<f64>() / n_trees)
            .collect())
    }
}
