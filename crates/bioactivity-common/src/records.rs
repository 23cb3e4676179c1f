//! Row types flowing through the prediction pipeline.

use serde::{Deserialize, Serialize};

/// One uploaded line: a structure string (SMILES) and its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputRecord {
    pub structure: String,
    pub identifier: String,
}

impl InputRecord {
    pub fn new(structure: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            structure: structure.into(),
            identifier: identifier.into(),
        }
    }
}

/// A predicted bioactivity score for one molecule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub identifier: String,
    pub score: f64,
}

/// Rows x columns of a table, as shown next to each intermediate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    pub rows: usize,
    pub columns: usize,
}

impl std::fmt::Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.rows, self.columns)
    }
}
