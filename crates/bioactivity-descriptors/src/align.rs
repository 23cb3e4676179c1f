//! Projection of the descriptor table onto the model's reference features.

use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use bioactivity_common::{BioactivityError, Result, Shape};
use tracing::{debug, info};

use crate::table::DescriptorTable;

/// Ordered descriptor names the trained model expects as input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceFeatureList {
    names: Vec<String>,
}

impl ReferenceFeatureList {
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(BioactivityError::SchemaMismatch(
                "reference feature list is empty".to_string(),
            ));
        }
        let mut seen = HashSet::with_capacity(names.len());
        for name in &names {
            if name.is_empty() {
                return Err(BioactivityError::SchemaMismatch(
                    "reference feature list contains an empty column name".to_string(),
                ));
            }
            if !seen.insert(name.as_str()) {
                return Err(BioactivityError::SchemaMismatch(format!(
                    "reference feature list names {:?} twice",
                    name
                )));
            }
        }
        Ok(Self { names })
    }

    /// Read the header row of the feature-list CSV. Data rows, if any, are ignored.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(BioactivityError::MissingArtifact {
                kind: "reference feature list",
                path: path.to_path_buf(),
            });
        }
        let list = Self::from_reader(std::fs::File::open(path)?)?;
        info!("Loaded {} reference features from {:?}", list.len(), path);
        Ok(list)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);
        let names = reader.headers()?.iter().map(str::to_string).collect();
        Self::new(names)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Reference columns absent from `table`, in reference order.
    pub fn missing_from(&self, table: &DescriptorTable) -> Vec<String> {
        self.names
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .cloned()
            .collect()
    }

    /// Select exactly the reference columns, in reference order, keeping row order.
    pub fn project(&self, table: &DescriptorTable) -> Result<FeatureMatrix> {
        let missing = self.missing_from(table);
        if !missing.is_empty() {
            return Err(BioactivityError::MissingColumns(missing));
        }

        let indices: Vec<usize> = self
            .names
            .iter()
            .filter_map(|name| table.column_index(name))
            .collect();

        let mut rows = Vec::with_capacity(table.len());
        for row in 0..table.len() {
            let mut values = Vec::with_capacity(indices.len());
            for (&col, name) in indices.iter().zip(&self.names) {
                let raw = table.cell(row, col).unwrap_or_default();
                let value = raw.parse::<f64>().map_err(|_| BioactivityError::NonNumericFeature {
                    row: row + 1,
                    column: name.clone(),
                    value: raw.to_string(),
                })?;
                values.push(value);
            }
            rows.push(values);
        }

        debug!("Projected {} descriptor columns down to {}", table.headers().len(), self.len());
        Ok(FeatureMatrix { columns: self.names.clone(), rows })
    }
}

/// Numeric model input: one row per molecule, one column per reference feature.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    /// Build a matrix directly; every row must have one value per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(BioactivityError::SchemaMismatch(format!(
                "row {} has {} values for {} columns",
                i + 1,
                row.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Option<&[f64]> {
        self.rows.get(i).map(Vec::as_slice)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn shape(&self) -> Shape {
        Shape { rows: self.n_rows(), columns: self.n_columns() }
    }

    pub fn to_csv(&self) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(f64::to_string))?;
        }
        writer
            .into_inner()
            .map_err(|e| BioactivityError::Io(e.into_error()))
    }
}
