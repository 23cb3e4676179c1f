//! Descriptor CSV produced by the external tool.

use std::collections::{HashMap, VecDeque};
use std::io::Read;
use std::path::Path;

use bioactivity_common::{BioactivityError, Result, Shape};
use tracing::debug;

/// Column PaDEL writes the molecule identifier into.
pub const NAME_COLUMN: &str = "Name";

/// A descriptor table kept as raw text; cells are parsed only when projected.
#[derive(Debug, Clone)]
pub struct DescriptorTable {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: Vec<csv::StringRecord>,
}

impl DescriptorTable {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            BioactivityError::DescriptorOutput(format!("cannot open {:?}: {}", path, e))
        })?;
        let table = Self::from_reader(file)?;
        debug!("Read descriptor table {:?} with shape {}", path, table.shape());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if headers.iter().all(String::is_empty) {
            return Err(BioactivityError::DescriptorOutput(
                "descriptor table has no header row".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(headers.len());
        for (i, name) in headers.iter().enumerate() {
            // First occurrence wins, as with a by-name lookup on a data frame.
            index.entry(name.clone()).or_insert(i);
        }

        let rows = reader.records().collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { headers, index, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn shape(&self) -> Shape {
        Shape { rows: self.rows.len(), columns: self.headers.len() }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Molecule names as written by the tool, when it emits a Name column.
    pub fn identifiers(&self) -> Option<Vec<&str>> {
        let col = self.column_index(NAME_COLUMN)?;
        Some(self.rows.iter().map(|r| r.get(col).unwrap_or_default()).collect())
    }

    /// Reorder rows so that row `i` is the one named `identifiers[i]`.
    ///
    /// Repeated names are consumed in the order the tool wrote them, so the
    /// k-th upload of an identifier gets the k-th row carrying that name.
    /// A table without a Name column is returned unchanged.
    pub fn ordered_by(mut self, identifiers: &[&str]) -> Result<Self> {
        let Some(col) = self.column_index(NAME_COLUMN) else {
            return Ok(self);
        };

        let mut order = Vec::with_capacity(identifiers.len());
        {
            let mut by_name: HashMap<&str, VecDeque<usize>> = HashMap::new();
            for (i, row) in self.rows.iter().enumerate() {
                by_name.entry(row.get(col).unwrap_or_default()).or_default().push_back(i);
            }
            for (i, identifier) in identifiers.iter().enumerate() {
                match by_name.get_mut(identifier).and_then(VecDeque::pop_front) {
                    Some(row) => order.push(row),
                    None => {
                        return Err(BioactivityError::UnmatchedIdentifier {
                            row: i + 1,
                            identifier: identifier.to_string(),
                        })
                    }
                }
            }
        }

        let mut slots: Vec<Option<csv::StringRecord>> =
            std::mem::take(&mut self.rows).into_iter().map(Some).collect();
        self.rows = order.into_iter().filter_map(|i| slots[i].take()).collect();
        Ok(self)
    }

    /// Top-left corner of the table for display.
    pub fn preview(&self, max_rows: usize, max_columns: usize) -> TablePreview {
        let columns: Vec<String> = self.headers.iter().take(max_columns).cloned().collect();
        let rows = self
            .rows
            .iter()
            .take(max_rows)
            .map(|r| r.iter().take(max_columns).map(str::to_string).collect())
            .collect();
        TablePreview { columns, rows, shape: self.shape() }
    }
}

/// Truncated copy of a table, plus the full table's shape.
#[derive(Debug, Clone, serde::Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub shape: Shape,
}

impl TablePreview {
    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.shape.rows || self.columns.len() < self.shape.columns
    }
}
