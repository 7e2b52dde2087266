//! Tabular input handed over by the upload collaborator.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};

/// A single cell of an uploaded table.
///
/// Spreadsheet readers hand over typed numbers, CSV readers hand over text;
/// both are accepted and interpreted later by the schema detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
    Empty,
}

impl Cell {
    /// Build a cell from raw text, mapping blank strings to [`Cell::Empty`].
    pub fn from_text(text: &str) -> Self {
        if text.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(text.to_string())
        }
    }

    /// Whether the cell holds no value.
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(v) => v.is_nan(),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::from_text(text)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

/// Header row plus record rows of one uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Create a table, checking that every row matches the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Result<Self> {
        if headers.is_empty() {
            return Err(AnalysisError::EmptyData);
        }
        for row in &rows {
            if row.len() != headers.len() {
                return Err(AnalysisError::DimensionMismatch {
                    expected: headers.len(),
                    got: row.len(),
                });
            }
        }
        Ok(Self { headers, rows })
    }

    /// Create a table from text rows, as produced by a CSV reader.
    pub fn from_strings<S: AsRef<str>>(headers: &[S], rows: &[Vec<S>]) -> Result<Self> {
        let headers = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| Cell::from_text(c.as_ref())).collect())
            .collect();
        Self::new(headers, rows)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Number of record rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate over one column's cells.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}
