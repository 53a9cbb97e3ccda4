//! # Table Store
//!
//! The in-memory dataset: an ordered header plus rows of string cells.
//!
//! ```text
//! Table
//! ├── headers: Vec<String>            // unique, ordered column names
//! ├── rows: Vec<Vec<String>>          // each row has headers.len() cells
//! └── positions: HashMap<String, usize>  // header name → column position
//! ```
//!
//! A `Table` is immutable once built. Row order is stable and a row's index
//! is its identity for the lifetime of the table. The orchestrator owns the
//! loaded table behind an `Arc` and hands the query engine a shared borrow.

pub mod loader;
pub mod query;

use std::collections::HashMap;
use std::fmt;

pub use loader::{FileSource, LoadError, TableSource};
pub use query::{Query, QueryError, QueryKind, QueryResult, execute, find_row_indices};

/// Errors raised while building or reading a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// The same column name appears more than once in the header.
    DuplicateHeader(String),
    /// A row's cell count differs from the header length.
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// A column lookup named a header that does not exist.
    UnknownColumn(String),
}

impl TableError {
    /// True for the errors that make a table unbuildable.
    pub fn is_malformed(&self) -> bool {
        matches!(self, TableError::DuplicateHeader(_) | TableError::RowWidth { .. })
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::DuplicateHeader(name) => write!(f, "duplicate column header '{name}'"),
            TableError::RowWidth {
                row,
                expected,
                found,
            } => write!(f, "row {row} has {found} cells, expected {expected}"),
            TableError::UnknownColumn(name) => write!(f, "unknown column '{name}'"),
        }
    }
}

impl std::error::Error for TableError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    positions: HashMap<String, usize>,
}

impl Table {
    /// Build a table, validating header uniqueness and row widths.
    pub fn build(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, TableError> {
        let mut positions = HashMap::with_capacity(headers.len());
        for (position, name) in headers.iter().enumerate() {
            if positions.insert(name.clone(), position).is_some() {
                return Err(TableError::DuplicateHeader(name.clone()));
            }
        }

        if let Some((row, cells)) = rows
            .iter()
            .enumerate()
            .find(|(_, cells)| cells.len() != headers.len())
        {
            return Err(TableError::RowWidth {
                row,
                expected: headers.len(),
                found: cells.len(),
            });
        }

        Ok(Self {
            headers,
            rows,
            positions,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Position of a named column within each row.
    pub fn column_index(&self, name: &str) -> Result<usize, TableError> {
        self.positions
            .get(name)
            .copied()
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Materialize a column top-to-bottom. O(rows), no caching, no side effects.
    pub fn column(&self, name: &str) -> Result<Vec<&str>, TableError> {
        let position = self.column_index(name)?;
        Ok(self
            .rows
            .iter()
            .map(|cells| cells[position].as_str())
            .collect())
    }
}
