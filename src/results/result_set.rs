use std::collections::HashMap;
use std::sync::Arc;

use super::cursor::Cursor;
use super::row::{CustomDbRow, index_columns};
use crate::error::SqlPortableError;
use crate::fetch::{FetchedRow, RowShape};
use crate::types::RowValues;

/// Rows fully read from the backend, sharing one set of column names.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    /// The rows returned by the query
    pub results: Vec<CustomDbRow>,
    column_names: Arc<Vec<String>>,
    column_index: Arc<HashMap<String, usize>>,
}

impl ResultSet {
    /// Create an empty result set with room for `capacity` rows.
    #[must_use]
    pub fn with_capacity(column_names: Vec<String>, capacity: usize) -> ResultSet {
        let column_index = Arc::new(index_columns(&column_names));
        ResultSet {
            results: Vec::with_capacity(capacity),
            column_names: Arc::new(column_names),
            column_index,
        }
    }

    #[must_use]
    pub fn new(column_names: Vec<String>) -> ResultSet {
        Self::with_capacity(column_names, 0)
    }

    #[must_use]
    pub fn column_names(&self) -> &Arc<Vec<String>> {
        &self.column_names
    }

    /// Append one row of values, in column order.
    pub fn add_row_values(&mut self, row_values: Vec<RowValues>) {
        self.results.push(CustomDbRow::with_cache(
            Arc::clone(&self.column_names),
            Arc::clone(&self.column_index),
            row_values,
        ));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// A cursor over rows already held in memory.
#[derive(Debug)]
pub struct BufferedCursor {
    rows: std::vec::IntoIter<CustomDbRow>,
    column_count: usize,
    total: usize,
    released: bool,
}

impl From<ResultSet> for BufferedCursor {
    fn from(set: ResultSet) -> Self {
        let column_count = set.column_names.len();
        let total = set.results.len();
        Self {
            rows: set.results.into_iter(),
            column_count,
            total,
            released: false,
        }
    }
}

impl BufferedCursor {
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Cursor for BufferedCursor {
    fn fetch_row(&mut self, shape: RowShape) -> Result<Option<FetchedRow>, SqlPortableError> {
        Ok(self
            .rows
            .next()
            .map(|row| FetchedRow::from_object(row, shape)))
    }

    fn column_count(&self) -> Result<usize, SqlPortableError> {
        Ok(self.column_count)
    }

    fn num_rows(&self) -> Option<usize> {
        Some(self.total)
    }

    fn release(&mut self) {
        self.rows = Vec::new().into_iter();
        self.released = true;
    }
}
