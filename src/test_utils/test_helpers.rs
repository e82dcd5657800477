//! Helper utilities for testing and development.

use std::sync::Arc;

use crate::results::{CustomDbRow, ResultSet};
use crate::types::RowValues;

/// Create a test row with the given column names and values.
#[must_use]
pub fn create_test_row(column_names: Vec<String>, values: Vec<RowValues>) -> CustomDbRow {
    CustomDbRow::new(Arc::new(column_names), values)
}

/// Create a result set from column names and rows of values.
#[must_use]
pub fn create_result_set(column_names: &[&str], rows: Vec<Vec<RowValues>>) -> ResultSet {
    let names = column_names.iter().map(|n| (*n).to_string()).collect();
    let mut set = ResultSet::with_capacity(names, rows.len());
    for row in rows {
        set.add_row_values(row);
    }
    set
}
