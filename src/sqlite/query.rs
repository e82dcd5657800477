use rusqlite::Statement;
use rusqlite::types::Value;

use super::errors::native_error;
use crate::error::NativeError;
use crate::results::ResultSet;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns the native error if the value cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, NativeError> {
    let value: Value = row.get(idx).map_err(native_error)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Read every row of a prepared statement into a `ResultSet`.
///
/// `capacity` is only a starting allocation.
///
/// # Errors
/// Returns the native error if stepping the statement or reading a value fails.
pub fn build_result_set(
    stmt: &mut Statement,
    capacity: usize,
) -> Result<ResultSet, NativeError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();
    let mut result_set = ResultSet::with_capacity(column_names, capacity);

    let mut rows_iter = stmt.query([]).map_err(native_error)?;
    while let Some(row) = rows_iter.next().map_err(native_error)? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
