use indexmap::IndexMap;
use indexmap::map::Entry;

use crate::driver::Driver;
use crate::error::{ErrorCode, SqlPortableError};
use crate::fetch::{AllRows, AssocValue, ColumnKey, ColumnRef, FetchMode, FetchedRow};
use crate::results::{Cursor, DbResult};
use crate::types::RowValues;

use super::Connection;

impl<D: Driver> Connection<D> {
    /// First column of the first row, or `None` when there are no rows.
    ///
    /// # Errors
    /// Execution errors, or the cursor's error while reading the row.
    pub fn get_one(
        &mut self,
        sql: &str,
        values: &[RowValues],
    ) -> Result<Option<RowValues>, SqlPortableError> {
        let Some(mut result) = self.query(sql, values)?.into_result() else {
            return Ok(None);
        };
        let row = result.fetch_row(FetchMode::Ordered)?;
        Ok(row.and_then(|row| row.into_values().into_iter().next()))
    }

    /// First row in `mode` (`FetchMode::Default` uses the connection's mode).
    ///
    /// # Errors
    /// Execution errors, or the cursor's error while reading the row.
    pub fn get_row(
        &mut self,
        sql: &str,
        values: &[RowValues],
        mode: FetchMode,
    ) -> Result<Option<FetchedRow>, SqlPortableError> {
        let mode = mode.resolve(self.fetch_mode);
        let Some(mut result) = self.query(sql, values)?.into_result() else {
            return Ok(None);
        };
        result.fetch_row(mode)
    }

    /// Every value of one column, by ordinal or by name.
    ///
    /// # Errors
    /// * `NoSuchField` when the rows do not have `column`.
    /// * Execution or cursor errors; rows read before a cursor error are discarded.
    pub fn get_col(
        &mut self,
        sql: &str,
        values: &[RowValues],
        column: impl Into<ColumnRef>,
    ) -> Result<Vec<RowValues>, SqlPortableError> {
        let column = column.into();
        let mode = match column {
            ColumnRef::Index(_) => FetchMode::Ordered,
            ColumnRef::Name(_) => FetchMode::Associative,
        };
        let Some(mut result) = self.query(sql, values)?.into_result() else {
            return Ok(Vec::new());
        };

        let mut out = Vec::new();
        while let Some(row) = fetch_or_discard(&mut result, mode, out.len())? {
            let Some(value) = row.get(&column) else {
                return Err(self.raise_error(
                    ErrorCode::NoSuchField,
                    None,
                    Some(&format!("{} [column {column:?}]", self.last_query)),
                ));
            };
            out.push(value.clone());
        }
        Ok(out)
    }

    /// Rows keyed by their first column.
    ///
    /// With exactly two columns and `force_array` unset, each key maps to the second column's
    /// value. Otherwise each key maps to the remaining columns in `mode`'s shape. With `group`
    /// set, values for a repeated key collect into [`AssocValue::Group`]; without it the last
    /// row for a key wins.
    ///
    /// # Errors
    /// * `Truncated` for results with fewer than two columns.
    /// * Execution or cursor errors; rows read before a cursor error are discarded.
    pub fn get_assoc(
        &mut self,
        sql: &str,
        values: &[RowValues],
        force_array: bool,
        mode: FetchMode,
        group: bool,
    ) -> Result<IndexMap<String, AssocValue>, SqlPortableError> {
        let mode = mode.resolve(self.fetch_mode);
        let Some(mut result) = self.query(sql, values)?.into_result() else {
            return Ok(IndexMap::new());
        };

        let cols = result.column_count()?;
        if cols < 2 {
            return Err(self.raise_error(ErrorCode::Truncated, None, None));
        }
        let scalar = cols == 2 && !force_array;
        let fetch_mode = if scalar { FetchMode::Ordered } else { mode };

        let mut out: IndexMap<String, AssocValue> = IndexMap::new();
        let mut seen = 0;
        while let Some(row) = fetch_or_discard(&mut result, fetch_mode, seen)? {
            seen += 1;
            let Some((key, rest)) = row.split_first() else {
                continue;
            };
            let value = if scalar {
                let second = rest.into_values().into_iter().next();
                AssocValue::Scalar(second.unwrap_or(RowValues::Null))
            } else {
                AssocValue::Row(rest)
            };
            let key = key.to_key_string();

            if group {
                match out.entry(key) {
                    Entry::Occupied(mut entry) => {
                        if let AssocValue::Group(items) = entry.get_mut() {
                            items.push(value);
                        }
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(AssocValue::Group(vec![value]));
                    }
                }
            } else {
                out.insert(key, value);
            }
        }
        Ok(out)
    }

    /// Every row in `mode`; flipped modes return one entry per column instead.
    ///
    /// # Errors
    /// Execution or cursor errors; rows read before a cursor error are discarded.
    pub fn get_all(
        &mut self,
        sql: &str,
        values: &[RowValues],
        mode: FetchMode,
    ) -> Result<AllRows, SqlPortableError> {
        let mode = mode.resolve(self.fetch_mode);
        let flipped = mode.is_flipped();
        let Some(mut result) = self.query(sql, values)?.into_result() else {
            return Ok(if flipped {
                AllRows::Flipped(IndexMap::new())
            } else {
                AllRows::Rows(Vec::new())
            });
        };

        if flipped {
            let mut columns: IndexMap<ColumnKey, Vec<RowValues>> = IndexMap::new();
            let mut seen = 0;
            while let Some(row) = fetch_or_discard(&mut result, mode, seen)? {
                seen += 1;
                for (key, value) in row.into_keyed() {
                    columns.entry(key).or_default().push(value);
                }
            }
            Ok(AllRows::Flipped(columns))
        } else {
            let mut rows = Vec::new();
            while let Some(row) = fetch_or_discard(&mut result, mode, rows.len())? {
                rows.push(row);
            }
            Ok(AllRows::Rows(rows))
        }
    }
}

/// Fetch one row; on error, note how many rows are being thrown away.
fn fetch_or_discard<C: Cursor>(
    result: &mut DbResult<C>,
    mode: FetchMode,
    accumulated: usize,
) -> Result<Option<FetchedRow>, SqlPortableError> {
    result.fetch_row(mode).inspect_err(|err| {
        if accumulated > 0 {
            tracing::warn!(accumulated, %err, "cursor failed mid-result; discarding rows");
        }
    })
}
