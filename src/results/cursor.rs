use crate::error::SqlPortableError;
use crate::fetch::{FetchedRow, RowShape};

/// Row source produced by a driver for a row-returning statement.
pub trait Cursor {
    /// Next row in `shape`, or `None` once the rows are exhausted.
    ///
    /// # Errors
    /// Returns the backend's failure while reading the row.
    fn fetch_row(&mut self, shape: RowShape) -> Result<Option<FetchedRow>, SqlPortableError>;

    /// Number of columns in each row.
    ///
    /// # Errors
    /// Returns an error if the backend cannot describe the result.
    fn column_count(&self) -> Result<usize, SqlPortableError>;

    /// Total rows, when the backend knows it without reading them.
    fn num_rows(&self) -> Option<usize> {
        None
    }

    /// Give back whatever the backend holds for this result. Must be safe to call twice.
    fn release(&mut self);
}
