//! Cursors and the owned result wrapper handed to callers.

mod cursor;
mod result_set;
mod row;

use std::collections::VecDeque;

pub use cursor::Cursor;
pub use result_set::{BufferedCursor, ResultSet};
pub use row::CustomDbRow;

use crate::error::{ErrorCode, SqlPortableError};
use crate::fetch::{FetchMode, FetchedRow, RowShape};
use crate::portability::Portability;

/// A live result: owns the driver's cursor and releases it when dropped.
///
/// Rows come back with the connection's portability transforms already applied.
#[derive(Debug)]
pub struct DbResult<C: Cursor> {
    cursor: C,
    portability: Portability,
    autofree: bool,
    default_mode: FetchMode,
    // Rows drained early to count them; served before the cursor.
    counted: Option<VecDeque<CustomDbRow>>,
    released: bool,
}

impl<C: Cursor> DbResult<C> {
    pub(crate) fn new(
        cursor: C,
        portability: Portability,
        autofree: bool,
        default_mode: FetchMode,
    ) -> Self {
        Self {
            cursor,
            portability,
            autofree,
            default_mode,
            counted: None,
            released: false,
        }
    }

    /// Fetch the next row. `FetchMode::Default` uses the connection's mode at execution time.
    ///
    /// # Errors
    /// Propagates the cursor's error.
    pub fn fetch_row(&mut self, mode: FetchMode) -> Result<Option<FetchedRow>, SqlPortableError> {
        let shape = mode
            .resolve(self.default_mode)
            .shape()
            .unwrap_or(RowShape::Ordered);
        if self.released {
            return Ok(None);
        }

        let next = match self.counted.as_mut() {
            Some(buffer) => buffer
                .pop_front()
                .map(|row| FetchedRow::from_object(row, shape)),
            None => self.cursor.fetch_row(shape)?,
        };

        match next {
            Some(mut row) => {
                row.apply_portability(self.portability);
                Ok(Some(row))
            }
            None => {
                if self.autofree {
                    self.release();
                }
                Ok(None)
            }
        }
    }

    /// # Errors
    /// Propagates the cursor's error.
    pub fn column_count(&self) -> Result<usize, SqlPortableError> {
        self.cursor.column_count()
    }

    /// Rows in the result.
    ///
    /// Cursors that cannot count are drained into memory when the `NUMROWS` portability flag is
    /// set; without it they report `NotCapable`.
    ///
    /// # Errors
    /// `NotCapable` as described, or the cursor's error while draining.
    pub fn num_rows(&mut self) -> Result<usize, SqlPortableError> {
        if let Some(buffer) = &self.counted {
            return Ok(buffer.len());
        }
        if let Some(n) = self.cursor.num_rows() {
            return Ok(n);
        }
        if !self.portability.contains(Portability::NUMROWS) {
            return Err(SqlPortableError::with_info(
                ErrorCode::NotCapable,
                "cursor cannot report its row count",
            ));
        }

        let mut buffer = VecDeque::new();
        while let Some(row) = self.cursor.fetch_row(RowShape::Object)? {
            buffer.push_back(row.into_object());
        }
        let n = buffer.len();
        self.counted = Some(buffer);
        Ok(n)
    }

    /// Release the cursor now instead of at drop.
    pub fn free(mut self) {
        self.release();
    }

    #[must_use]
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn release(&mut self) {
        if !self.released {
            self.cursor.release();
            self.counted = None;
            self.released = true;
            tracing::trace!("result released");
        }
    }
}

impl<C: Cursor> Drop for DbResult<C> {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RowValues;

    fn numbers(n: i64) -> BufferedCursor {
        let mut set = ResultSet::new(vec!["N".into(), "Label".into()]);
        for i in 0..n {
            set.add_row_values(vec![RowValues::Int(i), RowValues::Text(format!("v{i}  "))]);
        }
        BufferedCursor::from(set)
    }

    #[test]
    fn default_mode_and_transforms() {
        let mut result = DbResult::new(
            numbers(1),
            Portability::LOWERCASE | Portability::RTRIM,
            false,
            FetchMode::Associative,
        );
        let row = result.fetch_row(FetchMode::Default).unwrap().unwrap();
        let FetchedRow::Associative(map) = row else {
            panic!("expected associative row");
        };
        assert_eq!(map.get("label"), Some(&RowValues::Text("v0".into())));
        assert!(result.fetch_row(FetchMode::Default).unwrap().is_none());
        assert!(!result.is_released());
    }

    #[test]
    fn autofree_releases_at_end() {
        let mut result = DbResult::new(numbers(1), Portability::NONE, true, FetchMode::Ordered);
        assert!(result.fetch_row(FetchMode::Default).unwrap().is_some());
        assert!(result.fetch_row(FetchMode::Default).unwrap().is_none());
        assert!(result.is_released());
    }

    /// Streams ordered rows whatever shape is asked for, and cannot count them.
    struct OrderedOnly(std::vec::IntoIter<Vec<RowValues>>);

    impl Cursor for OrderedOnly {
        fn fetch_row(&mut self, _: RowShape) -> Result<Option<FetchedRow>, SqlPortableError> {
            Ok(self.0.next().map(FetchedRow::Ordered))
        }

        fn column_count(&self) -> Result<usize, SqlPortableError> {
            Ok(1)
        }

        fn release(&mut self) {}
    }

    #[test]
    fn numrows_drain_keeps_rows_of_any_shape() {
        let rows = vec![vec![RowValues::Int(7)], vec![RowValues::Int(8)]];
        let mut result = DbResult::new(
            OrderedOnly(rows.into_iter()),
            Portability::NUMROWS,
            false,
            FetchMode::Ordered,
        );
        assert_eq!(result.num_rows().unwrap(), 2);
        let first = result.fetch_row(FetchMode::Default).unwrap().unwrap();
        assert_eq!(first.into_values(), vec![RowValues::Int(7)]);
        let second = result.fetch_row(FetchMode::Object).unwrap().unwrap();
        assert_eq!(second.get(&crate::fetch::ColumnRef::Index(0)), Some(&RowValues::Int(8)));
        assert!(result.fetch_row(FetchMode::Default).unwrap().is_none());
    }

    #[test]
    fn buffered_cursor_counts_natively() {
        let mut result = DbResult::new(numbers(3), Portability::NONE, false, FetchMode::Ordered);
        assert_eq!(result.num_rows().unwrap(), 3);
        assert!(result.fetch_row(FetchMode::Default).unwrap().is_some());
    }
}
