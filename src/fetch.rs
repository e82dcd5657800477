//! Fetch modes and the row and result shapes the retrieval helpers hand back.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::portability::{Portability, apply_value_transforms};
use crate::results::CustomDbRow;
use crate::types::RowValues;

/// How a single row is represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowShape {
    /// Values by ordinal position.
    Ordered,
    /// Values keyed by column name, in column order.
    Associative,
    /// A [`CustomDbRow`] with both name and index access.
    Object,
}

/// Row representation requested for a call.
///
/// The flipped variants only change `get_all`: its result becomes column-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchMode {
    /// Use the connection's default mode.
    #[default]
    Default,
    Ordered,
    Associative,
    Object,
    OrderedFlipped,
    AssociativeFlipped,
}

impl FetchMode {
    /// Replace `Default` with `fallback`.
    #[must_use]
    pub fn resolve(self, fallback: FetchMode) -> FetchMode {
        match self {
            FetchMode::Default => fallback,
            other => other,
        }
    }

    #[must_use]
    pub fn is_flipped(self) -> bool {
        matches!(self, FetchMode::OrderedFlipped | FetchMode::AssociativeFlipped)
    }

    /// The per-row shape; `None` for `Default`, which must be resolved first.
    #[must_use]
    pub fn shape(self) -> Option<RowShape> {
        match self {
            FetchMode::Default => None,
            FetchMode::Ordered | FetchMode::OrderedFlipped => Some(RowShape::Ordered),
            FetchMode::Associative | FetchMode::AssociativeFlipped => {
                Some(RowShape::Associative)
            }
            FetchMode::Object => Some(RowShape::Object),
        }
    }
}

/// Column key of a flipped `get_all` result.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ColumnKey {
    Index(usize),
    Name(String),
}

/// Column addressed by ordinal or by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Index(usize),
    Name(String),
}

impl From<usize> for ColumnRef {
    fn from(index: usize) -> Self {
        ColumnRef::Index(index)
    }
}

impl From<&str> for ColumnRef {
    fn from(name: &str) -> Self {
        ColumnRef::Name(name.to_string())
    }
}

impl From<String> for ColumnRef {
    fn from(name: String) -> Self {
        ColumnRef::Name(name)
    }
}

impl ColumnRef {
    /// Shape a cursor must produce for this reference to resolve.
    #[must_use]
    pub fn shape(&self) -> RowShape {
        match self {
            ColumnRef::Index(_) => RowShape::Ordered,
            ColumnRef::Name(_) => RowShape::Associative,
        }
    }
}

/// One fetched row.
#[derive(Debug, Clone)]
pub enum FetchedRow {
    Ordered(Vec<RowValues>),
    Associative(IndexMap<String, RowValues>),
    Object(CustomDbRow),
}

impl FetchedRow {
    /// Reshape a named row.
    #[must_use]
    pub fn from_object(row: CustomDbRow, shape: RowShape) -> Self {
        match shape {
            RowShape::Ordered => FetchedRow::Ordered(row.rows),
            RowShape::Associative => FetchedRow::Associative(
                row.column_names.iter().cloned().zip(row.rows).collect(),
            ),
            RowShape::Object => FetchedRow::Object(row),
        }
    }

    /// Turn any shape into a named row. Ordered rows are named by their column positions.
    #[must_use]
    pub fn into_object(self) -> CustomDbRow {
        match self {
            FetchedRow::Object(row) => row,
            FetchedRow::Associative(map) => {
                let (names, values): (Vec<_>, Vec<_>) = map.into_iter().unzip();
                CustomDbRow::new(Arc::new(names), values)
            }
            FetchedRow::Ordered(values) => {
                let names = (0..values.len()).map(|i| i.to_string()).collect();
                CustomDbRow::new(Arc::new(names), values)
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            FetchedRow::Ordered(values) => values.len(),
            FetchedRow::Associative(map) => map.len(),
            FetchedRow::Object(row) => row.rows.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, column: &ColumnRef) -> Option<&RowValues> {
        match (self, column) {
            (FetchedRow::Ordered(values), ColumnRef::Index(i)) => values.get(*i),
            (FetchedRow::Ordered(_), ColumnRef::Name(_)) => None,
            (FetchedRow::Associative(map), ColumnRef::Index(i)) => {
                map.get_index(*i).map(|(_, v)| v)
            }
            (FetchedRow::Associative(map), ColumnRef::Name(name)) => map.get(name),
            (FetchedRow::Object(row), ColumnRef::Index(i)) => row.get_by_index(*i),
            (FetchedRow::Object(row), ColumnRef::Name(name)) => row.get(name),
        }
    }

    #[must_use]
    pub fn first(&self) -> Option<&RowValues> {
        self.get(&ColumnRef::Index(0))
    }

    /// Values in column order, dropping names.
    #[must_use]
    pub fn into_values(self) -> Vec<RowValues> {
        match self {
            FetchedRow::Ordered(values) => values,
            FetchedRow::Associative(map) => map.into_values().collect(),
            FetchedRow::Object(row) => row.rows,
        }
    }

    /// Values paired with the key a flipped result files them under.
    #[must_use]
    pub fn into_keyed(self) -> Vec<(ColumnKey, RowValues)> {
        match self {
            FetchedRow::Ordered(values) => values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (ColumnKey::Index(i), v))
                .collect(),
            FetchedRow::Associative(map) => map
                .into_iter()
                .map(|(k, v)| (ColumnKey::Name(k), v))
                .collect(),
            FetchedRow::Object(row) => row
                .column_names
                .iter()
                .cloned()
                .zip(row.rows)
                .map(|(k, v)| (ColumnKey::Name(k), v))
                .collect(),
        }
    }

    /// Split off the first column, keeping the remaining columns in the same shape.
    #[must_use]
    pub fn split_first(self) -> Option<(RowValues, FetchedRow)> {
        match self {
            FetchedRow::Ordered(mut values) => {
                if values.is_empty() {
                    return None;
                }
                let first = values.remove(0);
                Some((first, FetchedRow::Ordered(values)))
            }
            FetchedRow::Associative(mut map) => {
                let (_, first) = map.shift_remove_index(0)?;
                Some((first, FetchedRow::Associative(map)))
            }
            FetchedRow::Object(row) => {
                let mut values = row.rows;
                if values.is_empty() {
                    return None;
                }
                let first = values.remove(0);
                let names = row.column_names.iter().skip(1).cloned().collect();
                Some((
                    first,
                    FetchedRow::Object(CustomDbRow::new(Arc::new(names), values)),
                ))
            }
        }
    }

    /// Apply the row-level portability transforms enabled in `flags`.
    pub fn apply_portability(&mut self, flags: Portability) {
        match self {
            FetchedRow::Ordered(values) => apply_value_transforms(flags, values.iter_mut()),
            FetchedRow::Associative(map) => {
                if flags.contains(Portability::LOWERCASE) {
                    *map = std::mem::take(map)
                        .into_iter()
                        .map(|(k, v)| (k.to_lowercase(), v))
                        .collect();
                }
                apply_value_transforms(flags, map.values_mut());
            }
            FetchedRow::Object(row) => {
                if flags.contains(Portability::LOWERCASE) {
                    let names = row.column_names.iter().map(|n| n.to_lowercase()).collect();
                    let values = std::mem::take(&mut row.rows);
                    *row = CustomDbRow::new(Arc::new(names), values);
                }
                apply_value_transforms(flags, row.rows.iter_mut());
            }
        }
    }
}

/// Value stored under one key of a `get_assoc` result.
#[derive(Debug, Clone)]
pub enum AssocValue {
    /// The second column, for two-column results without `force_array`.
    Scalar(RowValues),
    /// Every column but the first, in the requested shape.
    Row(FetchedRow),
    /// All values seen for the key, in row order, when grouping.
    Group(Vec<AssocValue>),
}

impl AssocValue {
    #[must_use]
    pub fn as_scalar(&self) -> Option<&RowValues> {
        if let AssocValue::Scalar(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_row(&self) -> Option<&FetchedRow> {
        if let AssocValue::Row(row) = self {
            Some(row)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_group(&self) -> Option<&[AssocValue]> {
        if let AssocValue::Group(items) = self {
            Some(items)
        } else {
            None
        }
    }
}

/// Result of `get_all`.
#[derive(Debug, Clone)]
pub enum AllRows {
    /// Row-major: one entry per row.
    Rows(Vec<FetchedRow>),
    /// Column-major: each column's values across all rows.
    Flipped(IndexMap<ColumnKey, Vec<RowValues>>),
}

impl AllRows {
    #[must_use]
    pub fn rows(&self) -> Option<&[FetchedRow]> {
        if let AllRows::Rows(rows) = self {
            Some(rows)
        } else {
            None
        }
    }

    #[must_use]
    pub fn columns(&self) -> Option<&IndexMap<ColumnKey, Vec<RowValues>>> {
        if let AllRows::Flipped(columns) = self {
            Some(columns)
        } else {
            None
        }
    }
}
