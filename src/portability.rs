use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::error::{ErrorCode, SqlPortableError};
use crate::types::RowValues;

/// Bit flags smoothing over behavioural differences between backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Portability(u32);

impl Portability {
    pub const NONE: Self = Self(0);
    /// Lowercase column names in associative and object rows.
    pub const LOWERCASE: Self = Self(1);
    /// Right-trim string values.
    pub const RTRIM: Self = Self(2);
    /// Rewrite bare `DELETE FROM t` so the affected count is reported.
    pub const DELETE_COUNT: Self = Self(4);
    /// Make `num_rows` work on cursors that cannot count natively.
    pub const NUMROWS: Self = Self(8);
    /// Use the driver's portable error overrides.
    pub const ERRORS: Self = Self(16);
    /// Turn NULL values into empty strings.
    pub const NULL_TO_EMPTY: Self = Self(32);
    pub const ALL: Self = Self(63);

    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    /// Combine flags by name.
    ///
    /// # Errors
    /// Returns `ErrorCode::Error` for an unrecognized name.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, SqlPortableError> {
        names.iter().try_fold(Self::NONE, |acc, name| {
            let flag = match name.as_ref().trim().to_ascii_lowercase().as_str() {
                "none" => Self::NONE,
                "lowercase" => Self::LOWERCASE,
                "rtrim" => Self::RTRIM,
                "delete_count" => Self::DELETE_COUNT,
                "numrows" => Self::NUMROWS,
                "errors" => Self::ERRORS,
                "null_to_empty" => Self::NULL_TO_EMPTY,
                "all" => Self::ALL,
                other => {
                    return Err(SqlPortableError::with_info(
                        ErrorCode::Error,
                        format!("unknown portability flag {other:?}"),
                    ));
                }
            };
            Ok(acc | flag)
        })
    }
}

impl BitOr for Portability {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Portability {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Apply the value-level transforms enabled in `flags` to one row.
pub fn apply_value_transforms<'a>(
    flags: Portability,
    row: impl IntoIterator<Item = &'a mut RowValues>,
) {
    let rtrim = flags.contains(Portability::RTRIM);
    let null_to_empty = flags.contains(Portability::NULL_TO_EMPTY);
    if !rtrim && !null_to_empty {
        return;
    }
    for value in row {
        if null_to_empty && value.is_null() {
            *value = RowValues::Text(String::new());
        } else if rtrim && let RowValues::Text(s) = value {
            let trimmed = s.trim_end().len();
            s.truncate(trimmed);
        }
    }
}
