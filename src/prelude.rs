//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::auto_query::AutoQueryMode;
pub use crate::connection::{Connection, Executed};
pub use crate::driver::Driver;
pub use crate::error::{ErrorCode, NativeError, SqlPortableError};
pub use crate::fetch::{AllRows, AssocValue, ColumnKey, ColumnRef, FetchMode, FetchedRow};
pub use crate::options::{OptionValue, Options};
pub use crate::portability::Portability;
pub use crate::results::{CustomDbRow, DbResult};
pub use crate::statement::StmtHandle;
pub use crate::types::RowValues;

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteDriver, SqliteOptions, SqliteOptionsBuilder};
