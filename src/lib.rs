//! Portable SQL access over pluggable drivers.
//!
//! A [`Connection`] wraps one [`Driver`] and adds emulated prepared statements with `?`, `!`
//! and `&` placeholders, auto-built INSERT/UPDATE statements, fetch-mode retrieval helpers and
//! backend-independent error codes.

pub mod prelude;

mod auto_query;
mod binder;
mod classifier;
pub mod connection;
pub mod driver;
pub mod error;
pub mod fetch;
pub mod options;
pub mod portability;
pub mod quoting;
pub mod results;
pub mod statement;
pub mod types;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use auto_query::{AutoQueryMode, build_manip_sql};
pub use binder::compile as compile_statement;
pub use classifier::{force_delete_count, is_manip};
pub use connection::{Connection, Executed};
pub use driver::{Driver, DriverError, QueryContext, RawOutcome};
pub use error::{ErrorCode, ErrorSource, NativeCodeMap, NativeError, SqlPortableError};
pub use fetch::{AllRows, AssocValue, ColumnKey, ColumnRef, FetchMode, FetchedRow, RowShape};
pub use options::{OptionValue, Options};
pub use portability::Portability;
pub use results::{BufferedCursor, Cursor, CustomDbRow, DbResult, ResultSet};
pub use statement::{PlaceholderKind, PreparedStatement, StatementRegistry, StmtHandle, tokenize};
pub use types::RowValues;
