// SQLite backend
//
// - config: connection options and builder
// - driver: the `Driver` implementation
// - errors: native code tables
// - query: reading rows into a `ResultSet`

pub mod config;
pub mod driver;
mod errors;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use driver::SqliteDriver;
pub use errors::NON_SQLITE_ERROR;
pub use query::build_result_set;
