use rusqlite::Connection as RusqliteConnection;

use super::driver::SqliteDriver;
use super::errors::native_error;
use crate::connection::Connection;
use crate::error::{ErrorCode, SqlPortableError};
use crate::fetch::FetchMode;
use crate::options::{OptionValue, Options};
use crate::portability::Portability;

/// Options for opening a `SQLite` connection.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub options: Options,
    pub fetch_mode: FetchMode,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            options: Options::default(),
            fetch_mode: FetchMode::Ordered,
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// Open the database. See [`SqliteOptionsBuilder::build`].
    ///
    /// # Errors
    /// `ConnectFailed` if the file cannot be opened.
    pub fn build(self) -> Result<Connection<SqliteDriver>, SqlPortableError> {
        Connection::open_sqlite(self)
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn options(mut self, options: Options) -> Self {
        self.opts.options = options;
        self
    }

    /// Set one named option.
    ///
    /// # Errors
    /// See [`Options::set`].
    pub fn option(
        mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<Self, SqlPortableError> {
        self.opts.options.set(name, value.into())?;
        Ok(self)
    }

    #[must_use]
    pub fn portability(mut self, portability: Portability) -> Self {
        self.opts.options.portability = portability;
        self
    }

    #[must_use]
    pub fn seqname_format(mut self, format: impl Into<String>) -> Self {
        self.opts.options.seqname_format = format.into();
        self
    }

    #[must_use]
    pub fn autofree(mut self, autofree: bool) -> Self {
        self.opts.options.autofree = autofree;
        self
    }

    #[must_use]
    pub fn fetch_mode(mut self, mode: FetchMode) -> Self {
        self.opts.fetch_mode = mode;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Open a `Connection` over `SQLite`.
    ///
    /// # Errors
    ///
    /// `ConnectFailed` if the database cannot be opened; `Error` for an invalid fetch mode.
    pub fn build(self) -> Result<Connection<SqliteDriver>, SqlPortableError> {
        Connection::open_sqlite(self.finish())
    }
}

impl Connection<SqliteDriver> {
    #[must_use]
    pub fn sqlite_builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Open `opts.db_path` (`:memory:` for a private in-memory database).
    ///
    /// # Errors
    /// `ConnectFailed` if the database cannot be opened.
    pub fn open_sqlite(opts: SqliteOptions) -> Result<Self, SqlPortableError> {
        let opened = if opts.db_path == ":memory:" {
            RusqliteConnection::open_in_memory()
        } else {
            RusqliteConnection::open(&opts.db_path)
        };
        let raw = opened.map_err(|e| {
            let native = native_error(e);
            SqlPortableError::with_info(
                ErrorCode::ConnectFailed,
                format!("failed to open {}", opts.db_path),
            )
            .with_native(native)
        })?;
        tracing::debug!(db_path = %opts.db_path, "opened sqlite database");

        let mut conn = Connection::with_options(SqliteDriver::new(raw), opts.options);
        conn.set_fetch_mode(opts.fetch_mode)?;
        Ok(conn)
    }
}
