//! The per-connection façade: statement registry, options and diagnostics around a driver.

mod admin;
mod execute;
mod retrieval;

pub use execute::Executed;

use std::fmt::Write;

use crate::classifier::ManipTracker;
use crate::driver::{Driver, DriverError};
use crate::error::{ErrorCode, ErrorSource, NativeError, SqlPortableError};
use crate::fetch::FetchMode;
use crate::options::{OptionValue, Options};
use crate::portability::Portability;
use crate::statement::StatementRegistry;
use crate::types::RowValues;

/// A connection to one backend.
///
/// All mutable state (prepared statements, options, last query) lives here, so separate
/// connections never interfere. A single connection is meant for one thread at a time.
///
/// ```rust,no_run
/// use sql_portable::prelude::*;
///
/// # fn demo() -> Result<(), SqlPortableError> {
/// let mut conn = SqliteOptions::new(":memory:".into()).build()?;
/// conn.query("CREATE TABLE t (id INTEGER, name TEXT)", &[])?;
/// conn.query("INSERT INTO t VALUES (?, ?)", &[RowValues::Int(1), "alice".into()])?;
/// let name = conn.get_one("SELECT name FROM t WHERE id = ?", &[RowValues::Int(1)])?;
/// assert_eq!(name, Some(RowValues::Text("alice".into())));
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Connection<D: Driver> {
    driver: D,
    registry: StatementRegistry,
    options: Options,
    fetch_mode: FetchMode,
    manip: ManipTracker,
    allow_unguarded_update: bool,
    last_query: String,
    last_parameters: Vec<RowValues>,
}

impl<D: Driver> Connection<D> {
    pub fn new(driver: D) -> Self {
        Self::with_options(driver, Options::default())
    }

    pub fn with_options(driver: D, options: Options) -> Self {
        Self {
            driver,
            registry: StatementRegistry::new(),
            options,
            fetch_mode: FetchMode::Ordered,
            manip: ManipTracker::default(),
            allow_unguarded_update: false,
            last_query: String::new(),
            last_parameters: Vec::new(),
        }
    }

    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[must_use]
    pub fn into_driver(self) -> D {
        self.driver
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// # Errors
    /// See [`Options::set`].
    pub fn set_option(
        &mut self,
        name: &str,
        value: impl Into<OptionValue>,
    ) -> Result<(), SqlPortableError> {
        self.options.set(name, value.into())
    }

    /// # Errors
    /// See [`Options::get`].
    pub fn get_option(&self, name: &str) -> Result<OptionValue, SqlPortableError> {
        self.options.get(name)
    }

    /// Set the mode used when a call passes `FetchMode::Default`.
    ///
    /// # Errors
    /// `ErrorCode::Error` if `mode` is itself `Default`.
    pub fn set_fetch_mode(&mut self, mode: FetchMode) -> Result<(), SqlPortableError> {
        if mode == FetchMode::Default {
            return Err(SqlPortableError::with_info(
                ErrorCode::Error,
                "invalid fetch mode",
            ));
        }
        self.fetch_mode = mode;
        Ok(())
    }

    #[must_use]
    pub fn fetch_mode(&self) -> FetchMode {
        self.fetch_mode
    }

    /// Allow (or stop allowing) auto-built UPDATEs with no WHERE clause.
    pub fn allow_unguarded_update(&mut self, allow: bool) {
        self.allow_unguarded_update = allow;
    }

    /// Treat the next statement as manipulation regardless of its text.
    pub fn next_query_is_manip(&mut self, manip: bool) {
        self.manip.force_next(manip);
    }

    #[must_use]
    pub fn last_query_was_manip(&self) -> bool {
        self.manip.last_was_manip()
    }

    #[must_use]
    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    #[must_use]
    pub fn last_parameters(&self) -> &[RowValues] {
        &self.last_parameters
    }

    /// Number of prepared statements not yet freed.
    #[must_use]
    pub fn prepared_count(&self) -> usize {
        self.registry.len()
    }

    /// Backend name for a public sequence name.
    #[must_use]
    pub fn get_sequence_name(&self, public_name: &str) -> String {
        self.options.sequence_name(public_name)
    }

    #[must_use]
    pub fn quote_smart(&self, value: &RowValues) -> String {
        self.driver.quote_smart(value)
    }

    #[must_use]
    pub fn quote_identifier(&self, name: &str) -> String {
        self.driver.quote_identifier(name)
    }

    #[must_use]
    pub fn escape_simple(&self, text: &str) -> String {
        self.driver.escape_simple(text)
    }

    /// Translate a native error code through the driver's table.
    #[must_use]
    pub fn error_code(&self, native: &NativeError) -> ErrorCode {
        self.driver.error_code(
            native,
            self.options.portability.contains(Portability::ERRORS),
        )
    }

    /// Build an error carrying the connection's diagnostic context.
    ///
    /// An error that was already built is returned unchanged. Otherwise the diagnostic text is
    /// `user_info` (or the last query), followed by the native error when there is one or the
    /// portable message when not, and the last bound parameters.
    pub fn raise_error(
        &self,
        source: impl Into<ErrorSource>,
        native: Option<NativeError>,
        user_info: Option<&str>,
    ) -> SqlPortableError {
        let code = match source.into() {
            ErrorSource::Prior(err) => return err,
            ErrorSource::Code(code) => code,
        };

        let mut info = user_info.unwrap_or(&self.last_query).to_string();
        let _ = match &native {
            Some(native) => write!(info, " [nativecode={native}]"),
            None => write!(info, " [DB Error: {}]", code.message()),
        };
        if !self.last_parameters.is_empty() {
            let _ = write!(info, " [last parameters: {:?}]", self.last_parameters);
        }

        let err = SqlPortableError::new(code).with_user_info(info);
        match native {
            Some(native) => err.with_native(native),
            None => err,
        }
    }

    pub(crate) fn native_error(&self, native: NativeError) -> SqlPortableError {
        let code = self.error_code(&native);
        tracing::debug!(backend = self.driver.backend_name(), %native, ?code, "backend error");
        self.raise_error(code, Some(native), None)
    }

    pub(crate) fn driver_error(&self, err: DriverError) -> SqlPortableError {
        match err {
            DriverError::NotCapable(what) => self.raise_error(
                ErrorCode::NotCapable,
                None,
                Some(&format!("{} cannot do {what}", self.driver.backend_name())),
            ),
            DriverError::Native(native) => self.native_error(native),
        }
    }
}
