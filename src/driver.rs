//! The contract a backend implements to sit under a [`Connection`](crate::Connection).

use crate::error::{ErrorCode, NativeCodeMap, NativeError};
use crate::quoting;
use crate::results::Cursor;
use crate::types::RowValues;

/// Per-dispatch facts the driver may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryContext {
    /// The classifier judged the statement to be data or schema manipulation.
    pub is_manip: bool,
    /// The `result_buffering` option: how many rows the driver should buffer at a time.
    pub buffering: i64,
}

/// What the backend did with a statement.
#[derive(Debug)]
pub enum RawOutcome<C> {
    Rows(C),
    Manip,
}

/// Failure from an optional driver capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// The backend has no such feature.
    NotCapable(&'static str),
    Native(NativeError),
}

impl From<NativeError> for DriverError {
    fn from(err: NativeError) -> Self {
        DriverError::Native(err)
    }
}

/// A backend.
///
/// Only `run_raw_query` and `native_code_map` are required. Everything else has a base
/// implementation that concrete drivers override where the backend differs; optional
/// capabilities default to [`DriverError::NotCapable`].
pub trait Driver {
    type Cursor: Cursor;

    /// Short backend name used in logs.
    fn backend_name(&self) -> &'static str;

    /// Run literal SQL.
    ///
    /// # Errors
    /// Returns the backend's native error.
    fn run_raw_query(
        &mut self,
        sql: &str,
        ctx: QueryContext,
    ) -> Result<RawOutcome<Self::Cursor>, NativeError>;

    /// Native-code table for [`Driver::error_code`].
    fn native_code_map(&self) -> NativeCodeMap;

    /// Entries consulted before the main table when the `ERRORS` portability flag is set.
    fn portable_code_overrides(&self) -> NativeCodeMap {
        NativeCodeMap::empty()
    }

    /// Translate a native error. Never fails; unknown codes become [`ErrorCode::Error`].
    fn error_code(&self, native: &NativeError, portable_errors: bool) -> ErrorCode {
        if portable_errors && let Some(code) = self.portable_code_overrides().get(native.code) {
            return code;
        }
        self.native_code_map().lookup(native.code)
    }

    fn escape_simple(&self, text: &str) -> String {
        quoting::escape_simple(text)
    }

    fn quote_identifier(&self, name: &str) -> String {
        quoting::quote_identifier(name)
    }

    fn quote_smart(&self, value: &RowValues) -> String {
        quoting::quote_smart_with(value, |s| self.escape_simple(s))
    }

    /// Restrict `sql` to `count` rows starting at `from`.
    ///
    /// # Errors
    /// Drivers without a limit syntax return `NotCapable`.
    fn modify_limit_query(&self, sql: &str, from: u64, count: u64) -> Result<String, DriverError> {
        Ok(format!("{sql} LIMIT {count} OFFSET {from}"))
    }

    /// Rows changed by the last manipulation statement.
    ///
    /// # Errors
    /// `NotCapable` unless overridden.
    fn affected_rows(&self) -> Result<u64, DriverError> {
        Err(DriverError::NotCapable("affected rows"))
    }

    /// # Errors
    /// `NotCapable` unless overridden.
    fn next_id(&mut self, _seq_name: &str, _on_demand: bool) -> Result<i64, DriverError> {
        Err(DriverError::NotCapable("sequences"))
    }

    /// # Errors
    /// `NotCapable` unless overridden.
    fn create_sequence(&mut self, _seq_name: &str) -> Result<(), DriverError> {
        Err(DriverError::NotCapable("sequences"))
    }

    /// # Errors
    /// `NotCapable` unless overridden.
    fn drop_sequence(&mut self, _seq_name: &str) -> Result<(), DriverError> {
        Err(DriverError::NotCapable("sequences"))
    }

    /// # Errors
    /// `NotCapable` unless overridden.
    fn begin(&mut self) -> Result<(), DriverError> {
        Err(DriverError::NotCapable("transactions"))
    }

    /// # Errors
    /// `NotCapable` unless overridden.
    fn commit(&mut self) -> Result<(), DriverError> {
        Err(DriverError::NotCapable("transactions"))
    }

    /// # Errors
    /// `NotCapable` unless overridden.
    fn rollback(&mut self) -> Result<(), DriverError> {
        Err(DriverError::NotCapable("transactions"))
    }
}
