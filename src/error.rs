use std::fmt;

use thiserror::Error;

/// Backend-independent error codes.
///
/// Every driver maps its own native codes onto this set; the integer values are stable so they
/// can be logged or compared across processes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    Error,
    Syntax,
    Constraint,
    NotFound,
    AlreadyExists,
    Unsupported,
    Mismatch,
    Invalid,
    NotCapable,
    Truncated,
    InvalidNumber,
    InvalidDate,
    DivZero,
    NoDbSelected,
    CannotCreate,
    CannotDrop,
    NoSuchTable,
    NoSuchField,
    NeedMoreData,
    NotLocked,
    ValueCountOnRow,
    InvalidDsn,
    ConnectFailed,
    ExtensionNotFound,
    AccessViolation,
    NoSuchDb,
    ConstraintNotNull,
    PossibleUnintendedConsequences,
}

impl ErrorCode {
    #[must_use]
    pub fn as_i32(self) -> i32 {
        match self {
            ErrorCode::Error => -1,
            ErrorCode::Syntax => -2,
            ErrorCode::Constraint => -3,
            ErrorCode::NotFound => -4,
            ErrorCode::AlreadyExists => -5,
            ErrorCode::Unsupported => -6,
            ErrorCode::Mismatch => -7,
            ErrorCode::Invalid => -8,
            ErrorCode::NotCapable => -9,
            ErrorCode::Truncated => -10,
            ErrorCode::InvalidNumber => -11,
            ErrorCode::InvalidDate => -12,
            ErrorCode::DivZero => -13,
            ErrorCode::NoDbSelected => -14,
            ErrorCode::CannotCreate => -15,
            ErrorCode::CannotDrop => -17,
            ErrorCode::NoSuchTable => -18,
            ErrorCode::NoSuchField => -19,
            ErrorCode::NeedMoreData => -20,
            ErrorCode::NotLocked => -21,
            ErrorCode::ValueCountOnRow => -22,
            ErrorCode::InvalidDsn => -23,
            ErrorCode::ConnectFailed => -24,
            ErrorCode::ExtensionNotFound => -25,
            ErrorCode::AccessViolation => -26,
            ErrorCode::NoSuchDb => -27,
            ErrorCode::ConstraintNotNull => -29,
            ErrorCode::PossibleUnintendedConsequences => -30,
        }
    }

    /// Human readable message for the code.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Error => "unknown error",
            ErrorCode::Syntax => "syntax error",
            ErrorCode::Constraint => "constraint violation",
            ErrorCode::NotFound => "not found",
            ErrorCode::AlreadyExists => "already exists",
            ErrorCode::Unsupported => "not supported",
            ErrorCode::Mismatch => "mismatch",
            ErrorCode::Invalid => "invalid",
            ErrorCode::NotCapable => "DB backend not capable",
            ErrorCode::Truncated => "truncated",
            ErrorCode::InvalidNumber => "invalid number",
            ErrorCode::InvalidDate => "invalid date or time",
            ErrorCode::DivZero => "division by zero",
            ErrorCode::NoDbSelected => "no database selected",
            ErrorCode::CannotCreate => "can not create",
            ErrorCode::CannotDrop => "can not drop",
            ErrorCode::NoSuchTable => "no such table",
            ErrorCode::NoSuchField => "no such field",
            ErrorCode::NeedMoreData => "insufficient data supplied",
            ErrorCode::NotLocked => "not locked",
            ErrorCode::ValueCountOnRow => "value count on row",
            ErrorCode::InvalidDsn => "invalid DSN",
            ErrorCode::ConnectFailed => "connect failed",
            ErrorCode::ExtensionNotFound => "extension not found",
            ErrorCode::AccessViolation => "insufficient permissions",
            ErrorCode::NoSuchDb => "no such database",
            ErrorCode::ConstraintNotNull => "null value violates not-null constraint",
            ErrorCode::PossibleUnintendedConsequences => "possible unintended consequences",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// An error as reported by the backend, before translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeError {
    pub code: i32,
    pub message: String,
}

impl NativeError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ** {}", self.code, self.message.trim())
    }
}

/// A driver's table from native codes to portable ones.
///
/// Lookups never fail: codes missing from the table degrade to [`ErrorCode::Error`].
#[derive(Debug, Clone, Copy)]
pub struct NativeCodeMap {
    entries: &'static [(i32, ErrorCode)],
}

impl NativeCodeMap {
    #[must_use]
    pub const fn new(entries: &'static [(i32, ErrorCode)]) -> Self {
        Self { entries }
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    #[must_use]
    pub fn get(&self, native: i32) -> Option<ErrorCode> {
        self.entries
            .iter()
            .find(|(code, _)| *code == native)
            .map(|(_, portable)| *portable)
    }

    #[must_use]
    pub fn lookup(&self, native: i32) -> ErrorCode {
        self.get(native).unwrap_or(ErrorCode::Error)
    }
}

/// The crate's error value: a portable code plus diagnostic context.
#[derive(Debug, Clone, Error)]
#[error("DB Error: {message}")]
pub struct SqlPortableError {
    code: ErrorCode,
    message: String,
    user_info: Option<String>,
    native: Option<NativeError>,
}

impl SqlPortableError {
    #[must_use]
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.message().to_string(),
            user_info: None,
            native: None,
        }
    }

    #[must_use]
    pub fn with_user_info(mut self, user_info: impl Into<String>) -> Self {
        self.user_info = Some(user_info.into());
        self
    }

    #[must_use]
    pub fn with_native(mut self, native: NativeError) -> Self {
        self.native = Some(native);
        self
    }

    /// Shorthand for an error whose diagnostic text is given directly.
    pub fn with_info(code: ErrorCode, user_info: impl Into<String>) -> Self {
        Self::new(code).with_user_info(user_info)
    }

    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn user_info(&self) -> Option<&str> {
        self.user_info.as_deref()
    }

    #[must_use]
    pub fn native(&self) -> Option<&NativeError> {
        self.native.as_ref()
    }

    #[must_use]
    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }
}

impl From<std::io::Error> for SqlPortableError {
    fn from(err: std::io::Error) -> Self {
        SqlPortableError::with_info(ErrorCode::AccessViolation, err.to_string())
    }
}

/// Either a fresh code or an error that was already built upstream.
///
/// `Connection::raise_error` passes the latter through untouched.
#[derive(Debug, Clone)]
pub enum ErrorSource {
    Code(ErrorCode),
    Prior(SqlPortableError),
}

impl From<ErrorCode> for ErrorSource {
    fn from(code: ErrorCode) -> Self {
        ErrorSource::Code(code)
    }
}

impl From<SqlPortableError> for ErrorSource {
    fn from(err: SqlPortableError) -> Self {
        ErrorSource::Prior(err)
    }
}
