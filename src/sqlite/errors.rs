use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{ErrorCode, NativeCodeMap, NativeError};

/// Native code for failures that did not come from the SQLite library itself.
pub const NON_SQLITE_ERROR: i32 = -1;

const SQLITE_ERROR: i32 = 1;
const SQLITE_CONSTRAINT: i32 = 19;

/// Primary and extended SQLite result codes.
pub(crate) static SQLITE_CODES: NativeCodeMap = NativeCodeMap::new(&[
    (3, ErrorCode::AccessViolation),    // SQLITE_PERM
    (8, ErrorCode::AccessViolation),    // SQLITE_READONLY
    (12, ErrorCode::NotFound),          // SQLITE_NOTFOUND
    (14, ErrorCode::ConnectFailed),     // SQLITE_CANTOPEN
    (18, ErrorCode::Truncated),         // SQLITE_TOOBIG
    (19, ErrorCode::Constraint),        // SQLITE_CONSTRAINT
    (20, ErrorCode::Mismatch),          // SQLITE_MISMATCH
    (23, ErrorCode::AccessViolation),   // SQLITE_AUTH
    (25, ErrorCode::ValueCountOnRow),   // SQLITE_RANGE
    (26, ErrorCode::ConnectFailed),     // SQLITE_NOTADB
    (1299, ErrorCode::ConstraintNotNull), // SQLITE_CONSTRAINT_NOTNULL
    (1555, ErrorCode::AlreadyExists),   // SQLITE_CONSTRAINT_PRIMARYKEY
    (2067, ErrorCode::AlreadyExists),   // SQLITE_CONSTRAINT_UNIQUE
]);

/// With `Portability::ERRORS`, key violations are reported as constraint errors like on other
/// backends.
pub(crate) static SQLITE_PORTABLE_CODES: NativeCodeMap = NativeCodeMap::new(&[
    (1555, ErrorCode::Constraint),
    (2067, ErrorCode::Constraint),
]);

lazy_static! {
    static ref MESSAGE_CODES: Vec<(Regex, ErrorCode)> = [
        (r"^no such table:", ErrorCode::NoSuchTable),
        (r"^no such column:", ErrorCode::NoSuchField),
        (r"^table .* already exists$", ErrorCode::AlreadyExists),
        (r"^index .* already exists$", ErrorCode::AlreadyExists),
        (r"syntax error", ErrorCode::Syntax),
        (r"^datatype mismatch", ErrorCode::Mismatch),
        (r"(is not unique|UNIQUE constraint failed)", ErrorCode::AlreadyExists),
        (r"(may not be NULL|NOT NULL constraint failed)", ErrorCode::ConstraintNotNull),
        (r"has \d+ columns but \d+ values were supplied", ErrorCode::ValueCountOnRow),
    ]
    .into_iter()
    .map(|(pattern, code)| (Regex::new(pattern).expect("sqlite message pattern is valid"), code))
    .collect();
}

/// Portable code for a SQLite failure.
///
/// Extended codes are tried first, then the primary code; generic `SQLITE_ERROR`s are refined by
/// their message, since SQLite reports most statement problems that way.
pub(crate) fn sqlite_error_code(native: &NativeError, portable_errors: bool) -> ErrorCode {
    if portable_errors && let Some(code) = SQLITE_PORTABLE_CODES.get(native.code) {
        return code;
    }
    if let Some(code) = SQLITE_CODES.get(native.code) {
        return code;
    }

    let primary = native.code & 0xff;
    if primary == SQLITE_ERROR || primary == SQLITE_CONSTRAINT || native.code == NON_SQLITE_ERROR {
        if let Some(code) = message_code(&native.message) {
            return match code {
                ErrorCode::AlreadyExists if portable_errors && primary == SQLITE_CONSTRAINT => {
                    ErrorCode::Constraint
                }
                other => other,
            };
        }
    }
    SQLITE_CODES.lookup(primary)
}

fn message_code(message: &str) -> Option<ErrorCode> {
    MESSAGE_CODES
        .iter()
        .find(|(re, _)| re.is_match(message))
        .map(|(_, code)| *code)
}

/// Flatten a rusqlite error into code + message.
pub(crate) fn native_error(err: rusqlite::Error) -> NativeError {
    match err {
        rusqlite::Error::SqliteFailure(ffi_err, msg) => NativeError::new(
            ffi_err.extended_code,
            msg.unwrap_or_else(|| ffi_err.to_string()),
        ),
        other => NativeError::new(NON_SQLITE_ERROR, other.to_string()),
    }
}
