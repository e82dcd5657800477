//! Type-aware literal formatting for emulated statements.

use std::fmt::Write;

use crate::types::RowValues;

/// Double every single quote so the text can sit inside a `'...'` literal.
#[must_use]
pub fn escape_simple(text: &str) -> String {
    text.replace('\'', "''")
}

/// Quote an identifier (table, column) with double quotes.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Format a value as an SQL literal using the default escaping.
///
/// ```rust
/// use sql_portable::prelude::*;
/// use sql_portable::quoting::quote_smart;
///
/// assert_eq!(quote_smart(&RowValues::Null), "NULL");
/// assert_eq!(quote_smart(&RowValues::Bool(true)), "1");
/// assert_eq!(quote_smart(&RowValues::Float(3.5)), "'3.5'");
/// assert_eq!(quote_smart(&RowValues::Text("it's".into())), "'it''s'");
/// ```
#[must_use]
pub fn quote_smart(value: &RowValues) -> String {
    quote_smart_with(value, escape_simple)
}

/// Format a value as an SQL literal, delegating string escaping to `escape`.
///
/// Drivers with their own escaping rules route through here so numbers, booleans and NULL are
/// formatted identically across backends.
pub fn quote_smart_with<F>(value: &RowValues, escape: F) -> String
where
    F: Fn(&str) -> String,
{
    match value {
        RowValues::Int(i) => i.to_string(),
        // Rust never localizes float output, so the decimal separator is always '.'.
        RowValues::Float(f) => format!("'{}'", escape(&format_float(*f))),
        RowValues::Bool(b) => if *b { "1" } else { "0" }.to_string(),
        RowValues::Null => "NULL".to_string(),
        RowValues::Text(s) => format!("'{}'", escape(s)),
        RowValues::Timestamp(dt) => format!("'{}'", dt.format("%Y-%m-%d %H:%M:%S%.f")),
        RowValues::JSON(json) => format!("'{}'", escape(&json.to_string())),
        RowValues::Blob(bytes) => hex_literal(bytes),
    }
}

fn format_float(f: f64) -> String {
    if f.is_finite() {
        f.to_string()
    } else {
        // NaN/inf have no SQL literal; keep the text so the backend reports the error.
        format!("{f}")
    }
}

fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 3);
    out.push_str("X'");
    for b in bytes {
        let _ = write!(out, "{b:02X}");
    }
    out.push('\'');
    out
}
