//! Emulated binding: interleave a statement's fragments with literal values.

use std::path::Path;

use crate::error::{ErrorCode, SqlPortableError};
use crate::statement::{PlaceholderKind, PreparedStatement};
use crate::types::RowValues;

/// Build literal SQL for `stmt` with `values` bound in placeholder order.
///
/// `quote` formats scalar values; connections pass their driver's `quote_smart` so backend
/// escaping rules apply.
///
/// # Errors
/// * `Mismatch` when `values.len()` differs from the placeholder count; the diagnostic text is
///   the statement template.
/// * `AccessViolation` when an opaque placeholder names a file that cannot be read.
pub fn compile<F>(
    stmt: &PreparedStatement,
    values: &[RowValues],
    quote: F,
) -> Result<String, SqlPortableError>
where
    F: Fn(&RowValues) -> String,
{
    if values.len() != stmt.placeholder_count() {
        return Err(SqlPortableError::with_info(
            ErrorCode::Mismatch,
            stmt.template(),
        ));
    }

    let mut sql = String::with_capacity(stmt.template().len() + values.len() * 8);
    for ((fragment, kind), value) in stmt.fragments().iter().zip(stmt.kinds()).zip(values) {
        sql.push_str(fragment);
        match kind {
            PlaceholderKind::Scalar => sql.push_str(&quote(value)),
            PlaceholderKind::Opaque => sql.push_str(&quote(&read_opaque(value)?)),
            PlaceholderKind::Verbatim => sql.push_str(&verbatim(value)),
        }
    }
    if let Some(last) = stmt.fragments().last() {
        sql.push_str(last);
    }
    Ok(sql)
}

/// Load the file named by `value`; valid UTF-8 becomes text, anything else a blob.
fn read_opaque(value: &RowValues) -> Result<RowValues, SqlPortableError> {
    let path = value.to_key_string();
    let bytes = std::fs::read(Path::new(&path)).map_err(|e| {
        SqlPortableError::with_info(
            ErrorCode::AccessViolation,
            format!("could not open file {path}: {e}"),
        )
    })?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => RowValues::Text(text),
        Err(e) => RowValues::Blob(e.into_bytes()),
    })
}

fn verbatim(value: &RowValues) -> String {
    match value {
        RowValues::Null => "NULL".to_string(),
        other => other.to_key_string(),
    }
}
