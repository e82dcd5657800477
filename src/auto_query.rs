//! Generated INSERT/UPDATE text for `auto_prepare` / `auto_execute`.

use std::str::FromStr;

use crate::error::{ErrorCode, SqlPortableError};

/// Which statement `build_manip_sql` emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoQueryMode {
    Insert,
    Update,
}

impl FromStr for AutoQueryMode {
    type Err = SqlPortableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insert" => Ok(AutoQueryMode::Insert),
            "update" => Ok(AutoQueryMode::Update),
            other => Err(SqlPortableError::with_info(
                ErrorCode::Syntax,
                format!("unknown auto query mode {other:?}"),
            )),
        }
    }
}

impl TryFrom<i32> for AutoQueryMode {
    type Error = SqlPortableError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AutoQueryMode::Insert),
            2 => Ok(AutoQueryMode::Update),
            other => Err(SqlPortableError::with_info(
                ErrorCode::Syntax,
                format!("unknown auto query mode {other}"),
            )),
        }
    }
}

/// Build an INSERT or UPDATE with one `?` per field.
///
/// An UPDATE without a WHERE clause is refused unless `allow_unguarded_update` is set.
///
/// # Errors
/// * `NeedMoreData` when `fields` is empty.
/// * `PossibleUnintendedConsequences` for an unguarded UPDATE without the opt-in.
pub fn build_manip_sql<S: AsRef<str>>(
    table: &str,
    fields: &[S],
    mode: AutoQueryMode,
    where_clause: Option<&str>,
    allow_unguarded_update: bool,
) -> Result<String, SqlPortableError> {
    if fields.is_empty() {
        return Err(SqlPortableError::with_info(
            ErrorCode::NeedMoreData,
            format!("no fields given for table {table}"),
        ));
    }

    match mode {
        AutoQueryMode::Insert => {
            let names = fields
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<_>>()
                .join(",");
            let marks = vec!["?"; fields.len()].join(",");
            Ok(format!("INSERT INTO {table} ({names}) VALUES ({marks})"))
        }
        AutoQueryMode::Update => {
            let where_clause = where_clause.map(str::trim).filter(|w| !w.is_empty());
            if where_clause.is_none() && !allow_unguarded_update {
                return Err(SqlPortableError::with_info(
                    ErrorCode::PossibleUnintendedConsequences,
                    format!("UPDATE of {table} without a WHERE clause"),
                ));
            }
            let sets = fields
                .iter()
                .map(|f| format!("{} = ?", f.as_ref()))
                .collect::<Vec<_>>()
                .join(",");
            let mut sql = format!("UPDATE {table} SET {sets}");
            if let Some(clause) = where_clause {
                sql.push_str(" WHERE ");
                sql.push_str(clause);
            }
            Ok(sql)
        }
    }
}
