use rusqlite::Connection as RusqliteConnection;

use super::errors::{SQLITE_CODES, SQLITE_PORTABLE_CODES, native_error, sqlite_error_code};
use super::query::build_result_set;
use crate::driver::{Driver, DriverError, QueryContext, RawOutcome};
use crate::error::{ErrorCode, NativeCodeMap, NativeError};
use crate::results::BufferedCursor;

// `result_buffering` only seeds the row buffer; larger values are capped here.
const MAX_PREALLOCATED_ROWS: usize = 1024;

/// Driver over an in-process `rusqlite` connection.
///
/// Row-returning statements are read fully into memory, so cursors can always report their
/// row count. Sequences are emulated with one-column tables.
#[derive(Debug)]
pub struct SqliteDriver {
    conn: RusqliteConnection,
    last_changes: u64,
}

impl SqliteDriver {
    #[must_use]
    pub fn new(conn: RusqliteConnection) -> Self {
        Self {
            conn,
            last_changes: 0,
        }
    }

    /// Borrow the underlying `rusqlite` connection.
    #[must_use]
    pub fn raw(&self) -> &RusqliteConnection {
        &self.conn
    }

    fn execute_batch(&self, sql: &str) -> Result<(), DriverError> {
        self.conn.execute_batch(sql).map_err(|e| native_error(e).into())
    }
}

impl Driver for SqliteDriver {
    type Cursor = BufferedCursor;

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn run_raw_query(
        &mut self,
        sql: &str,
        ctx: QueryContext,
    ) -> Result<RawOutcome<BufferedCursor>, NativeError> {
        let mut stmt = self.conn.prepare(sql).map_err(native_error)?;
        if stmt.column_count() == 0 {
            let changed = stmt.execute([]).map_err(native_error)?;
            self.last_changes = changed as u64;
            return Ok(RawOutcome::Manip);
        }

        let capacity = usize::try_from(ctx.buffering)
            .unwrap_or(0)
            .min(MAX_PREALLOCATED_ROWS);
        let set = build_result_set(&mut stmt, capacity)?;
        if ctx.is_manip {
            self.last_changes = self.conn.changes();
        }
        Ok(RawOutcome::Rows(BufferedCursor::from(set)))
    }

    fn native_code_map(&self) -> NativeCodeMap {
        SQLITE_CODES
    }

    fn portable_code_overrides(&self) -> NativeCodeMap {
        SQLITE_PORTABLE_CODES
    }

    fn error_code(&self, native: &NativeError, portable_errors: bool) -> ErrorCode {
        sqlite_error_code(native, portable_errors)
    }

    fn affected_rows(&self) -> Result<u64, DriverError> {
        Ok(self.last_changes)
    }

    fn next_id(&mut self, seq_name: &str, on_demand: bool) -> Result<i64, DriverError> {
        let insert = format!("INSERT INTO {seq_name} (id) VALUES (NULL)");
        if let Err(err) = self.conn.execute(&insert, []) {
            let native = native_error(err);
            let missing = sqlite_error_code(&native, false) == ErrorCode::NoSuchTable;
            if !(on_demand && missing) {
                return Err(native.into());
            }
            tracing::debug!(seq_name, "creating sequence on demand");
            self.create_sequence(seq_name)?;
            self.conn.execute(&insert, []).map_err(native_error)?;
        }

        let id = self.conn.last_insert_rowid();
        self.conn
            .execute(&format!("DELETE FROM {seq_name} WHERE id < ?1"), [id])
            .map_err(native_error)?;
        Ok(id)
    }

    fn create_sequence(&mut self, seq_name: &str) -> Result<(), DriverError> {
        self.execute_batch(&format!(
            "CREATE TABLE {seq_name} (id INTEGER PRIMARY KEY)"
        ))
    }

    fn drop_sequence(&mut self, seq_name: &str) -> Result<(), DriverError> {
        self.execute_batch(&format!("DROP TABLE {seq_name}"))
    }

    fn begin(&mut self) -> Result<(), DriverError> {
        self.execute_batch("BEGIN")
    }

    fn commit(&mut self) -> Result<(), DriverError> {
        self.execute_batch("COMMIT")
    }

    fn rollback(&mut self) -> Result<(), DriverError> {
        self.execute_batch("ROLLBACK")
    }
}
