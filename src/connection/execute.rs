use crate::auto_query::{AutoQueryMode, build_manip_sql};
use crate::binder;
use crate::classifier::force_delete_count;
use crate::driver::{Driver, QueryContext, RawOutcome};
use crate::error::{ErrorCode, SqlPortableError};
use crate::portability::Portability;
use crate::results::{Cursor, DbResult};
use crate::statement::{StmtHandle, tokenize};
use crate::types::RowValues;

use super::Connection;

/// Outcome of running one statement.
#[derive(Debug)]
pub enum Executed<C: Cursor> {
    /// A row-returning statement; the result owns the cursor.
    Rows(DbResult<C>),
    /// A manipulation statement succeeded.
    Ack,
}

impl<C: Cursor> Executed<C> {
    #[must_use]
    pub fn is_ack(&self) -> bool {
        matches!(self, Executed::Ack)
    }

    #[must_use]
    pub fn into_result(self) -> Option<DbResult<C>> {
        match self {
            Executed::Rows(result) => Some(result),
            Executed::Ack => None,
        }
    }
}

impl<D: Driver> Connection<D> {
    /// Parse `template` and register it.
    ///
    /// `?` binds a quoted value, `!` inlines a value untouched, `&` inlines the quoted contents
    /// of the file the value names. Prefix any of them with `\` to keep it literal.
    pub fn prepare(&mut self, template: &str) -> StmtHandle {
        let stmt = tokenize(template);
        let placeholders = stmt.placeholder_count();
        let handle = self.registry.insert(stmt);
        tracing::debug!(%handle, placeholders, "prepared statement");
        handle
    }

    /// Forget a prepared statement. Returns `false` if `handle` is unknown or already freed.
    ///
    /// Results already produced by the statement own their cursors and are unaffected;
    /// `release_cursor` is accepted for drivers that keep a native statement per handle.
    pub fn free_prepared(&mut self, handle: StmtHandle, release_cursor: bool) -> bool {
        let removed = self.registry.remove(handle);
        tracing::debug!(%handle, removed, release_cursor, "freed statement");
        removed
    }

    /// Bind `values` into the statement behind `handle` and return the literal SQL.
    ///
    /// # Errors
    /// * `Invalid` for an unknown handle.
    /// * `Mismatch` when the value count differs from the placeholder count.
    /// * `AccessViolation` when an opaque placeholder's file cannot be read.
    pub fn compile(
        &self,
        handle: StmtHandle,
        values: &[RowValues],
    ) -> Result<String, SqlPortableError> {
        let stmt = self.registry.get(handle).ok_or_else(|| {
            SqlPortableError::with_info(
                ErrorCode::Invalid,
                format!("unknown statement handle {handle}"),
            )
        })?;
        let driver = &self.driver;
        binder::compile(stmt, values, |v| driver.quote_smart(v))
    }

    /// Run a prepared statement with `values`.
    ///
    /// # Errors
    /// Binding errors from [`Connection::compile`], or the backend's error translated through
    /// the driver's native-code table.
    pub fn execute(
        &mut self,
        handle: StmtHandle,
        values: &[RowValues],
    ) -> Result<Executed<D::Cursor>, SqlPortableError> {
        self.last_parameters = values.to_vec();
        match self.compile(handle, values) {
            Ok(sql) => self.run_sql(sql),
            Err(err) => {
                if let Some(stmt) = self.registry.get(handle) {
                    self.last_query = stmt.template().to_string();
                }
                Err(err)
            }
        }
    }

    /// Run a prepared statement once per value row, in order, stopping at the first error.
    ///
    /// # Errors
    /// The first failing row's error; later rows are not executed.
    pub fn execute_multiple<R: AsRef<[RowValues]>>(
        &mut self,
        handle: StmtHandle,
        rows: &[R],
    ) -> Result<(), SqlPortableError> {
        for values in rows {
            // Results of row-returning statements are released right away.
            self.execute(handle, values.as_ref())?;
        }
        Ok(())
    }

    /// Run `sql`, binding `values` through a temporary prepared statement when there are any.
    ///
    /// # Errors
    /// As for [`Connection::execute`].
    pub fn query(
        &mut self,
        sql: &str,
        values: &[RowValues],
    ) -> Result<Executed<D::Cursor>, SqlPortableError> {
        if values.is_empty() {
            self.last_parameters.clear();
            return self.run_sql(sql.to_string());
        }

        let handle = self.prepare(sql);
        let outcome = self.execute(handle, values);
        self.free_prepared(handle, false);
        outcome
    }

    /// Run `sql` restricted to `count` rows starting at row `from`.
    ///
    /// # Errors
    /// `NotCapable` if the driver has no limit syntax, otherwise as for [`Connection::query`].
    pub fn limit_query(
        &mut self,
        sql: &str,
        from: u64,
        count: u64,
        values: &[RowValues],
    ) -> Result<Executed<D::Cursor>, SqlPortableError> {
        let limited = self
            .driver
            .modify_limit_query(sql, from, count)
            .map_err(|e| self.driver_error(e))?;
        self.query(&limited, values)
    }

    /// Build an INSERT/UPDATE for `fields` on `table` and prepare it.
    ///
    /// # Errors
    /// See [`build_manip_sql`].
    pub fn auto_prepare<S: AsRef<str>>(
        &mut self,
        table: &str,
        fields: &[S],
        mode: AutoQueryMode,
        where_clause: Option<&str>,
    ) -> Result<StmtHandle, SqlPortableError> {
        let sql = build_manip_sql(
            table,
            fields,
            mode,
            where_clause,
            self.allow_unguarded_update,
        )?;
        Ok(self.prepare(&sql))
    }

    /// Build, prepare, run and free an INSERT/UPDATE from field/value pairs.
    ///
    /// # Errors
    /// Builder errors from [`build_manip_sql`], or execution errors.
    pub fn auto_execute<S: AsRef<str>>(
        &mut self,
        table: &str,
        fields_values: &[(S, RowValues)],
        mode: AutoQueryMode,
        where_clause: Option<&str>,
    ) -> Result<Executed<D::Cursor>, SqlPortableError> {
        let fields: Vec<&str> = fields_values.iter().map(|(f, _)| f.as_ref()).collect();
        let values: Vec<RowValues> = fields_values.iter().map(|(_, v)| v.clone()).collect();

        let handle = self.auto_prepare(table, &fields, mode, where_clause)?;
        let outcome = self.execute(handle, &values);
        self.free_prepared(handle, true);
        outcome
    }

    fn run_sql(&mut self, sql: String) -> Result<Executed<D::Cursor>, SqlPortableError> {
        let sql = if self.options.portability.contains(Portability::DELETE_COUNT) {
            force_delete_count(&sql).unwrap_or(sql)
        } else {
            sql
        };
        let is_manip = self.manip.check(&sql);
        self.last_query = sql;

        tracing::debug!(
            backend = self.driver.backend_name(),
            is_manip,
            sql = %self.last_query,
            "dispatching statement"
        );
        if self.options.debug > 0 {
            tracing::info!(sql = %self.last_query, params = ?self.last_parameters, "executing");
        }

        let ctx = QueryContext {
            is_manip,
            buffering: self.options.result_buffering,
        };
        match self.driver.run_raw_query(&self.last_query, ctx) {
            Ok(RawOutcome::Rows(cursor)) => {
                let result = DbResult::new(
                    cursor,
                    self.options.portability,
                    self.options.autofree,
                    self.fetch_mode,
                );
                if is_manip {
                    result.free();
                    Ok(Executed::Ack)
                } else {
                    Ok(Executed::Rows(result))
                }
            }
            Ok(RawOutcome::Manip) => Ok(Executed::Ack),
            Err(native) => Err(self.native_error(native)),
        }
    }
}
