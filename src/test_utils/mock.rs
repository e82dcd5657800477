use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::driver::{Driver, QueryContext, RawOutcome};
use crate::error::{ErrorCode, NativeCodeMap, NativeError, SqlPortableError};
use crate::fetch::{FetchedRow, RowShape};
use crate::results::{Cursor, CustomDbRow, ResultSet};

/// Native codes understood by [`MockDriver`].
pub static MOCK_CODES: NativeCodeMap = NativeCodeMap::new(&[
    (1, ErrorCode::Syntax),
    (2, ErrorCode::NoSuchTable),
    (3, ErrorCode::Constraint),
    (4, ErrorCode::AlreadyExists),
]);

static MOCK_PORTABLE_CODES: NativeCodeMap = NativeCodeMap::new(&[(4, ErrorCode::Constraint)]);

/// One scripted backend response.
#[derive(Debug, Clone)]
pub enum Scripted {
    Rows(ResultSet),
    /// Serve `fail_after` rows, then fail with `error`.
    FailingRows {
        set: ResultSet,
        fail_after: usize,
        error: NativeError,
    },
    Manip,
    Fail(NativeError),
}

/// A driver that replays scripted responses and records every statement it receives.
///
/// An exhausted script answers with [`RawOutcome::Manip`]. Its cursors cannot count rows, so
/// `num_rows` depends on the `NUMROWS` portability flag.
#[derive(Debug, Default)]
pub struct MockDriver {
    script: VecDeque<Scripted>,
    executed: Vec<String>,
    contexts: Vec<QueryContext>,
    releases: Rc<Cell<usize>>,
}

impl MockDriver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    #[must_use]
    pub fn with(mut self, response: Scripted) -> Self {
        self.script.push_back(response);
        self
    }

    pub fn push(&mut self, response: Scripted) {
        self.script.push_back(response);
    }

    /// Statements received, in order.
    #[must_use]
    pub fn executed(&self) -> &[String] {
        &self.executed
    }

    #[must_use]
    pub fn contexts(&self) -> &[QueryContext] {
        &self.contexts
    }

    /// Shared count of cursors released so far.
    #[must_use]
    pub fn release_counter(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.releases)
    }
}

impl Driver for MockDriver {
    type Cursor = MockCursor;

    fn backend_name(&self) -> &'static str {
        "mock"
    }

    fn run_raw_query(
        &mut self,
        sql: &str,
        ctx: QueryContext,
    ) -> Result<RawOutcome<MockCursor>, NativeError> {
        self.executed.push(sql.to_string());
        self.contexts.push(ctx);
        let releases = Rc::clone(&self.releases);
        match self.script.pop_front() {
            None | Some(Scripted::Manip) => Ok(RawOutcome::Manip),
            Some(Scripted::Fail(err)) => Err(err),
            Some(Scripted::Rows(set)) => Ok(RawOutcome::Rows(MockCursor::new(set, None, releases))),
            Some(Scripted::FailingRows {
                set,
                fail_after,
                error,
            }) => Ok(RawOutcome::Rows(MockCursor::new(
                set,
                Some((fail_after, error)),
                releases,
            ))),
        }
    }

    fn native_code_map(&self) -> NativeCodeMap {
        MOCK_CODES
    }

    fn portable_code_overrides(&self) -> NativeCodeMap {
        MOCK_PORTABLE_CODES
    }
}

/// Cursor over scripted rows.
#[derive(Debug)]
pub struct MockCursor {
    rows: std::vec::IntoIter<CustomDbRow>,
    column_count: usize,
    fail: Option<(usize, NativeError)>,
    served: usize,
    releases: Rc<Cell<usize>>,
    released: bool,
}

impl MockCursor {
    fn new(set: ResultSet, fail: Option<(usize, NativeError)>, releases: Rc<Cell<usize>>) -> Self {
        Self {
            column_count: set.column_names().len(),
            rows: set.results.into_iter(),
            fail,
            served: 0,
            releases,
            released: false,
        }
    }
}

impl Cursor for MockCursor {
    fn fetch_row(&mut self, shape: RowShape) -> Result<Option<FetchedRow>, SqlPortableError> {
        if let Some((after, err)) = &self.fail
            && self.served >= *after
        {
            return Err(
                SqlPortableError::new(MOCK_CODES.lookup(err.code)).with_native(err.clone())
            );
        }
        let next = self.rows.next();
        if next.is_some() {
            self.served += 1;
        }
        Ok(next.map(|row| FetchedRow::from_object(row, shape)))
    }

    fn column_count(&self) -> Result<usize, SqlPortableError> {
        Ok(self.column_count)
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.releases.set(self.releases.get() + 1);
        }
    }
}
