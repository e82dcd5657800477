use std::fmt;

use super::PreparedStatement;

/// Opaque handle to a prepared statement.
///
/// A handle stays invalid once freed: the slot it pointed at may be reused, but with a new
/// generation, so stale handles never resolve to someone else's statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StmtHandle {
    index: usize,
    generation: u32,
}

impl fmt::Display for StmtHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "stmt#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    statement: Option<PreparedStatement>,
}

/// Arena of live prepared statements for one connection.
#[derive(Debug, Default)]
pub struct StatementRegistry {
    slots: Vec<Slot>,
    free: Vec<usize>,
    live: usize,
}

impl StatementRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `statement` and return its handle.
    pub fn insert(&mut self, statement: PreparedStatement) -> StmtHandle {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.generation = slot.generation.wrapping_add(1);
            slot.statement = Some(statement);
            return StmtHandle {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len();
        self.slots.push(Slot {
            generation: 0,
            statement: Some(statement),
        });
        StmtHandle {
            index,
            generation: 0,
        }
    }

    #[must_use]
    pub fn get(&self, handle: StmtHandle) -> Option<&PreparedStatement> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.statement.as_ref())
    }

    /// Drop the statement behind `handle`. Returns `false` for unknown or already-freed handles.
    pub fn remove(&mut self, handle: StmtHandle) -> bool {
        let Some(slot) = self.slots.get_mut(handle.index) else {
            return false;
        };
        if slot.generation != handle.generation || slot.statement.is_none() {
            return false;
        }
        slot.statement = None;
        self.free.push(handle.index);
        self.live -= 1;
        true
    }

    /// Number of live statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}
