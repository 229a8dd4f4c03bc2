//! Persistent decision trace.
//!
//! Each search node extends its parent's trace by one entry. The trace is a
//! singly linked list of shared cells, so siblings share the common prefix
//! and never observe each other's entries.

use std::rc::Rc;

use crate::timeline::TraceEntry;

#[derive(Debug)]
struct Cell {
    entry: TraceEntry,
    prev: Option<Rc<Cell>>,
}

/// Immutable, structurally shared list of trace entries.
#[derive(Debug, Clone, Default)]
pub(crate) struct PathTrace {
    head: Option<Rc<Cell>>,
    len: usize,
}

impl PathTrace {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Returns a trace with `entry` appended. `self` is unchanged.
    pub(crate) fn push(&self, entry: TraceEntry) -> Self {
        Self {
            head: Some(Rc::new(Cell {
                entry,
                prev: self.head.clone(),
            })),
            len: self.len + 1,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Entries from first to last.
    pub(crate) fn to_vec(&self) -> Vec<TraceEntry> {
        let mut entries = Vec::with_capacity(self.len);
        let mut cursor = self.head.as_deref();
        while let Some(cell) = cursor {
            entries.push(cell.entry);
            cursor = cell.prev.as_deref();
        }
        entries.reverse();
        entries
    }
}
