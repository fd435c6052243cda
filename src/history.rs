//! Undo/redo over whole-document snapshots.
//!
//! The top of the undo stack is always the current document. A gesture or
//! explicit action commits at most one entry; commits equal to the top are
//! dropped, so a gesture with no net effect leaves history untouched. The
//! view zoom takes no part in that comparison.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

use crate::consts::HISTORY_LIMIT;
use crate::doc::Document;

#[derive(Debug, Clone)]
pub struct History {
    undo: Vec<Document>,
    redo: Vec<Document>,
}

impl History {
    /// History seeded with `doc` as its only entry.
    #[must_use]
    pub fn new(doc: &Document) -> Self {
        Self { undo: vec![doc.clone()], redo: Vec::new() }
    }

    /// Forget everything and start over from `doc`.
    pub fn reset(&mut self, doc: &Document) {
        self.undo.clear();
        self.undo.push(doc.clone());
        self.redo.clear();
    }

    /// Record `doc` as the new current state. Returns `false` when it matches
    /// the current top (zoom aside) and nothing was recorded.
    pub fn commit(&mut self, doc: &Document) -> bool {
        if self.undo.last().is_some_and(|top| top.same_content(doc)) {
            return false;
        }
        self.undo.push(doc.clone());
        if self.undo.len() > HISTORY_LIMIT {
            let excess = self.undo.len() - HISTORY_LIMIT;
            self.undo.drain(..excess);
        }
        self.redo.clear();
        true
    }

    /// Step back one entry and return the document to restore.
    pub fn undo(&mut self) -> Option<Document> {
        if self.undo.len() < 2 {
            return None;
        }
        let current = self.undo.pop()?;
        self.redo.push(current);
        self.undo.last().cloned()
    }

    /// Step forward one entry and return the document to restore.
    pub fn redo(&mut self) -> Option<Document> {
        let next = self.redo.pop()?;
        self.undo.push(next.clone());
        Some(next)
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of entries on the undo stack, current state included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    /// Never true: the current state is always recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}
