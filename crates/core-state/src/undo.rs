use core_text::{Document, Edit, TextError};
use tracing::trace;

/// Linear undo/redo history of reversible [`Edit`] records.
///
/// Unbounded. Recording a new edit discards everything ahead of the cursor
/// (the redo stack); there is no branching history.
#[derive(Debug, Default)]
pub struct UndoEngine {
    undo_stack: Vec<Edit>,
    redo_stack: Vec<Edit>,
    /// Edits dropped because they changed nothing.
    noops_skipped: u64,
}

impl UndoEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }
    pub fn noops_skipped(&self) -> u64 {
        self.noops_skipped
    }

    pub fn record(&mut self, edit: Edit) {
        if edit.is_noop() {
            self.noops_skipped += 1;
            trace!(target: "state.undo", undo_depth = self.undo_stack.len(), "noop_skip");
            return;
        }
        self.undo_stack.push(edit);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "record");
        if !self.redo_stack.is_empty() {
            self.redo_stack.clear();
            trace!(target: "state.undo", "redo_stack_cleared_on_new_edit");
        }
    }

    /// Revert the most recent edit. `Ok(None)` when there is nothing to undo.
    pub fn undo(&mut self, doc: &mut Document) -> Result<Option<&Edit>, TextError> {
        let Some(last) = self.undo_stack.pop() else {
            return Ok(None);
        };
        if let Err(e) = last.inverse().apply(doc) {
            self.undo_stack.push(last);
            return Err(e);
        }
        self.redo_stack.push(last);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "undo_pop");
        Ok(self.redo_stack.last())
    }

    /// Re-apply the most recently undone edit. `Ok(None)` when there is
    /// nothing to redo.
    pub fn redo(&mut self, doc: &mut Document) -> Result<Option<&Edit>, TextError> {
        let Some(next) = self.redo_stack.pop() else {
            return Ok(None);
        };
        if let Err(e) = next.apply(doc) {
            self.redo_stack.push(next);
            return Err(e);
        }
        self.undo_stack.push(next);
        trace!(target: "state.undo", undo_depth = self.undo_stack.len(), redo_depth = self.redo_stack.len(), "redo_pop");
        Ok(self.undo_stack.last())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        trace!(target: "state.undo", "history_cleared");
    }
}
