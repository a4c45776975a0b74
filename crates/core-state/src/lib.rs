//! Editor state: one rich-text document together with its selection, caret,
//! undo history, search state and file metadata.
//!
//! Every document mutation goes through [`EditorState::transact`]. A
//! transaction collects the [`Edit`] records produced by its steps; on
//! success they are recorded as one undo entry, on failure they are rolled
//! back so the document is left exactly as it was.
//!
//! Side effects of a committed transaction:
//! - text changes invalidate the search (matches dropped, query kept) and
//!   mark the state dirty; pure restyling does neither, since formatting is
//!   never written to disk;
//! - selection and caret are clamped to the new document length.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use core_search::SearchState;
use core_text::{Color, Document, Edit, Run, Statistics, Style, StyleDelta, StyleMode};
use tracing::{debug, trace};

pub mod error;
mod line_ending;
pub mod undo;

pub use error::EditorError;
pub use line_ending::{LineEnding, NormalizedText, expand_line_endings, normalize_line_endings};
pub use undo::UndoEngine;

pub type Result<T> = std::result::Result<T, EditorError>;

/// Ordered selection, `start <= end`. Empty when both are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn caret(offset: usize) -> Self {
        Self::new(offset, offset)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    fn clamp(self, len: usize) -> Self {
        Self::new(self.start.min(len), self.end.min(len))
    }
}

/// Text clipboard contents: the copied text and the runs that styled it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardEntry {
    pub text: String,
    pub runs: Vec<Run>,
}

/// Status message that disappears after its deadline.
#[derive(Debug, Clone)]
pub struct EphemeralMessage {
    pub text: String,
    pub expires_at: Instant,
}

/// Document mutation scope handed to [`EditorState::transact`].
pub struct Transaction<'a> {
    doc: &'a mut Document,
    edits: Vec<Edit>,
}

impl Transaction<'_> {
    pub fn doc(&self) -> &Document {
        self.doc
    }

    pub fn insert(&mut self, offset: usize, text: &str, style: Option<&Style>) -> Result<()> {
        let edit = self.doc.insert(offset, text, style)?;
        self.edits.push(edit);
        Ok(())
    }

    pub fn insert_styled(&mut self, offset: usize, text: &str, runs: &[Run]) -> Result<()> {
        let edit = self.doc.insert_styled(offset, text, runs)?;
        self.edits.push(edit);
        Ok(())
    }

    pub fn delete(&mut self, offset: usize, len: usize) -> Result<()> {
        let edit = self.doc.delete(offset, len)?;
        self.edits.push(edit);
        Ok(())
    }

    pub fn set_style(
        &mut self,
        offset: usize,
        len: usize,
        delta: &StyleDelta,
        mode: StyleMode,
    ) -> Result<()> {
        let edit = self.doc.set_style(offset, len, delta, mode)?;
        self.edits.push(edit);
        Ok(())
    }

    /// Record an edit produced outside the transaction helpers.
    pub fn push(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Mutable document access for helpers that return their own [`Edit`];
    /// callers must hand the result to [`Transaction::push`].
    pub fn doc_mut(&mut self) -> &mut Document {
        self.doc
    }
}

pub struct EditorState {
    document: Document,
    selection: Selection,
    caret: usize,
    undo: UndoEngine,
    pub search: SearchState,
    pub file_name: Option<PathBuf>,
    pub dirty: bool,
    pub clipboard: Option<ClipboardEntry>,
    pub copied_format: Option<Style>,
    pub page_background: Color,
    pub page_foreground: Color,
    pub ephemeral_status: Option<EphemeralMessage>,
    pub original_line_ending: LineEnding,
}

impl EditorState {
    /// Empty, unnamed document in `default_style`.
    pub fn new(default_style: Style) -> Self {
        Self::with_document(Document::new(default_style))
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document,
            selection: Selection::default(),
            caret: 0,
            undo: UndoEngine::new(),
            search: SearchState::new(),
            file_name: None,
            dirty: false,
            clipboard: None,
            copied_format: None,
            page_background: Color::WHITE,
            page_foreground: Color::BLACK,
            ephemeral_status: None,
            original_line_ending: LineEnding::Lf,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.undo.redo_depth()
    }

    pub fn statistics(&self) -> Statistics {
        Statistics::compute(&self.document.text())
    }

    /// The current selection, or `NoSelection` when it is empty.
    pub fn require_selection(&self) -> Result<Selection> {
        if self.selection.is_empty() {
            Err(EditorError::NoSelection)
        } else {
            Ok(self.selection)
        }
    }

    pub fn selected_text(&self) -> String {
        self.document
            .get_text(self.selection.start, self.selection.len())
            .unwrap_or_default()
    }

    /// Select `[start, end)` (either order). The caret moves to the end.
    pub fn set_selection(&mut self, start: usize, end: usize) -> Result<()> {
        let sel = Selection::new(start, end);
        self.document.get_text(sel.start, sel.len())?;
        self.selection = sel;
        self.caret = sel.end;
        trace!(target: "state.selection", start = sel.start, end = sel.end, "set_selection");
        Ok(())
    }

    /// Move the caret and collapse the selection onto it.
    pub fn set_caret(&mut self, offset: usize) -> Result<()> {
        self.set_selection(offset, offset)
    }

    pub fn select_all(&mut self) {
        self.selection = Selection::new(0, self.document.len_chars());
        self.caret = self.selection.end;
    }

    /// Run `f` as one undoable unit.
    pub fn transact<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Transaction<'_>) -> Result<T>,
    {
        let mut tx = Transaction {
            doc: &mut self.document,
            edits: Vec::new(),
        };
        let outcome = f(&mut tx);
        let edits = tx.edits;
        match outcome {
            Ok(value) => {
                self.commit(edits);
                Ok(value)
            }
            Err(e) => {
                for edit in edits.iter().rev() {
                    if let Err(rollback) = edit.inverse().apply(&mut self.document) {
                        tracing::error!(target: "state.undo", ?rollback, "rollback_failed");
                    }
                }
                debug!(target: "state.undo", error = %e, steps = edits.len(), "transaction_rolled_back");
                Err(e)
            }
        }
    }

    fn commit(&mut self, mut edits: Vec<Edit>) {
        let edit = if edits.len() == 1 {
            edits.remove(0)
        } else {
            Edit::Group(edits)
        };
        self.after_change(&edit);
        self.undo.record(edit);
    }

    fn after_change(&mut self, edit: &Edit) {
        if edit.touches_text() {
            self.search.invalidate();
            self.dirty = true;
        }
        let len = self.document.len_chars();
        self.selection = self.selection.clamp(len);
        self.caret = self.caret.min(len);
    }

    pub fn undo(&mut self) -> Result<()> {
        let Some(edit) = self.undo.undo(&mut self.document)? else {
            return Err(EditorError::NothingToUndo);
        };
        let edit = edit.clone();
        self.after_change(&edit);
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        let Some(edit) = self.undo.redo(&mut self.document)? else {
            return Err(EditorError::NothingToRedo);
        };
        let edit = edit.clone();
        self.after_change(&edit);
        Ok(())
    }

    /// Swap in a fresh document (new file / open file). History, search and
    /// selection are cleared; the state is clean afterwards.
    pub fn replace_document(&mut self, document: Document, file_name: Option<PathBuf>) {
        self.document = document;
        self.file_name = file_name;
        self.undo.clear();
        self.search.clear();
        self.selection = Selection::default();
        self.caret = 0;
        self.dirty = false;
        self.original_line_ending = LineEnding::Lf;
    }

    /// Set an ephemeral status message with a fixed timeout duration.
    pub fn set_ephemeral<S: Into<String>>(&mut self, msg: S, ttl: Duration) {
        self.ephemeral_status = Some(EphemeralMessage {
            text: msg.into(),
            expires_at: Instant::now() + ttl,
        });
    }

    /// Drop the ephemeral message once expired; true if one was cleared.
    pub fn tick_ephemeral(&mut self) -> bool {
        if let Some(m) = &self.ephemeral_status
            && Instant::now() >= m.expires_at
        {
            self.ephemeral_status = None;
            return true;
        }
        false
    }
}
