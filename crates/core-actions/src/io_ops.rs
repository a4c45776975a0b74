//! Plain-text file IO for documents.
//!
//! Only text is read and written; formatting is never persisted. Loading
//! normalizes line endings to `\n` and remembers the original style so that
//! saving can re-expand them.

use std::path::{Path, PathBuf};

use core_state::{EditorError, EditorState, LineEnding, expand_line_endings, normalize_line_endings};
use core_text::{Document, Style};

/// A successfully loaded file, ready to be swapped into an `EditorState`.
pub struct OpenSuccess {
    pub document: Document,
    pub file_name: PathBuf,
    pub original_line_ending: LineEnding,
    pub mixed_line_endings: bool,
}

impl std::fmt::Debug for OpenSuccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenSuccess")
            .field("file_name", &self.file_name)
            .field("chars", &self.document.len_chars())
            .field("original_line_ending", &self.original_line_ending)
            .field("mixed_line_endings", &self.mixed_line_endings)
            .finish()
    }
}

impl OpenSuccess {
    /// Replace `state`'s document with the loaded one.
    pub fn install(self, state: &mut EditorState) {
        state.replace_document(self.document, Some(self.file_name));
        state.original_line_ending = self.original_line_ending;
    }
}

/// Read `path` into a new document in `style`.
pub fn open_file(path: &Path, style: &Style) -> Result<OpenSuccess, EditorError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        tracing::error!(target: "io", path = %path.display(), ?e, "file_open_error");
        EditorError::io(path, e)
    })?;
    let norm = normalize_line_endings(&content);
    if norm.mixed {
        tracing::warn!(target: "io", path = %path.display(), "mixed_line_endings_detected");
    }
    let document = Document::from_str(&norm.normalized, style.clone());
    tracing::info!(target: "io", path = %path.display(), chars = document.len_chars(), "file_opened");
    Ok(OpenSuccess {
        document,
        file_name: path.to_path_buf(),
        original_line_ending: norm.original,
        mixed_line_endings: norm.mixed,
    })
}

/// Outcome of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    /// Auto-save found no file name or no changes.
    Skipped,
}

/// Write the document to `target`, or to the state's file when `None`.
///
/// On success the state is clean and, when a target was given, it becomes the
/// state's file name. Without any path this fails with `NoFileName`.
pub fn write_file(state: &mut EditorState, target: Option<&Path>) -> Result<PathBuf, EditorError> {
    let path = match (target, state.file_name.as_ref()) {
        (Some(p), _) => p.to_path_buf(),
        (None, Some(existing)) => existing.clone(),
        (None, None) => return Err(EditorError::NoFileName),
    };
    let content = expand_line_endings(&state.document().text(), state.original_line_ending);
    std::fs::write(&path, content.as_bytes()).map_err(|e| {
        tracing::error!(target: "io", path = %path.display(), ?e, "file_write_error");
        EditorError::io(&path, e)
    })?;
    state.dirty = false;
    state.file_name = Some(path.clone());
    tracing::info!(target: "io", path = %path.display(), bytes = content.len(), "file_written");
    Ok(path)
}

/// Save path for the auto-save timer: silently skipped when the document
/// has no file or nothing changed since the last save.
pub fn autosave(state: &mut EditorState) -> Result<WriteOutcome, EditorError> {
    if state.file_name.is_none() || !state.dirty {
        tracing::trace!(target: "io", has_file = state.file_name.is_some(), dirty = state.dirty, "autosave_skipped");
        return Ok(WriteOutcome::Skipped);
    }
    write_file(state, None).map(WriteOutcome::Written)
}
