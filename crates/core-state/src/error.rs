//! Editor error taxonomy.

use std::path::PathBuf;

use core_search::SearchError;
use core_text::TextError;
use thiserror::Error;

/// Failures surfaced by editor operations. The dispatcher turns every one of
/// these into a notification; none are fatal.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Offset or length outside the document.
    #[error(transparent)]
    OutOfRange(#[from] TextError),

    /// Go-to-line target outside `1..=line_count`.
    #[error("line {line} is out of range (1..={line_count})")]
    LineOutOfRange { line: usize, line_count: usize },

    /// `index` is 0-based; the message numbers tabs from 1.
    #[error("no tab {} (open tabs: {count})", .index + 1)]
    NoSuchTab { index: usize, count: usize },

    /// File open or save failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input that does not parse (line numbers, colors, arguments)
    #[error("cannot parse `{input}`: {reason}")]
    ParseFailure { input: String, reason: String },

    #[error("text not found")]
    NotFound,

    #[error("no text selected")]
    NoSelection,

    #[error("no active search; use find first")]
    NoActiveSearch,

    #[error("no file name; use save-as <path>")]
    NoFileName,

    #[error("no format copied")]
    NoFormatCopied,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,
}

impl EditorError {
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        EditorError::ParseFailure {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EditorError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<SearchError> for EditorError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::NotFound => EditorError::NotFound,
            SearchError::NoActiveSearch => EditorError::NoActiveSearch,
            SearchError::Text(e) => EditorError::OutOfRange(e),
        }
    }
}
