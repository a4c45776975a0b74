//! Reversible edit records.
//!
//! Every mutating [`Document`] call returns an [`Edit`] describing exactly
//! what changed. Applying `edit.inverse()` to the post-edit document restores
//! the pre-edit text and runs; the undo engine stores nothing else.

use crate::runs::Run;
use crate::{Document, TextError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Edit {
    /// `text` (styled by `runs`) was inserted at `offset`.
    Insert {
        offset: usize,
        text: String,
        runs: Vec<Run>,
    },
    /// `text` (styled by `runs`) was removed from `offset`.
    Delete {
        offset: usize,
        text: String,
        runs: Vec<Run>,
    },
    /// Styling starting at `offset` changed from `before` to `after`.
    Restyle {
        offset: usize,
        before: Vec<Run>,
        after: Vec<Run>,
    },
    /// Edits applied in order as one unit.
    Group(Vec<Edit>),
}

impl Edit {
    pub fn inverse(&self) -> Edit {
        match self {
            Edit::Insert { offset, text, runs } => Edit::Delete {
                offset: *offset,
                text: text.clone(),
                runs: runs.clone(),
            },
            Edit::Delete { offset, text, runs } => Edit::Insert {
                offset: *offset,
                text: text.clone(),
                runs: runs.clone(),
            },
            Edit::Restyle {
                offset,
                before,
                after,
            } => Edit::Restyle {
                offset: *offset,
                before: after.clone(),
                after: before.clone(),
            },
            Edit::Group(edits) => Edit::Group(edits.iter().rev().map(Edit::inverse).collect()),
        }
    }

    /// Replay this edit against `doc`.
    pub fn apply(&self, doc: &mut Document) -> Result<(), TextError> {
        match self {
            Edit::Insert { offset, text, runs } => {
                doc.insert_styled(*offset, text, runs)?;
            }
            Edit::Delete { offset, text, .. } => {
                doc.delete(*offset, text.chars().count())?;
            }
            Edit::Restyle { offset, after, .. } => {
                doc.overwrite_runs(*offset, after)?;
            }
            Edit::Group(edits) => {
                for edit in edits {
                    edit.apply(doc)?;
                }
            }
        }
        Ok(())
    }

    /// True when applying the edit changes nothing.
    pub fn is_noop(&self) -> bool {
        match self {
            Edit::Insert { text, .. } | Edit::Delete { text, .. } => text.is_empty(),
            Edit::Restyle { before, after, .. } => before == after,
            Edit::Group(edits) => edits.iter().all(Edit::is_noop),
        }
    }

    /// True when the edit changes document text (not only styling).
    pub fn touches_text(&self) -> bool {
        match self {
            Edit::Insert { text, .. } | Edit::Delete { text, .. } => !text.is_empty(),
            Edit::Restyle { .. } => false,
            Edit::Group(edits) => edits.iter().any(Edit::touches_text),
        }
    }
}
