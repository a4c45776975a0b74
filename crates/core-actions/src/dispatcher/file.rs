//! File commands: new, open, save, save-as and the auto-save hook.
//!
//! Manual save, `Ctrl+S` and the auto-save timer all end in
//! [`io_ops::write_file`](crate::io_ops::write_file).

use std::path::Path;

use super::DispatchResult;
use crate::io_ops::{self, WriteOutcome};
use core_model::EditorModel;
use core_state::{EditorState, Result};

pub(crate) fn new_file(model: &mut EditorModel) -> Result<DispatchResult> {
    let blank = model.blank_document();
    model.state_mut().replace_document(blank, None);
    tracing::info!(target: "io", tab = model.active_index(), "new_document");
    Ok(DispatchResult::buffer_replaced().with_notification("New document"))
}

pub(crate) fn open(model: &mut EditorModel, path: &Path) -> Result<DispatchResult> {
    let loaded = io_ops::open_file(path, model.default_style())?;
    let mixed = loaded.mixed_line_endings;
    loaded.install(model.state_mut());
    let mut msg = format!("Opened {}", path.display());
    if mixed {
        msg.push_str(" (mixed line endings normalized)");
    }
    Ok(DispatchResult::buffer_replaced().with_notification(msg))
}

/// Save to `target`, or to the current file when `None`.
pub(crate) fn save(state: &mut EditorState, target: Option<&Path>) -> Result<DispatchResult> {
    let path = io_ops::write_file(state, target)?;
    Ok(DispatchResult::dirty().with_notification(format!("Saved {}", path.display())))
}

pub(crate) fn autosave(state: &mut EditorState) -> Result<DispatchResult> {
    match io_ops::autosave(state)? {
        WriteOutcome::Written(path) => {
            Ok(DispatchResult::dirty().with_notification(format!("Auto-saved {}", path.display())))
        }
        WriteOutcome::Skipped => Ok(DispatchResult::clean()),
    }
}
