//! Undo / redo dispatch.

use super::DispatchResult;
use core_state::{EditorState, Result};

pub(crate) fn handle_undo(state: &mut EditorState) -> Result<DispatchResult> {
    state.undo()?;
    tracing::trace!(target: "actions.dispatch", op = "undo", undo = state.undo_depth(), redo = state.redo_depth(), "history");
    Ok(DispatchResult::dirty())
}

pub(crate) fn handle_redo(state: &mut EditorState) -> Result<DispatchResult> {
    state.redo()?;
    tracing::trace!(target: "actions.dispatch", op = "redo", undo = state.undo_depth(), redo = state.redo_depth(), "history");
    Ok(DispatchResult::dirty())
}
