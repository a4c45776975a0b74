//! Typing, deletion, selection and clipboard handling.
//!
//! Deletions step over whole grapheme clusters so a caret never lands inside
//! a combined character. Everything that touches text runs in one
//! transaction; replacing a selection is a single undo step.

use super::DispatchResult;
use core_state::{ClipboardEntry, EditorError, EditorState, Result};

/// Date/time stamp inserted by `datetime`, e.g. `07.03.2025 14:05:09`.
pub(crate) const DATE_TIME_FORMAT: &str = "%d.%m.%Y %H:%M:%S";

/// Type `text`: it replaces the selection if there is one, else it goes in
/// at the caret. The caret ends up after the inserted text.
pub(crate) fn insert_text(state: &mut EditorState, text: &str) -> Result<DispatchResult> {
    let sel = state.selection();
    let at = if sel.is_empty() { state.caret() } else { sel.start };
    state.transact(|tx| {
        if !sel.is_empty() {
            tx.delete(sel.start, sel.len())?;
        }
        tx.insert(at, text, None)
    })?;
    let inserted = text.chars().count();
    state.set_caret(at + inserted)?;
    tracing::trace!(target: "actions.dispatch", op = "insert", at, inserted, replaced = sel.len(), "edit");
    Ok(DispatchResult::dirty())
}

/// Delete the selection, or the grapheme after the caret. At the end of the
/// document this fails with `OutOfRange`.
pub(crate) fn delete_next(state: &mut EditorState) -> Result<DispatchResult> {
    let sel = state.selection();
    if !sel.is_empty() {
        return delete_selection(state);
    }
    let caret = state.caret();
    let end = state.document().next_grapheme_boundary(caret);
    // at the end `end == caret`; a 1-char delete reports the range error
    let len = (end - caret).max(1);
    state.transact(|tx| tx.delete(caret, len))?;
    tracing::trace!(target: "actions.dispatch", op = "delete_next", at = caret, len, "edit");
    Ok(DispatchResult::dirty())
}

/// Delete the selection, or the grapheme before the caret. A no-op at the
/// start of the document.
pub(crate) fn backspace(state: &mut EditorState) -> Result<DispatchResult> {
    let sel = state.selection();
    if !sel.is_empty() {
        return delete_selection(state);
    }
    let caret = state.caret();
    if caret == 0 {
        return Ok(DispatchResult::clean());
    }
    let start = state.document().prev_grapheme_boundary(caret);
    state.transact(|tx| tx.delete(start, caret - start))?;
    state.set_caret(start)?;
    tracing::trace!(target: "actions.dispatch", op = "backspace", at = start, len = caret - start, "edit");
    Ok(DispatchResult::dirty())
}

fn delete_selection(state: &mut EditorState) -> Result<DispatchResult> {
    let sel = state.require_selection()?;
    state.transact(|tx| tx.delete(sel.start, sel.len()))?;
    state.set_caret(sel.start)?;
    Ok(DispatchResult::dirty())
}

pub(crate) fn select_all(state: &mut EditorState) -> Result<DispatchResult> {
    state.select_all();
    Ok(DispatchResult::dirty())
}

pub(crate) fn select(state: &mut EditorState, start: usize, end: usize) -> Result<DispatchResult> {
    state.set_selection(start, end)?;
    Ok(DispatchResult::dirty())
}

pub(crate) fn move_caret(state: &mut EditorState, offset: usize) -> Result<DispatchResult> {
    state.set_caret(offset)?;
    Ok(DispatchResult::dirty())
}

/// Move the caret to the start of 1-based line `raw`.
pub(crate) fn go_to_line(state: &mut EditorState, raw: &str) -> Result<DispatchResult> {
    let line: usize = raw
        .trim()
        .parse()
        .map_err(|_| EditorError::parse(raw, "line number expected"))?;
    let line_count = state.document().line_count();
    let offset = line
        .checked_sub(1)
        .and_then(|l| state.document().line_to_char(l))
        .filter(|_| line <= line_count)
        .ok_or(EditorError::LineOutOfRange { line, line_count })?;
    state.set_caret(offset)?;
    Ok(DispatchResult::dirty())
}

/// Insert the local date and time at the caret. The selection is kept out
/// of it; the caret moves past the stamp.
pub(crate) fn insert_date_time(state: &mut EditorState) -> Result<DispatchResult> {
    let stamp = chrono::Local::now().format(DATE_TIME_FORMAT).to_string();
    let at = state.caret();
    state.transact(|tx| tx.insert(at, &stamp, None))?;
    state.set_caret(at + stamp.chars().count())?;
    Ok(DispatchResult::dirty())
}

fn copy_selection(state: &mut EditorState) -> Result<usize> {
    let sel = state.require_selection()?;
    let doc = state.document();
    let entry = ClipboardEntry {
        text: doc.get_text(sel.start, sel.len())?,
        runs: doc.runs_in(sel.start, sel.len())?,
    };
    state.clipboard = Some(entry);
    Ok(sel.len())
}

pub(crate) fn copy(state: &mut EditorState) -> Result<DispatchResult> {
    let n = copy_selection(state)?;
    tracing::trace!(target: "actions.dispatch", op = "copy", chars = n, "clipboard");
    Ok(DispatchResult::clean())
}

pub(crate) fn cut(state: &mut EditorState) -> Result<DispatchResult> {
    copy_selection(state)?;
    delete_selection(state)
}

/// Insert the clipboard text with its original formatting, replacing the
/// selection if any.
pub(crate) fn paste(state: &mut EditorState) -> Result<DispatchResult> {
    let Some(entry) = state.clipboard.clone() else {
        return Ok(DispatchResult::clean().with_notification("clipboard is empty"));
    };
    let sel = state.selection();
    let at = if sel.is_empty() { state.caret() } else { sel.start };
    state.transact(|tx| {
        if !sel.is_empty() {
            tx.delete(sel.start, sel.len())?;
        }
        tx.insert_styled(at, &entry.text, &entry.runs)
    })?;
    state.set_caret(at + entry.text.chars().count())?;
    Ok(DispatchResult::dirty())
}
