//! Character formatting, case and list-marker handling.
//!
//! Toggles and size steps read the style at the selection start and apply
//! the result uniformly to the whole selection. A mixed selection therefore
//! converges to the inverse of its first character's state.

use super::DispatchResult;
use crate::lists::{self, ListKind};
use core_state::{EditorError, EditorState, Result};
use core_text::{Color, Decoration, Style, StyleDelta, StyleMode};

/// Smallest size `shrink` goes down to.
pub(crate) const MIN_FONT_SIZE: u16 = 2;
pub(crate) const FONT_SIZE_STEP: u16 = 2;

fn restyle(state: &mut EditorState, delta: &StyleDelta, mode: StyleMode) -> Result<DispatchResult> {
    let sel = state.require_selection()?;
    state.transact(|tx| tx.set_style(sel.start, sel.len(), delta, mode))?;
    Ok(DispatchResult::dirty())
}

fn style_at_selection(state: &EditorState) -> Result<Style> {
    let sel = state.require_selection()?;
    Ok(state.document().style_at(sel.start)?)
}

pub(crate) fn toggle_decoration(state: &mut EditorState, flag: Decoration) -> Result<DispatchResult> {
    let on = !style_at_selection(state)?.has(flag);
    tracing::debug!(target: "actions.dispatch", ?flag, on, "toggle_decoration");
    restyle(state, &StyleDelta::new().flag(flag, on), StyleMode::Merge)
}

pub(crate) fn set_font_family(state: &mut EditorState, family: String) -> Result<DispatchResult> {
    restyle(state, &StyleDelta::new().font_family(family), StyleMode::Merge)
}

pub(crate) fn set_font_size(state: &mut EditorState, size: u16) -> Result<DispatchResult> {
    restyle(state, &StyleDelta::new().font_size(size), StyleMode::Merge)
}

/// Grow or shrink by two points from the size at the selection start.
pub(crate) fn step_font_size(state: &mut EditorState, grow: bool) -> Result<DispatchResult> {
    let current = style_at_selection(state)?.font_size;
    let size = if grow {
        current.saturating_add(FONT_SIZE_STEP)
    } else {
        current.saturating_sub(FONT_SIZE_STEP).max(MIN_FONT_SIZE)
    };
    set_font_size(state, size)
}

pub(crate) fn foreground(state: &mut EditorState, color: Color) -> Result<DispatchResult> {
    restyle(state, &StyleDelta::new().foreground(color), StyleMode::Merge)
}

/// Selection background; with nothing selected, the page background.
pub(crate) fn background(state: &mut EditorState, color: Color) -> Result<DispatchResult> {
    if state.selection().is_empty() {
        state.page_background = color;
        tracing::debug!(target: "actions.dispatch", %color, "page_background");
        return Ok(DispatchResult::dirty());
    }
    fill(state, color)
}

pub(crate) fn fill(state: &mut EditorState, color: Color) -> Result<DispatchResult> {
    restyle(state, &StyleDelta::new().background(color), StyleMode::Merge)
}

pub(crate) fn clear_formatting(state: &mut EditorState) -> Result<DispatchResult> {
    restyle(state, &StyleDelta::new(), StyleMode::Replace)
}

pub(crate) fn copy_format(state: &mut EditorState) -> Result<DispatchResult> {
    let style = style_at_selection(state)?;
    state.copied_format = Some(style);
    Ok(DispatchResult::clean().with_notification("Format copied"))
}

pub(crate) fn apply_format(state: &mut EditorState) -> Result<DispatchResult> {
    let style = state
        .copied_format
        .clone()
        .ok_or(EditorError::NoFormatCopied)?;
    Ok(restyle(state, &StyleDelta::from_style(&style), StyleMode::Merge)?
        .with_notification("Format applied"))
}

/// Swap the selection to lower case if it is all upper case, else to upper
/// case. The replacement takes the style of the selection start and stays
/// selected.
pub(crate) fn toggle_case(state: &mut EditorState) -> Result<DispatchResult> {
    let text = state.selected_text();
    let upper = text.to_uppercase();
    let replacement = if text == upper {
        text.to_lowercase()
    } else {
        upper
    };
    replace_selection(state, &replacement)
}

pub(crate) fn toggle_list(state: &mut EditorState, kind: ListKind) -> Result<DispatchResult> {
    let block = state.selected_text();
    let rebuilt = lists::toggle(kind, &block);
    tracing::debug!(target: "actions.dispatch", ?kind, lines = rebuilt.lines().count(), "toggle_list");
    replace_selection(state, &rebuilt)
}

/// Delete the selection and insert `text` in the style of its first char,
/// as one undo step; the new text is selected afterwards.
fn replace_selection(state: &mut EditorState, text: &str) -> Result<DispatchResult> {
    let sel = state.require_selection()?;
    let style = state.document().style_at(sel.start)?;
    state.transact(|tx| {
        tx.delete(sel.start, sel.len())?;
        tx.insert(sel.start, text, Some(&style))
    })?;
    state.set_selection(sel.start, sel.start + text.chars().count())?;
    Ok(DispatchResult::dirty())
}

/// Black/white page swap: a black page becomes white and anything else
/// black; white text becomes black and anything else white.
pub(crate) fn toggle_theme(state: &mut EditorState) -> Result<DispatchResult> {
    state.page_background = if state.page_background == Color::BLACK {
        Color::WHITE
    } else {
        Color::BLACK
    };
    state.page_foreground = if state.page_foreground == Color::WHITE {
        Color::BLACK
    } else {
        Color::WHITE
    };
    let dark = state.page_background == Color::BLACK;
    Ok(DispatchResult::dirty().with_notification(if dark { "Dark theme" } else { "Light theme" }))
}
