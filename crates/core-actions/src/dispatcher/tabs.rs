//! Tab management. Indices are 0-based here; the command line numbers tabs
//! from 1.

use super::DispatchResult;
use core_model::EditorModel;
use core_state::Result;

pub(crate) fn new_tab(model: &mut EditorModel) -> Result<DispatchResult> {
    let index = model.new_tab();
    Ok(DispatchResult::buffer_replaced().with_notification(format!("Tab {}", index + 1)))
}

/// Close `index`, or the active tab when `None`. Unsaved changes are
/// discarded; the notification says so.
pub(crate) fn close_tab(model: &mut EditorModel, index: Option<usize>) -> Result<DispatchResult> {
    let index = index.unwrap_or(model.active_index());
    let discarded = model.tab_is_modified(index);
    model.close_tab(index)?;
    let result = DispatchResult::buffer_replaced();
    Ok(if discarded {
        result.with_notification("Closed tab with unsaved changes")
    } else {
        result
    })
}

pub(crate) fn switch_tab(model: &mut EditorModel, index: usize) -> Result<DispatchResult> {
    model.switch_to(index)?;
    Ok(DispatchResult::buffer_replaced())
}

/// One line per tab, the active one marked with `*`.
pub(crate) fn list_tabs(model: &EditorModel) -> DispatchResult {
    let active = model.active_index();
    let lines: Vec<String> = model
        .tab_titles()
        .into_iter()
        .enumerate()
        .map(|(i, title)| {
            let mark = if i == active { '*' } else { ' ' };
            format!("{mark}{} {title}", i + 1)
        })
        .collect();
    DispatchResult::clean().with_notification(lines.join("\n"))
}
