//! Dispatcher applying `Action` to the editor model.
//!
//! Submodules group the handlers by concern:
//! * `edit`   - typing, deletion, selection, caret, clipboard, go-to-line
//! * `format` - character styling, case, list markers, page theme
//! * `search` - find, find next/previous, whole-word replace
//! * `file`   - new, open, save, save-as, auto-save
//! * `tabs`   - open, close and switch documents
//! * `undo`   - undo / redo
//!
//! Handlers return `core_state::Result`. Errors stop here: `dispatch` logs
//! them and turns them into the notification of an otherwise clean result,
//! so no failure reaches the event loop.

use std::time::Duration;

use core_model::EditorModel;

use crate::{Action, COMMANDS};

mod edit;
mod file;
mod format;
mod search;
mod tabs;
mod undo;

/// How long a notification stays in the state's ephemeral status slot.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Result of dispatching a single `Action`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchResult {
    /// Something visible changed and a view should repaint.
    pub dirty: bool,
    pub quit: bool,
    /// The active document was swapped (new/open/tab change); cached layout
    /// for the previous document is invalid.
    pub buffer_replaced: bool,
    /// Message for the user, success or failure.
    pub notification: Option<String>,
}

impl DispatchResult {
    pub fn dirty() -> Self {
        Self {
            dirty: true,
            ..Self::default()
        }
    }
    pub fn clean() -> Self {
        Self::default()
    }
    pub fn quit() -> Self {
        Self {
            dirty: true,
            quit: true,
            ..Self::default()
        }
    }
    pub fn buffer_replaced() -> Self {
        Self {
            dirty: true,
            buffer_replaced: true,
            ..Self::default()
        }
    }

    pub fn with_notification(mut self, msg: impl Into<String>) -> Self {
        self.notification = Some(msg.into());
        self
    }
}

/// Apply an action to the active document (or the tab list).
pub fn dispatch(action: Action, model: &mut EditorModel) -> DispatchResult {
    let edit = action.is_edit();
    let name = action.name();
    tracing::trace!(target: "actions.dispatch", action = name, edit, "dispatch");
    let outcome = match action {
        Action::InsertText(text) => edit::insert_text(model.state_mut(), &text),
        Action::DeleteNext => edit::delete_next(model.state_mut()),
        Action::Backspace => edit::backspace(model.state_mut()),
        Action::SelectAll => edit::select_all(model.state_mut()),
        Action::Select { start, end } => edit::select(model.state_mut(), start, end),
        Action::MoveCaret(offset) => edit::move_caret(model.state_mut(), offset),
        Action::GoToLine(raw) => edit::go_to_line(model.state_mut(), &raw),
        Action::InsertDateTime => edit::insert_date_time(model.state_mut()),
        Action::Cut => edit::cut(model.state_mut()),
        Action::Copy => edit::copy(model.state_mut()),
        Action::Paste => edit::paste(model.state_mut()),

        Action::ToggleDecoration(flag) => format::toggle_decoration(model.state_mut(), flag),
        Action::SetFontFamily(family) => format::set_font_family(model.state_mut(), family),
        Action::SetFontSize(size) => format::set_font_size(model.state_mut(), size),
        Action::IncreaseFontSize => format::step_font_size(model.state_mut(), true),
        Action::DecreaseFontSize => format::step_font_size(model.state_mut(), false),
        Action::Foreground(color) => format::foreground(model.state_mut(), color),
        Action::Background(color) => format::background(model.state_mut(), color),
        Action::BackgroundFill(color) => format::fill(model.state_mut(), color),
        Action::ClearFormatting => format::clear_formatting(model.state_mut()),
        Action::CopyFormat => format::copy_format(model.state_mut()),
        Action::ApplyFormat => format::apply_format(model.state_mut()),
        Action::ToggleCase => format::toggle_case(model.state_mut()),
        Action::ToggleList(kind) => format::toggle_list(model.state_mut(), kind),
        Action::ToggleTheme => format::toggle_theme(model.state_mut()),

        Action::Find(query) => search::find(model.state_mut(), &query),
        Action::FindNext => search::find_next(model.state_mut()),
        Action::FindPrevious => search::find_previous(model.state_mut()),
        Action::Replace { find, replacement } => {
            search::replace(model.state_mut(), &find, &replacement)
        }

        Action::Undo => undo::handle_undo(model.state_mut()),
        Action::Redo => undo::handle_redo(model.state_mut()),

        Action::NewFile => file::new_file(model),
        Action::Open(path) => file::open(model, &path),
        Action::Save => file::save(model.state_mut(), None),
        Action::SaveAs(path) => file::save(model.state_mut(), Some(&path)),
        Action::AutoSave => file::autosave(model.state_mut()),

        Action::NewTab => tabs::new_tab(model),
        Action::CloseTab(index) => tabs::close_tab(model, index),
        Action::SwitchTab(index) => tabs::switch_tab(model, index),
        Action::ListTabs => Ok(tabs::list_tabs(model)),

        Action::Help => Ok(DispatchResult::clean().with_notification(help_text())),
        Action::Quit => Ok(DispatchResult::quit()),
    };
    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            tracing::warn!(target: "actions.dispatch", action = name, error = %e, "action_failed");
            DispatchResult::clean().with_notification(e.to_string())
        }
    };
    if let Some(msg) = &result.notification {
        model
            .state_mut()
            .set_ephemeral(msg.clone(), NOTIFICATION_TTL);
    }
    result
}

fn help_text() -> String {
    COMMANDS
        .iter()
        .map(|c| format!("{:<30} {}", c.usage, c.summary))
        .collect::<Vec<_>>()
        .join("\n")
}
