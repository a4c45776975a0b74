//! Editor actions: the `Action` vocabulary, the command table that produces
//! actions from command lines, key chords and menu entries, and the
//! dispatcher that applies them to an [`EditorModel`](core_model::EditorModel).
//!
//! Every input path resolves to a command name first and then to the same
//! `Action`, so `Ctrl+S`, `menu File Save`, `save` and the auto-save timer all
//! end up in one save routine.

use std::path::PathBuf;

use core_text::{Color, Decoration};

pub mod commands;
pub mod dispatcher;
pub mod io_ops;
pub mod lists;

pub use commands::{
    COMMANDS, CONTEXT_MENU, CommandSpec, KEY_BINDINGS, MENUS, Menu, MenuItem, action_for_key,
    parse_command, resolve_input, resolve_key,
};
pub use dispatcher::{DispatchResult, dispatch};
pub use lists::ListKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Editing
    InsertText(String),
    DeleteNext,
    Backspace,
    SelectAll,
    Select { start: usize, end: usize },
    MoveCaret(usize),
    /// Raw user input; parsed when dispatched.
    GoToLine(String),
    InsertDateTime,
    Cut,
    Copy,
    Paste,

    // Formatting
    ToggleDecoration(Decoration),
    SetFontFamily(String),
    SetFontSize(u16),
    IncreaseFontSize,
    DecreaseFontSize,
    Foreground(Color),
    /// Selection background, or the page background with no selection.
    Background(Color),
    /// Selection background only.
    BackgroundFill(Color),
    ClearFormatting,
    CopyFormat,
    ApplyFormat,
    ToggleCase,
    ToggleList(ListKind),
    ToggleTheme,

    // Search
    Find(String),
    FindNext,
    FindPrevious,
    Replace { find: String, replacement: String },

    // History
    Undo,
    Redo,

    // Files
    NewFile,
    Open(PathBuf),
    Save,
    SaveAs(PathBuf),
    /// Timer-driven save; silent when there is nothing to do.
    AutoSave,

    // Tabs (indices are 0-based here)
    NewTab,
    CloseTab(Option<usize>),
    SwitchTab(usize),
    ListTabs,

    Help,
    Quit,
}

impl Action {
    /// Command name of this action, for logs. Carries no user text.
    pub fn name(&self) -> &'static str {
        match self {
            Action::InsertText(_) => "insert",
            Action::DeleteNext => "delete",
            Action::Backspace => "backspace",
            Action::SelectAll => "select-all",
            Action::Select { .. } => "select",
            Action::MoveCaret(_) => "caret",
            Action::GoToLine(_) => "goto",
            Action::InsertDateTime => "datetime",
            Action::Cut => "cut",
            Action::Copy => "copy",
            Action::Paste => "paste",
            Action::ToggleDecoration(_) => "toggle-decoration",
            Action::SetFontFamily(_) => "font",
            Action::SetFontSize(_) => "size",
            Action::IncreaseFontSize => "grow",
            Action::DecreaseFontSize => "shrink",
            Action::Foreground(_) => "color",
            Action::Background(_) => "background",
            Action::BackgroundFill(_) => "fill",
            Action::ClearFormatting => "clear-format",
            Action::CopyFormat => "copy-format",
            Action::ApplyFormat => "apply-format",
            Action::ToggleCase => "toggle-case",
            Action::ToggleList(_) => "toggle-list",
            Action::ToggleTheme => "theme",
            Action::Find(_) => "find",
            Action::FindNext => "find-next",
            Action::FindPrevious => "find-previous",
            Action::Replace { .. } => "replace",
            Action::Undo => "undo",
            Action::Redo => "redo",
            Action::NewFile => "new",
            Action::Open(_) => "open",
            Action::Save => "save",
            Action::SaveAs(_) => "save-as",
            Action::AutoSave => "autosave",
            Action::NewTab => "new-tab",
            Action::CloseTab(_) => "close-tab",
            Action::SwitchTab(_) => "tab",
            Action::ListTabs => "tabs",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    /// True for actions that may change document text or formatting.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Action::InsertText(_)
                | Action::DeleteNext
                | Action::Backspace
                | Action::InsertDateTime
                | Action::Cut
                | Action::Paste
                | Action::ToggleDecoration(_)
                | Action::SetFontFamily(_)
                | Action::SetFontSize(_)
                | Action::IncreaseFontSize
                | Action::DecreaseFontSize
                | Action::Foreground(_)
                | Action::Background(_)
                | Action::BackgroundFill(_)
                | Action::ClearFormatting
                | Action::ApplyFormat
                | Action::ToggleCase
                | Action::ToggleList(_)
                | Action::Replace { .. }
                | Action::Undo
                | Action::Redo
        )
    }
}
