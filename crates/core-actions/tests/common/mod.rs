#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use core_actions::{DispatchResult, dispatch, resolve_input};
use core_model::{EditorModel, PageMetrics};
use core_state::EditorState;
use core_text::{Document, Style};

pub fn model(text: &str) -> EditorModel {
    let state = EditorState::with_document(Document::from_str(text, Style::default()));
    EditorModel::with_state(state, Style::default(), PageMetrics::default())
}

/// Resolve one input line and dispatch it. Lines that fail to resolve come
/// back as a clean result carrying the parse error, the way the binary
/// reports them.
pub fn run(model: &mut EditorModel, line: &str) -> DispatchResult {
    match resolve_input(line) {
        Ok(action) => dispatch(action, model),
        Err(e) => DispatchResult::clean().with_notification(e.to_string()),
    }
}

/// Run several lines, returning the last result.
pub fn feed(model: &mut EditorModel, lines: &[&str]) -> DispatchResult {
    let mut last = DispatchResult::clean();
    for line in lines {
        last = run(model, line);
    }
    last
}

pub fn text(model: &EditorModel) -> String {
    model.state().document().text()
}
