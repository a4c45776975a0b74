//! Find and replace handling.
//!
//! A successful find moves the caret to the start of the current match.
//! Navigation never wraps; the notification reports where the match sits
//! among all highlighted matches.

use super::DispatchResult;
use core_search::{Match, replace_whole_word, whole_word_matches};
use core_state::{EditorState, Result};

fn land(state: &mut EditorState, m: Match) -> Result<DispatchResult> {
    state.set_caret(m.offset)?;
    let total = state.search.matches().len();
    let position = state
        .search
        .matches()
        .iter()
        .position(|x| *x == m)
        .map(|i| format!("Match {} of {total}", i + 1))
        // overlapping occurrences found by stepping are not highlighted
        .unwrap_or_else(|| format!("Match at {}", m.offset));
    Ok(DispatchResult::dirty().with_notification(position))
}

pub(crate) fn find(state: &mut EditorState, query: &str) -> Result<DispatchResult> {
    let text = state.document().text();
    let m = state.search.search(&text, query)?;
    land(state, m)
}

pub(crate) fn find_next(state: &mut EditorState) -> Result<DispatchResult> {
    let text = state.document().text();
    let m = state.search.find_next(&text)?;
    land(state, m)
}

pub(crate) fn find_previous(state: &mut EditorState) -> Result<DispatchResult> {
    let text = state.document().text();
    let m = state.search.find_previous(&text)?;
    land(state, m)
}

/// Whole-word replace of every occurrence, as one undo step.
pub(crate) fn replace(
    state: &mut EditorState,
    find: &str,
    replacement: &str,
) -> Result<DispatchResult> {
    let count = whole_word_matches(&state.document().text(), find).len();
    state.transact(|tx| {
        let edit = replace_whole_word(tx.doc_mut(), find, replacement)?;
        tx.push(edit);
        Ok(())
    })?;
    let noun = if count == 1 { "occurrence" } else { "occurrences" };
    Ok(DispatchResult::dirty().with_notification(format!("Replaced {count} {noun}")))
}
