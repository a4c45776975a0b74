//! Whole-word replace.

use core_text::{Document, Edit, TextError};
use tracing::{debug, error};

use crate::{Match, SearchError, index_of};

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Occurrences of `find` not adjacent to an alphanumeric char on either side.
/// One left-to-right pass: an accepted candidate skips its whole length, a
/// rejected one only its first char.
pub fn whole_word_matches(text: &str, find: &str) -> Vec<Match> {
    let hay: Vec<char> = text.chars().collect();
    let needle: Vec<char> = find.chars().collect();
    let n = needle.len();
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(found) = index_of(&hay, &needle, pos) {
        let end = found + n;
        let before_ok = found == 0 || !is_word_char(hay[found - 1]);
        let after_ok = end == hay.len() || !is_word_char(hay[end]);
        if before_ok && after_ok {
            out.push(Match { offset: found, len: n });
            pos = end;
        } else {
            pos = found + 1;
        }
    }
    out
}

/// Replace every whole-word occurrence of `find` with `replacement`.
///
/// Each replacement takes the style of the first char it replaces; text
/// outside the matches keeps its formatting. The returned group undoes the
/// whole operation at once.
pub fn replace_whole_word(
    doc: &mut Document,
    find: &str,
    replacement: &str,
) -> Result<Edit, SearchError> {
    if find.is_empty() {
        return Err(SearchError::NotFound);
    }
    let matches = whole_word_matches(&doc.text(), find);
    if matches.is_empty() {
        return Err(SearchError::NotFound);
    }
    let edit = replace_matches(doc, &matches, replacement)?;
    debug!(target: "search", replaced = matches.len(), "replace_whole_word");
    Ok(edit)
}

/// Replace each of `matches` (ascending, non-overlapping) with `replacement`.
/// All or nothing: if any step fails, the steps already applied are reverted
/// and `doc` is left as it was.
pub fn replace_matches(
    doc: &mut Document,
    matches: &[Match],
    replacement: &str,
) -> Result<Edit, SearchError> {
    let mut edits = Vec::with_capacity(matches.len() * 2);
    // Back to front so earlier offsets stay valid.
    for m in matches.iter().rev() {
        if let Err(e) = replace_one(doc, m, replacement, &mut edits) {
            for edit in edits.iter().rev() {
                if let Err(rollback) = edit.inverse().apply(doc) {
                    error!(target: "search", ?rollback, "replace_rollback_failed");
                }
            }
            debug!(target: "search", error = %e, steps = edits.len(), "replace_rolled_back");
            return Err(e.into());
        }
    }
    Ok(Edit::Group(edits))
}

fn replace_one(
    doc: &mut Document,
    m: &Match,
    replacement: &str,
    edits: &mut Vec<Edit>,
) -> Result<(), TextError> {
    let style = doc.style_at(m.offset)?;
    edits.push(doc.delete(m.offset, m.len)?);
    edits.push(doc.insert(m.offset, replacement, Some(&style))?);
    Ok(())
}
