//! Literal find / find-next / find-previous over a document, plus
//! whole-word replace.
//!
//! Offsets are char indices, matching `core_text::Document`. Searching is a
//! plain left-to-right substring scan; there is no regex or case folding.

use core_text::TextError;
use thiserror::Error;
use tracing::debug;

pub mod replace;

pub use replace::{replace_matches, replace_whole_word, whole_word_matches};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    #[error("text not found")]
    NotFound,
    #[error("no active search; run find first")]
    NoActiveSearch,
    #[error(transparent)]
    Text(#[from] TextError),
}

/// One occurrence of the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub offset: usize,
    pub len: usize,
}

impl Match {
    pub fn end(&self) -> usize {
        self.offset + self.len
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightKind {
    AllMatches,
    Current,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub range: Match,
    pub kind: HighlightKind,
}

/// Position of the find cursor between navigation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchCursor {
    /// Next search starts at offset 0; previous finds nothing.
    #[default]
    BeforeStart,
    /// Last successful match started here.
    At(usize),
    /// Previous search starts from the end; next finds nothing.
    AfterEnd,
}

/// Non-overlapping left-to-right occurrences of `needle` in `hay`.
pub fn find_all(hay: &[char], needle: &[char]) -> Vec<Match> {
    let n = needle.len();
    let mut out = Vec::new();
    if n == 0 {
        return out;
    }
    let mut pos = 0usize;
    while let Some(found) = index_of(hay, needle, pos) {
        out.push(Match { offset: found, len: n });
        pos = found + n;
    }
    out
}

/// First occurrence starting at or after `from`.
pub(crate) fn index_of(hay: &[char], needle: &[char], from: usize) -> Option<usize> {
    let n = needle.len();
    if n == 0 || n > hay.len() {
        return None;
    }
    (from..=hay.len() - n).find(|&i| hay[i..i + n] == *needle)
}

/// Last occurrence starting at or before `upto`.
pub(crate) fn last_index_of(hay: &[char], needle: &[char], upto: usize) -> Option<usize> {
    let n = needle.len();
    if n == 0 || n > hay.len() {
        return None;
    }
    let hi = upto.min(hay.len() - n);
    (0..=hi).rev().find(|&i| hay[i..i + n] == *needle)
}

/// Query, match set and navigation cursor for one document.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    query: Option<String>,
    matches: Vec<Match>,
    current: Option<Match>,
    cursor: SearchCursor,
    stale: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    pub fn current(&self) -> Option<Match> {
        self.current
    }

    pub fn cursor(&self) -> SearchCursor {
        self.cursor
    }

    /// Record a new query over `text`, collect every match and move to the
    /// first one. An empty query is rejected with `NotFound`.
    pub fn search(&mut self, text: &str, query: &str) -> Result<Match, SearchError> {
        if query.is_empty() {
            return Err(SearchError::NotFound);
        }
        let hay: Vec<char> = text.chars().collect();
        let needle: Vec<char> = query.chars().collect();
        self.query = Some(query.to_string());
        self.matches = find_all(&hay, &needle);
        self.current = None;
        self.cursor = SearchCursor::BeforeStart;
        self.stale = false;
        debug!(target: "search", query_len = needle.len(), matches = self.matches.len(), "search");
        self.step_next(&hay, &needle)
    }

    /// Move to the nearest occurrence strictly after the last match.
    pub fn find_next(&mut self, text: &str) -> Result<Match, SearchError> {
        let needle = self.active_needle()?;
        let hay: Vec<char> = text.chars().collect();
        self.refresh(&hay, &needle);
        self.step_next(&hay, &needle)
    }

    /// Move to the nearest occurrence strictly before the last match.
    pub fn find_previous(&mut self, text: &str) -> Result<Match, SearchError> {
        let needle = self.active_needle()?;
        let hay: Vec<char> = text.chars().collect();
        self.refresh(&hay, &needle);
        let upto = match self.cursor {
            SearchCursor::BeforeStart | SearchCursor::At(0) => None,
            SearchCursor::At(i) => Some(i - 1),
            SearchCursor::AfterEnd => hay.len().checked_sub(1),
        };
        match upto.and_then(|u| last_index_of(&hay, &needle, u)) {
            Some(offset) => Ok(self.land(offset, needle.len())),
            None => {
                self.current = None;
                self.cursor = SearchCursor::AfterEnd;
                debug!(target: "search", "find_previous_exhausted");
                Err(SearchError::NotFound)
            }
        }
    }

    /// Drop matches and the cursor after a text change; the query stays so
    /// the next navigation re-scans the new text.
    pub fn invalidate(&mut self) {
        if self.query.is_none() {
            return;
        }
        self.matches.clear();
        self.current = None;
        self.cursor = SearchCursor::BeforeStart;
        self.stale = true;
    }

    /// Forget everything, including the query.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Ranges to paint: every match, with the current one marked `Current`.
    pub fn highlights(&self) -> Vec<Highlight> {
        self.matches
            .iter()
            .map(|m| Highlight {
                range: *m,
                kind: if Some(*m) == self.current {
                    HighlightKind::Current
                } else {
                    HighlightKind::AllMatches
                },
            })
            .chain(
                self.current
                    .filter(|c| !self.matches.contains(c))
                    .map(|c| Highlight {
                        range: c,
                        kind: HighlightKind::Current,
                    }),
            )
            .collect()
    }

    fn active_needle(&self) -> Result<Vec<char>, SearchError> {
        match self.query.as_deref() {
            Some(q) if !q.is_empty() => Ok(q.chars().collect()),
            _ => Err(SearchError::NoActiveSearch),
        }
    }

    fn refresh(&mut self, hay: &[char], needle: &[char]) {
        if self.stale {
            self.matches = find_all(hay, needle);
            self.stale = false;
        }
    }

    fn step_next(&mut self, hay: &[char], needle: &[char]) -> Result<Match, SearchError> {
        let from = match self.cursor {
            SearchCursor::BeforeStart => Some(0),
            SearchCursor::At(i) => Some(i + 1),
            SearchCursor::AfterEnd => None,
        };
        match from.and_then(|f| index_of(hay, needle, f)) {
            Some(offset) => Ok(self.land(offset, needle.len())),
            None => {
                self.current = None;
                self.cursor = SearchCursor::BeforeStart;
                debug!(target: "search", "find_next_exhausted");
                Err(SearchError::NotFound)
            }
        }
    }

    fn land(&mut self, offset: usize, len: usize) -> Match {
        let m = Match { offset, len };
        self.current = Some(m);
        self.cursor = SearchCursor::At(offset);
        m
    }
}
