//! High-level editor model: the open documents (tabs) and pagination.
//!
//! Invariants (must hold after every public call):
//! * `tabs` is never empty;
//! * `active < tabs.len()`.
//!
//! Closing the last remaining tab does not remove it; the tab is reset to an
//! empty, unnamed document instead.

use core_state::{EditorError, EditorState};
use core_text::{Document, Style};
use tracing::debug;

mod page;
pub use page::PageMetrics;

pub struct EditorModel {
    tabs: Vec<EditorState>,
    active: usize,
    default_style: Style,
    page: PageMetrics,
}

impl EditorModel {
    /// Model with one empty tab.
    pub fn new(default_style: Style, page: PageMetrics) -> Self {
        let first = EditorState::new(default_style.clone());
        Self::with_state(first, default_style, page)
    }

    /// Model whose first tab is `state`.
    pub fn with_state(state: EditorState, default_style: Style, page: PageMetrics) -> Self {
        Self {
            tabs: vec![state],
            active: 0,
            default_style,
            page,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.tabs[self.active]
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.tabs[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn tab_count(&self) -> usize {
        self.tabs.len()
    }

    pub fn default_style(&self) -> &Style {
        &self.default_style
    }

    pub fn page_metrics(&self) -> PageMetrics {
        self.page
    }

    /// Display names of all tabs, in order.
    pub fn tab_titles(&self) -> Vec<String> {
        self.tabs.iter().map(tab_title).collect()
    }

    /// Fresh empty document in the default style.
    pub fn blank_document(&self) -> Document {
        Document::new(self.default_style.clone())
    }

    /// True if tab `index` exists and has unsaved text changes.
    pub fn tab_is_modified(&self, index: usize) -> bool {
        self.tabs.get(index).is_some_and(|t| t.dirty)
    }

    /// Append `state` as a new tab and make it active.
    pub fn open_tab(&mut self, state: EditorState) -> usize {
        self.tabs.push(state);
        self.active = self.tabs.len() - 1;
        debug!(target: "model.tabs", active = self.active, count = self.tabs.len(), "open_tab");
        self.active
    }

    /// Append an empty tab and make it active.
    pub fn new_tab(&mut self) -> usize {
        let state = EditorState::new(self.default_style.clone());
        self.open_tab(state)
    }

    pub fn switch_to(&mut self, index: usize) -> Result<(), EditorError> {
        self.check(index)?;
        self.active = index;
        debug!(target: "model.tabs", active = index, "switch_tab");
        Ok(())
    }

    /// Close tab `index`. The last remaining tab is reset instead of removed.
    pub fn close_tab(&mut self, index: usize) -> Result<(), EditorError> {
        self.check(index)?;
        if self.tabs.len() == 1 {
            self.tabs[0] = EditorState::new(self.default_style.clone());
            debug!(target: "model.tabs", "last_tab_reset");
            return Ok(());
        }
        self.tabs.remove(index);
        if self.active > index || self.active == self.tabs.len() {
            self.active = self.active.saturating_sub(1);
        }
        debug!(target: "model.tabs", active = self.active, count = self.tabs.len(), "close_tab");
        Ok(())
    }

    fn check(&self, index: usize) -> Result<(), EditorError> {
        if index < self.tabs.len() {
            Ok(())
        } else {
            Err(EditorError::NoSuchTab {
                index,
                count: self.tabs.len(),
            })
        }
    }

    fn font_size(&self) -> u16 {
        self.state().document().default_style().font_size
    }

    /// 1-based page holding the caret of the active tab.
    pub fn current_page(&self) -> usize {
        let st = self.state();
        let line = st.document().char_to_line(st.caret());
        self.page.page_of_line(line, self.font_size())
    }

    /// Number of pages the active document spans.
    pub fn page_count(&self) -> usize {
        let lines = self.state().document().line_count();
        self.page
            .page_of_line(lines.saturating_sub(1), self.font_size())
    }

    /// One-line status: statistics followed by the page indicator.
    pub fn status_line(&self) -> String {
        let st = self.state();
        let mut line = format!(
            "{} | Page {}/{}",
            st.statistics(),
            self.current_page(),
            self.page_count()
        );
        if st.dirty {
            line.push_str(" | modified");
        }
        line
    }
}

fn tab_title(state: &EditorState) -> String {
    state
        .file_name
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_string())
}
