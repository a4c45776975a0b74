//! Rich-text document: rope-backed text with a parallel style-run partition.
//!
//! All offsets are char (Unicode scalar value) indices. Every mutating call
//! validates its range before touching either the rope or the runs, so a
//! failed call leaves the document unchanged.

use ropey::Rope;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

pub mod edit;
pub mod runs;
pub mod stats;
pub mod style;

pub use edit::Edit;
pub use runs::{Run, StyleRuns};
pub use stats::Statistics;
pub use style::{Color, Decoration, ParseColorError, Style, StyleDelta, StyleMode};

/// Longest grapheme cluster we look at when stepping over clusters.
const GRAPHEME_WINDOW: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("range {offset}..{offset}+{len} is outside the document (length {doc_len})")]
    OutOfRange {
        offset: usize,
        len: usize,
        doc_len: usize,
    },
}

#[derive(Clone, Debug)]
pub struct Document {
    rope: Rope,
    runs: StyleRuns,
    default_style: Style,
    /// Bumped on every text change (styling changes leave it alone).
    revision: u64,
}

impl Document {
    /// Empty document whose unset ranges use `default_style`.
    pub fn new(default_style: Style) -> Self {
        Self::from_str("", default_style)
    }

    /// Document holding `content` entirely in `default_style`.
    pub fn from_str(content: &str, default_style: Style) -> Self {
        let rope = Rope::from_str(content);
        let runs = StyleRuns::uniform(rope.len_chars(), default_style.clone());
        Self {
            rope,
            runs,
            default_style,
            revision: 0,
        }
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Full plain text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn default_style(&self) -> &Style {
        &self.default_style
    }

    pub fn runs(&self) -> &[Run] {
        self.runs.as_slice()
    }

    /// Number of lines (a trailing line feed opens an empty final line).
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Char offset of the first char of `line`.
    pub fn line_to_char(&self, line: usize) -> Option<usize> {
        (line < self.rope.len_lines()).then(|| self.rope.line_to_char(line))
    }

    /// Line containing `offset` (clamped to the document).
    pub fn char_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.len_chars()))
    }

    fn check(&self, offset: usize, len: usize) -> Result<(), TextError> {
        let doc_len = self.len_chars();
        match offset.checked_add(len) {
            Some(end) if end <= doc_len => Ok(()),
            _ => Err(TextError::OutOfRange {
                offset,
                len,
                doc_len,
            }),
        }
    }

    pub fn get_text(&self, offset: usize, len: usize) -> Result<String, TextError> {
        self.check(offset, len)?;
        Ok(self.rope.slice(offset..offset + len).to_string())
    }

    /// Effective style at `offset`. At the end of the document this is the
    /// style of the last char (the default style when empty).
    pub fn style_at(&self, offset: usize) -> Result<Style, TextError> {
        self.check(offset, 0)?;
        let style = self
            .runs
            .style_at(offset)
            .or_else(|| self.runs.last_style())
            .unwrap_or(&self.default_style);
        Ok(style.clone())
    }

    /// Runs covering `[offset, offset + len)`.
    pub fn runs_in(&self, offset: usize, len: usize) -> Result<Vec<Run>, TextError> {
        self.check(offset, len)?;
        Ok(self.runs.slice(offset, len))
    }

    /// Style new text takes at `offset` when none is given: the char before
    /// it, else the first char, else the default.
    fn inherited_style(&self, offset: usize) -> Style {
        let neighbor = if offset > 0 {
            self.runs.style_at(offset - 1)
        } else {
            self.runs.style_at(0)
        };
        neighbor.unwrap_or(&self.default_style).clone()
    }

    /// Insert `text` at `offset` in `style` (inherited when `None`).
    pub fn insert(
        &mut self,
        offset: usize,
        text: &str,
        style: Option<&Style>,
    ) -> Result<Edit, TextError> {
        self.check(offset, 0)?;
        let style = style.cloned().unwrap_or_else(|| self.inherited_style(offset));
        let len = text.chars().count();
        let runs = if len == 0 {
            Vec::new()
        } else {
            vec![Run::new(len, style)]
        };
        self.insert_styled(offset, text, &runs)
    }

    /// Insert `text` at `offset` styled by `runs`. When the runs do not cover
    /// the text exactly, the text takes the inherited style instead.
    pub fn insert_styled(
        &mut self,
        offset: usize,
        text: &str,
        runs: &[Run],
    ) -> Result<Edit, TextError> {
        self.check(offset, 0)?;
        let len = text.chars().count();
        let covered: usize = runs.iter().map(|r| r.len).sum();
        let runs = if covered == len {
            runs.to_vec()
        } else {
            vec![Run::new(len, self.inherited_style(offset))]
        };
        if len > 0 {
            self.rope.insert(offset, text);
            self.runs.insert_runs(offset, runs.clone());
            self.revision += 1;
        }
        debug_assert_eq!(self.runs.len(), self.rope.len_chars());
        Ok(Edit::Insert {
            offset,
            text: text.to_string(),
            runs: runs.into_iter().filter(|r| r.len > 0).collect(),
        })
    }

    /// Remove `[offset, offset + len)`.
    pub fn delete(&mut self, offset: usize, len: usize) -> Result<Edit, TextError> {
        self.check(offset, len)?;
        let text = self.rope.slice(offset..offset + len).to_string();
        let runs = self.runs.remove(offset, len);
        if len > 0 {
            self.rope.remove(offset..offset + len);
            self.revision += 1;
        }
        debug_assert_eq!(self.runs.len(), self.rope.len_chars());
        Ok(Edit::Delete { offset, text, runs })
    }

    /// Change the style of `[offset, offset + len)`.
    pub fn set_style(
        &mut self,
        offset: usize,
        len: usize,
        delta: &StyleDelta,
        mode: StyleMode,
    ) -> Result<Edit, TextError> {
        self.check(offset, len)?;
        let default = self.default_style.clone();
        let before = self.runs.restyle(offset, len, |current| match mode {
            StyleMode::Merge => delta.apply_to(current),
            StyleMode::Replace => delta.apply_to(&default),
        });
        let after = self.runs.slice(offset, len);
        Ok(Edit::Restyle {
            offset,
            before,
            after,
        })
    }

    /// Restore styling recorded by an [`Edit::Restyle`].
    pub(crate) fn overwrite_runs(&mut self, offset: usize, runs: &[Run]) -> Result<(), TextError> {
        let len: usize = runs.iter().map(|r| r.len).sum();
        self.check(offset, len)?;
        self.runs.overwrite(offset, runs);
        Ok(())
    }

    /// Offset just past the grapheme cluster starting at `offset`.
    pub fn next_grapheme_boundary(&self, offset: usize) -> usize {
        let len = self.len_chars();
        if offset >= len {
            return len;
        }
        let end = (offset + GRAPHEME_WINDOW).min(len);
        let window = self.rope.slice(offset..end).to_string();
        let step = window
            .graphemes(true)
            .next()
            .map(|g| g.chars().count())
            .unwrap_or(1);
        offset + step
    }

    /// Offset of the start of the grapheme cluster ending at `offset`.
    pub fn prev_grapheme_boundary(&self, offset: usize) -> usize {
        let offset = offset.min(self.len_chars());
        if offset == 0 {
            return 0;
        }
        let start = offset.saturating_sub(GRAPHEME_WINDOW);
        let window = self.rope.slice(start..offset).to_string();
        let step = window
            .graphemes(true)
            .next_back()
            .map(|g| g.chars().count())
            .unwrap_or(1);
        offset - step
    }
}

impl Default for Document {
    fn default() -> Self {
        Document::new(Style::default())
    }
}
