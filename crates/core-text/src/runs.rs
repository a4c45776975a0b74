//! Ordered style runs partitioning a document.
//!
//! Invariants (hold after every public call):
//! * the sum of run lengths equals the document length in chars;
//! * no run has zero length;
//! * adjacent runs never carry equal styles (runs are maximal).

use crate::style::Style;

/// A contiguous range of `len` chars sharing one style.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Run {
    pub len: usize,
    pub style: Style,
}

impl Run {
    pub fn new(len: usize, style: Style) -> Self {
        Self { len, style }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleRuns {
    runs: Vec<Run>,
}

impl StyleRuns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single run covering `len` chars (empty when `len == 0`).
    pub fn uniform(len: usize, style: Style) -> Self {
        let mut runs = Self::new();
        runs.insert(0, len, style);
        runs
    }

    pub fn len(&self) -> usize {
        self.runs.iter().map(|r| r.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn as_slice(&self) -> &[Run] {
        &self.runs
    }

    /// Style covering `offset`. `None` when `offset >= len`.
    pub fn style_at(&self, offset: usize) -> Option<&Style> {
        let mut start = 0usize;
        for run in &self.runs {
            if offset < start + run.len {
                return Some(&run.style);
            }
            start += run.len;
        }
        None
    }

    pub fn last_style(&self) -> Option<&Style> {
        self.runs.last().map(|r| &r.style)
    }

    /// Ensure a run boundary at `offset`, returning the index of the run that
    /// starts there (`runs.len()` when `offset` is the end).
    fn split_at(&mut self, offset: usize) -> usize {
        let mut start = 0usize;
        for idx in 0..self.runs.len() {
            let len = self.runs[idx].len;
            if offset == start {
                return idx;
            }
            if offset < start + len {
                let head = offset - start;
                let tail = Run::new(len - head, self.runs[idx].style.clone());
                self.runs[idx].len = head;
                self.runs.insert(idx + 1, tail);
                return idx + 1;
            }
            start += len;
        }
        debug_assert_eq!(offset, start, "split offset beyond run coverage");
        self.runs.len()
    }

    /// Insert `len` chars of `style` at `offset`.
    pub fn insert(&mut self, offset: usize, len: usize, style: Style) {
        if len == 0 {
            return;
        }
        self.insert_runs(offset, vec![Run::new(len, style)]);
    }

    /// Insert a sequence of runs at `offset`.
    pub fn insert_runs(&mut self, offset: usize, runs: Vec<Run>) {
        let idx = self.split_at(offset);
        self.runs.splice(idx..idx, runs);
        self.normalize();
    }

    /// Remove `[offset, offset + len)` and return the removed runs.
    pub fn remove(&mut self, offset: usize, len: usize) -> Vec<Run> {
        if len == 0 {
            return Vec::new();
        }
        let a = self.split_at(offset);
        let b = self.split_at(offset + len);
        let removed: Vec<Run> = self.runs.drain(a..b).collect();
        self.normalize();
        removed
    }

    /// Copy of the runs covering `[offset, offset + len)`.
    pub fn slice(&self, offset: usize, len: usize) -> Vec<Run> {
        let end = offset + len;
        let mut out = Vec::new();
        let mut start = 0usize;
        for run in &self.runs {
            let run_end = start + run.len;
            let lo = start.max(offset);
            let hi = run_end.min(end);
            if lo < hi {
                out.push(Run::new(hi - lo, run.style.clone()));
            }
            if run_end >= end {
                break;
            }
            start = run_end;
        }
        out
    }

    /// Rewrite the style of every char in `[offset, offset + len)` through `f`.
    /// Returns the runs that covered the range before the change.
    pub fn restyle<F>(&mut self, offset: usize, len: usize, f: F) -> Vec<Run>
    where
        F: Fn(&Style) -> Style,
    {
        if len == 0 {
            return Vec::new();
        }
        let a = self.split_at(offset);
        let b = self.split_at(offset + len);
        let before: Vec<Run> = self.runs[a..b].to_vec();
        for run in &mut self.runs[a..b] {
            run.style = f(&run.style);
        }
        self.normalize();
        before
    }

    /// Replace the styling of the range covered by `runs` (starting at
    /// `offset`) with exactly those runs. Text length is unchanged.
    pub fn overwrite(&mut self, offset: usize, runs: &[Run]) {
        let len: usize = runs.iter().map(|r| r.len).sum();
        self.remove(offset, len);
        self.insert_runs(offset, runs.to_vec());
    }

    fn normalize(&mut self) {
        self.runs.retain(|r| r.len > 0);
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}
