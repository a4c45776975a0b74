//! Line-ending detection on load and re-expansion on save.
//!
//! Documents hold LF-only text. The style seen on disk is remembered so the
//! file is written back the way it was read.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    Cr,
    Crlf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::Crlf => "\r\n",
        }
    }
}

/// Output of [`normalize_line_endings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    /// LF-only content
    pub normalized: String,
    /// Majority style in the input (LF when there are no line breaks)
    pub original: LineEnding,
    /// More than one style present with differing counts
    pub mixed: bool,
}

/// Convert CRLF and lone CR to LF, recording the dominant style.
/// Ties go to CRLF, then LF, then CR.
pub fn normalize_line_endings(input: &str) -> NormalizedText {
    let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
    let mut normalized = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' if chars.peek() == Some(&'\n') => {
                chars.next();
                crlf += 1;
                normalized.push('\n');
            }
            '\r' => {
                cr += 1;
                normalized.push('\n');
            }
            '\n' => {
                lf += 1;
                normalized.push('\n');
            }
            other => normalized.push(other),
        }
    }

    let mut original = LineEnding::Lf;
    let mut max = 0usize;
    for (style, count) in [
        (LineEnding::Crlf, crlf),
        (LineEnding::Lf, lf),
        (LineEnding::Cr, cr),
    ] {
        if count > max {
            max = count;
            original = style;
        }
    }
    let counts = [crlf, lf, cr];
    let present = counts.iter().filter(|c| **c > 0).count();
    let mixed = present > 1 && counts.iter().any(|c| *c > 0 && *c != max);

    NormalizedText {
        normalized,
        original,
        mixed,
    }
}

/// Expand LF line breaks in `text` to `ending`.
pub fn expand_line_endings(text: &str, ending: LineEnding) -> String {
    match ending {
        LineEnding::Lf => text.to_string(),
        other => text.replace('\n', other.as_str()),
    }
}
