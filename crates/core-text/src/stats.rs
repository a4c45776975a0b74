//! Document statistics.

use std::fmt;

const PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':', '-', '(', ')', '"', '\''];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub paragraphs: usize,
    pub words: usize,
    pub chars: usize,
    pub chars_without_spaces: usize,
    pub sentences: usize,
    pub latin: usize,
    pub cyrillic: usize,
    pub digits: usize,
    pub punctuation: usize,
    pub special: usize,
}

/// Number of segments produced by splitting on `is_sep`, not counting the
/// empty segments at the end.
fn segment_count(text: &str, is_sep: impl Fn(char) -> bool) -> usize {
    let segments: Vec<&str> = text.split(is_sep).collect();
    let trailing_empty = segments.iter().rev().take_while(|s| s.is_empty()).count();
    segments.len() - trailing_empty
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, 'А'..='Я' | 'а'..='я' | 'Ё' | 'ё')
}

impl Statistics {
    pub fn compute(text: &str) -> Self {
        let mut stats = Statistics {
            paragraphs: segment_count(text, |c| c == '\n'),
            words: text.split_whitespace().count(),
            sentences: segment_count(text, |c| matches!(c, '.' | '!' | '?')),
            ..Statistics::default()
        };
        for c in text.chars() {
            stats.chars += 1;
            if c != ' ' {
                stats.chars_without_spaces += 1;
            }
            if c.is_ascii_alphabetic() {
                stats.latin += 1;
            }
            if is_cyrillic(c) {
                stats.cyrillic += 1;
            }
            if c.is_ascii_digit() {
                stats.digits += 1;
            }
            if PUNCTUATION.contains(&c) {
                stats.punctuation += 1;
            }
            if !c.is_alphanumeric() && c != '_' && !c.is_whitespace() {
                stats.special += 1;
            }
        }
        stats
    }
}

impl fmt::Display for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Paragraphs: {} | Words: {} | Chars: {} ({} without spaces) | Sentences: {} | \
             Latin: {} | Cyrillic: {} | Digits: {} | Punctuation: {} | Special: {}",
            self.paragraphs,
            self.words,
            self.chars,
            self.chars_without_spaces,
            self.sentences,
            self.latin,
            self.cyrillic,
            self.digits,
            self.punctuation,
            self.special,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_script_sample() {
        let s = Statistics::compute("Hello мир! 123");
        assert_eq!(s.words, 3);
        assert_eq!(s.digits, 3);
        assert_eq!(s.latin, 5);
        assert_eq!(s.cyrillic, 3);
        assert_eq!(s.sentences, 2);
        assert_eq!(s.paragraphs, 1);
        assert_eq!(s.chars, 14);
        assert_eq!(s.chars_without_spaces, 12);
        assert_eq!(s.punctuation, 1);
        assert_eq!(s.special, 1);
    }

    #[test]
    fn empty_document_counts_nothing() {
        assert_eq!(Statistics::compute(""), Statistics::default());
    }

    #[test]
    fn trailing_separators_are_ignored() {
        let s = Statistics::compute("one.\ntwo!");
        assert_eq!(s.paragraphs, 2);
        assert_eq!(s.sentences, 2);
        assert_eq!(Statistics::compute("a\n\n\n").paragraphs, 1);
        let s = Statistics::compute("\n\nx");
        assert_eq!(s.paragraphs, 3);
    }

    #[test]
    fn only_plain_spaces_are_excluded() {
        let s = Statistics::compute("a\tb c");
        assert_eq!(s.chars, 5);
        assert_eq!(s.chars_without_spaces, 4);
        assert_eq!(s.words, 3);
    }

    #[test]
    fn special_excludes_underscore_and_letters() {
        let s = Statistics::compute("ü_#@");
        assert_eq!(s.special, 2);
        assert_eq!(s.latin, 0);
    }
}
