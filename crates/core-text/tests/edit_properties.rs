//! Property-based tests for document edits and their inverses.

use core_text::{Color, Decoration, Document, Style, StyleDelta, StyleMode};
use proptest::prelude::*;

fn seeded(text: &str, bold_from: usize, bold_len: usize) -> Document {
    let mut doc = Document::from_str(text, Style::default());
    let len = doc.len_chars();
    let from = bold_from.min(len);
    let n = bold_len.min(len - from);
    doc.set_style(
        from,
        n,
        &StyleDelta::new().flag(Decoration::BOLD, true),
        StyleMode::Merge,
    )
    .unwrap();
    doc
}

fn runs_cover(doc: &Document) -> bool {
    let total: usize = doc.runs().iter().map(|r| r.len).sum();
    let maximal = doc.runs().windows(2).all(|w| w[0].style != w[1].style);
    total == doc.len_chars() && doc.runs().iter().all(|r| r.len > 0) && maximal
}

proptest! {
    // Inserting then deleting the same range restores text and runs
    #[test]
    fn insert_then_delete_restores(
        text in "[a-zа-я \n]{0,40}",
        ins in "[A-Z!]{1,8}",
        at in 0usize..60,
        bold_from in 0usize..40,
        bold_len in 0usize..40,
    ) {
        let mut doc = seeded(&text, bold_from, bold_len);
        let before_text = doc.text();
        let before_runs = doc.runs().to_vec();
        let at = at.min(doc.len_chars());
        let mut italic = Style::default();
        italic.decoration = Decoration::ITALIC;
        doc.insert(at, &ins, Some(&italic)).unwrap();
        prop_assert!(runs_cover(&doc));
        doc.delete(at, ins.chars().count()).unwrap();
        prop_assert_eq!(doc.text(), before_text);
        prop_assert_eq!(doc.runs(), before_runs.as_slice());
    }

    // Applying an edit's inverse restores the prior state for every edit kind
    #[test]
    fn inverse_restores_prior_state(
        text in "[a-z ]{1,40}",
        from in 0usize..40,
        len in 0usize..40,
        kind in 0u8..3,
    ) {
        let mut doc = seeded(&text, 2, 5);
        let from = from.min(doc.len_chars());
        let len = len.min(doc.len_chars() - from);
        let before_text = doc.text();
        let before_runs = doc.runs().to_vec();
        let edit = match kind {
            0 => doc.delete(from, len).unwrap(),
            1 => doc.insert(from, "xyz", None).unwrap(),
            _ => doc
                .set_style(from, len, &StyleDelta::new().foreground(Color::BLUE), StyleMode::Merge)
                .unwrap(),
        };
        prop_assert!(runs_cover(&doc));
        let after_text = doc.text();
        let after_runs = doc.runs().to_vec();
        edit.inverse().apply(&mut doc).unwrap();
        prop_assert_eq!(doc.text(), before_text);
        prop_assert_eq!(doc.runs(), before_runs.as_slice());
        edit.apply(&mut doc).unwrap();
        prop_assert_eq!(doc.text(), after_text);
        prop_assert_eq!(doc.runs(), after_runs.as_slice());
    }

    // Out-of-range requests never mutate the document
    #[test]
    fn out_of_range_leaves_document_untouched(text in "[a-z]{0,20}", extra in 1usize..10) {
        let mut doc = Document::from_str(&text, Style::default());
        let len = doc.len_chars();
        prop_assert!(doc.delete(len, extra).is_err());
        prop_assert!(doc.insert(len + extra, "q", None).is_err());
        prop_assert!(doc
            .set_style(0, len + extra, &StyleDelta::new(), StyleMode::Replace)
            .is_err());
        prop_assert_eq!(doc.text(), text);
        prop_assert_eq!(doc.revision(), 0);
    }
}
