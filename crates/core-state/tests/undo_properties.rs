//! Property-based tests: undo restores the exact prior state, redo the
//! post-edit state.

use core_state::EditorState;
use core_text::{Color, Decoration, Document, Run, Style, StyleDelta, StyleMode};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Insert(usize, String),
    Delete(usize, usize),
    Bold(usize, usize),
    Paint(usize, usize),
    Clear(usize, usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..50, "[a-z ]{1,6}").prop_map(|(o, s)| Op::Insert(o, s)),
        (0usize..50, 0usize..10).prop_map(|(o, l)| Op::Delete(o, l)),
        (0usize..50, 0usize..10).prop_map(|(o, l)| Op::Bold(o, l)),
        (0usize..50, 0usize..10).prop_map(|(o, l)| Op::Paint(o, l)),
        (0usize..50, 0usize..10).prop_map(|(o, l)| Op::Clear(o, l)),
    ]
}

fn snapshot(st: &EditorState) -> (String, Vec<Run>) {
    (st.document().text(), st.document().runs().to_vec())
}

fn run(st: &mut EditorState, op: &Op) {
    let len = st.document().len_chars();
    let clamp = |o: usize, l: usize| {
        let o = o.min(len);
        (o, l.min(len - o))
    };
    let _ = st.transact(|tx| match op {
        Op::Insert(o, s) => tx.insert((*o).min(len), s, None),
        Op::Delete(o, l) => {
            let (o, l) = clamp(*o, *l);
            tx.delete(o, l)
        }
        Op::Bold(o, l) => {
            let (o, l) = clamp(*o, *l);
            let delta = StyleDelta::new().flag(Decoration::BOLD, true);
            tx.set_style(o, l, &delta, StyleMode::Merge)
        }
        Op::Paint(o, l) => {
            let (o, l) = clamp(*o, *l);
            let delta = StyleDelta::new().foreground(Color::RED);
            tx.set_style(o, l, &delta, StyleMode::Merge)
        }
        Op::Clear(o, l) => {
            let (o, l) = clamp(*o, *l);
            tx.set_style(o, l, &StyleDelta::new(), StyleMode::Replace)
        }
    });
}

proptest! {
    // Undo after any single operation restores the prior state; redo restores the result
    #[test]
    fn undo_then_redo_is_exact(seed in prop::collection::vec(op(), 0..8), last in op()) {
        let mut st = EditorState::with_document(Document::from_str("the quick brown fox", Style::default()));
        for o in &seed {
            run(&mut st, o);
        }
        let before = snapshot(&st);
        let depth = st.undo_depth();
        run(&mut st, &last);
        let after = snapshot(&st);
        if st.undo_depth() > depth {
            st.undo().unwrap();
            prop_assert_eq!(snapshot(&st), before);
            st.redo().unwrap();
            prop_assert_eq!(snapshot(&st), after);
        } else {
            prop_assert_eq!(after, before);
        }
    }

    // Undoing everything returns to the starting document
    #[test]
    fn full_unwind(ops in prop::collection::vec(op(), 1..12)) {
        let mut st = EditorState::with_document(Document::from_str("hello", Style::default()));
        let start = snapshot(&st);
        for o in &ops {
            run(&mut st, o);
        }
        while st.undo().is_ok() {}
        prop_assert_eq!(snapshot(&st), start);
    }
}
