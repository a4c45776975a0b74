mod common;
use common::*;

use core_text::{Color, Decoration};
use pretty_assertions::assert_eq;

#[test]
fn scripted_formatting_session() {
    let mut m = model("");
    feed(
        &mut m,
        &["insert Hello world", "select 0 5", "menu Home Bold", "key ctrl+i"],
    );
    let doc = m.state().document();
    let style = doc.style_at(0).unwrap();
    assert!(style.has(Decoration::BOLD) && style.has(Decoration::ITALIC));
    assert!(!doc.style_at(6).unwrap().is_bold());

    // typing after a bold word inherits bold
    feed(&mut m, &["caret 5", "insert !"]);
    assert_eq!(text(&m), "Hello! world");
    assert!(m.state().document().style_at(5).unwrap().is_bold());

    feed(&mut m, &["select 7 12", "color red", "fill yellow"]);
    let s = m.state().document().style_at(8).unwrap();
    assert_eq!((s.foreground, s.background), (Some(Color::RED), Some(Color::YELLOW)));
}

#[test]
fn undo_redo_through_keys() {
    let mut m = model("abc");
    feed(&mut m, &["caret 3", "insert d", "select 0 4", "bold"]);
    run(&mut m, "key ctrl+z");
    assert!(!m.state().document().style_at(0).unwrap().is_bold());
    run(&mut m, "key ctrl+z");
    assert_eq!(text(&m), "abc");
    run(&mut m, "key ctrl+y");
    assert_eq!(text(&m), "abcd");
    let res = feed(&mut m, &["redo", "redo"]);
    assert_eq!(res.notification.as_deref(), Some("nothing to redo"));
}

#[test]
fn lists_from_the_command_line() {
    let mut m = model("one\ntwo");
    feed(&mut m, &["select-all", "numbering"]);
    assert_eq!(text(&m), "1. one\n2. two");
    run(&mut m, "numbering");
    assert_eq!(text(&m), "one\ntwo");
    feed(&mut m, &["select-all", "bullets"]);
    assert_eq!(text(&m), "• one\n• two");
    run(&mut m, "undo");
    assert_eq!(text(&m), "one\ntwo");
}

#[test]
fn find_next_via_ctrl_f_does_not_wrap() {
    let mut m = model("banana");
    let res = run(&mut m, "find a");
    assert_eq!(res.notification.as_deref(), Some("Match 1 of 3"));
    run(&mut m, "key ctrl+f");
    run(&mut m, "key ctrl+f");
    assert_eq!(m.state().caret(), 5);
    let res = run(&mut m, "key ctrl+f");
    assert_eq!(res.notification.as_deref(), Some("text not found"));
    let res = run(&mut m, "key ctrl+shift+f");
    assert_eq!(res.notification.as_deref(), Some("text not found"));
    run(&mut m, "find-previous");
    assert_eq!(m.state().caret(), 5);
}

#[test]
fn replace_then_undo() {
    let mut m = model("cat concatenate cat.");
    let res = run(&mut m, "menu Edit Replace cat dog");
    assert_eq!(res.notification.as_deref(), Some("Replaced 2 occurrences"));
    assert_eq!(text(&m), "dog concatenate dog.");
    run(&mut m, "undo");
    assert_eq!(text(&m), "cat concatenate cat.");
}

#[test]
fn context_menu_clipboard() {
    let mut m = model("copy me");
    feed(
        &mut m,
        &["menu Context Select All", "menu Context Copy", "caret 7", "menu Context Paste"],
    );
    assert_eq!(text(&m), "copy mecopy me");
    feed(&mut m, &["select 0 5", "menu Context Cut"]);
    assert_eq!(text(&m), "mecopy me");
}

#[test]
fn bad_input_is_reported_not_fatal() {
    let mut m = model("x");
    for line in ["goto abc", "select 0 99", "menu Home Nope", "key ctrl+k", "frobnicate"] {
        let res = run(&mut m, line);
        assert!(!res.quit);
        assert!(res.notification.is_some(), "{line}");
    }
    assert_eq!(text(&m), "x");
    assert!(run(&mut m, "menu File Close").quit);
}

#[test]
fn tabs_are_independent() {
    let mut m = model("first");
    feed(&mut m, &["new-tab", "insert second"]);
    assert_eq!(m.tab_count(), 2);
    run(&mut m, "tab 1");
    assert_eq!(text(&m), "first");
    let res = run(&mut m, "tabs");
    assert_eq!(res.notification.as_deref(), Some("*1 Untitled\n 2 Untitled"));
    let res = run(&mut m, "close-tab 2");
    assert_eq!(res.notification.as_deref(), Some("Closed tab with unsaved changes"));
    assert_eq!(m.tab_count(), 1);
    let res = run(&mut m, "tab 3");
    assert!(res.notification.unwrap().contains("no tab 3"));
}

#[test]
fn status_line_tracks_edits() {
    let mut m = model("");
    run(&mut m, "insert Hello мир! 123");
    let status = m.status_line();
    assert!(status.contains("Words: 3"), "{status}");
    assert!(status.contains("Sentences: 2"), "{status}");
    assert!(status.ends_with("Page 1/1 | modified"), "{status}");
}
