//! Command table: stable command names, their argument parsing, key
//! bindings and menu definitions.
//!
//! A command line is `<name> [args]`. Key chords and menu entries carry only
//! a command name (menu entries may be followed by arguments on the same
//! line), so every input path funnels through [`parse_command`].
//!
//! Parsing is pure; failures are `ParseFailure` errors that the caller turns
//! into a notification.

use std::path::PathBuf;

use core_events::{KeyCode, KeyEvent, KeyModifiers};
use core_state::EditorError;
use core_text::{Color, Decoration};

use crate::{Action, ListKind};

/// One entry of the command table, used for help output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub usage: &'static str,
    pub summary: &'static str,
}

const fn cmd(name: &'static str, usage: &'static str, summary: &'static str) -> CommandSpec {
    CommandSpec {
        name,
        usage,
        summary,
    }
}

pub const COMMANDS: &[CommandSpec] = &[
    cmd("insert", "insert <text>", "insert text at the caret (\\n, \\t escapes)"),
    cmd("newline", "newline", "insert a line break"),
    cmd("delete", "delete", "delete the character after the caret"),
    cmd("backspace", "backspace", "delete the selection or the character before the caret"),
    cmd("select-all", "select-all", "select the whole document"),
    cmd("select", "select <start> <end>", "select a character range"),
    cmd("caret", "caret <offset>", "move the caret"),
    cmd("goto", "goto <line>", "move the caret to a 1-based line"),
    cmd("datetime", "datetime", "insert the current date and time"),
    cmd("cut", "cut", "cut the selection"),
    cmd("copy", "copy", "copy the selection"),
    cmd("paste", "paste", "paste at the caret"),
    cmd("bold", "bold", "toggle bold"),
    cmd("italic", "italic", "toggle italic"),
    cmd("underline", "underline", "toggle underline"),
    cmd("strikethrough", "strikethrough", "toggle strikethrough"),
    cmd("subscript", "subscript", "toggle subscript"),
    cmd("superscript", "superscript", "toggle superscript"),
    cmd("font", "font <family>", "set the font family"),
    cmd("size", "size <points>", "set the font size"),
    cmd("grow", "grow", "increase the font size by 2"),
    cmd("shrink", "shrink", "decrease the font size by 2"),
    cmd("color", "color <color>", "set the text color"),
    cmd("background", "background <color>", "set the selection or page background"),
    cmd("fill", "fill <color>", "fill the selection background"),
    cmd("clear-format", "clear-format", "reset the selection to the default style"),
    cmd("copy-format", "copy-format", "remember the style at the selection start"),
    cmd("apply-format", "apply-format", "apply the remembered style"),
    cmd("toggle-case", "toggle-case", "switch the selection between upper and lower case"),
    cmd("bullets", "bullets", "toggle bullets on the selected lines"),
    cmd("numbering", "numbering", "toggle numbering on the selected lines"),
    cmd("multilevel", "multilevel", "toggle multilevel numbering on the selected lines"),
    cmd("theme", "theme", "switch between light and dark page colors"),
    cmd("find", "find <text>", "highlight all matches and go to the first"),
    cmd("find-next", "find-next", "go to the next match"),
    cmd("find-previous", "find-previous", "go to the previous match"),
    cmd("replace", "replace <word|\"words\"> [replacement]", "replace whole words"),
    cmd("undo", "undo", "undo the last edit"),
    cmd("redo", "redo", "redo the last undone edit"),
    cmd("new", "new", "start an empty document"),
    cmd("open", "open <path>", "open a text file"),
    cmd("save", "save", "save to the current file"),
    cmd("save-as", "save-as <path>", "save to a new file"),
    cmd("autosave", "autosave", "save if the document has a file and changes"),
    cmd("new-tab", "new-tab", "open an empty tab"),
    cmd("close-tab", "close-tab [n]", "close tab n (default: the active tab)"),
    cmd("tab", "tab <n>", "switch to tab n"),
    cmd("tabs", "tabs", "list open tabs"),
    cmd("help", "help", "list commands"),
    cmd("close", "close", "exit"),
    cmd("quit", "quit", "exit"),
];

/// Built-in key chords and the command each one runs.
pub const KEY_BINDINGS: &[(KeyEvent, &str)] = &[
    (KeyEvent::ctrl('s'), "save"),
    (KeyEvent::ctrl('z'), "undo"),
    (KeyEvent::ctrl('y'), "redo"),
    (KeyEvent::ctrl('f'), "find-next"),
    (
        KeyEvent::new(KeyCode::Char('f'), KeyModifiers::CTRL.union(KeyModifiers::SHIFT)),
        "find-previous",
    ),
    (KeyEvent::ctrl('a'), "select-all"),
    (KeyEvent::ctrl('b'), "bold"),
    (KeyEvent::ctrl('i'), "italic"),
    (KeyEvent::ctrl('u'), "underline"),
    (KeyEvent::ctrl('x'), "cut"),
    (KeyEvent::ctrl('c'), "copy"),
    (KeyEvent::ctrl('v'), "paste"),
    (KeyEvent::ctrl('n'), "new"),
    (KeyEvent::ctrl('t'), "new-tab"),
    (KeyEvent::ctrl('w'), "close-tab"),
    (KeyEvent::ctrl('q'), "quit"),
    (KeyEvent::new(KeyCode::Delete, KeyModifiers::empty()), "delete"),
    (KeyEvent::new(KeyCode::Backspace, KeyModifiers::empty()), "backspace"),
    (KeyEvent::new(KeyCode::Enter, KeyModifiers::empty()), "newline"),
    (KeyEvent::new(KeyCode::F(5), KeyModifiers::empty()), "datetime"),
];

pub fn action_for_key(key: &KeyEvent) -> Option<&'static str> {
    KEY_BINDINGS
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, name)| *name)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuItem {
    pub label: &'static str,
    pub command: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Menu {
    pub title: &'static str,
    pub items: &'static [MenuItem],
}

const fn item(label: &'static str, command: &'static str) -> MenuItem {
    MenuItem { label, command }
}

/// Ribbon tabs and the toolbar.
pub const MENUS: &[Menu] = &[
    Menu {
        title: "File",
        items: &[
            item("New", "new"),
            item("Open", "open"),
            item("Save", "save"),
            item("Save As", "save-as"),
            item("Close", "close"),
        ],
    },
    Menu {
        title: "Home",
        items: &[
            item("Font", "font"),
            item("Size", "size"),
            item("Copy Format", "copy-format"),
            item("Apply Format", "apply-format"),
            item("Bold", "bold"),
            item("Italic", "italic"),
            item("Underline", "underline"),
            item("Strikethrough", "strikethrough"),
            item("Subscript", "subscript"),
            item("Superscript", "superscript"),
            item("Font Color", "color"),
            item("Background Color", "background"),
            item("Clear Formatting", "clear-format"),
            item("Change Case", "toggle-case"),
            item("Decrease Font Size", "shrink"),
            item("Increase Font Size", "grow"),
            item("Bullets", "bullets"),
            item("Numbering", "numbering"),
            item("Multilevel Numbering", "multilevel"),
            item("Fill", "fill"),
        ],
    },
    Menu {
        title: "Edit",
        items: &[
            item("Cut", "cut"),
            item("Copy", "copy"),
            item("Paste", "paste"),
            item("Delete", "delete"),
            item("Find", "find"),
            item("Find Next", "find-next"),
            item("Find Previous", "find-previous"),
            item("Replace", "replace"),
            item("Go To", "goto"),
            item("Select All", "select-all"),
            item("Date and Time", "datetime"),
        ],
    },
    Menu {
        title: "Toolbar",
        items: &[
            item("New", "new"),
            item("Open", "open"),
            item("Save", "save"),
            item("Save As", "save-as"),
            item("Undo", "undo"),
            item("Redo", "redo"),
            item("Dark Theme", "theme"),
        ],
    },
];

pub const CONTEXT_MENU: Menu = Menu {
    title: "Context",
    items: &[
        item("Copy", "copy"),
        item("Paste", "paste"),
        item("Cut", "cut"),
        item("Select All", "select-all"),
    ],
};

fn parse_failure(input: &str, reason: impl Into<String>) -> EditorError {
    EditorError::parse(input, reason)
}

fn required<'a>(line: &str, arg: &'a str, what: &str) -> Result<&'a str, EditorError> {
    if arg.is_empty() {
        Err(parse_failure(line, format!("missing {what}")))
    } else {
        Ok(arg)
    }
}

fn number<T: std::str::FromStr>(line: &str, arg: &str, what: &str) -> Result<T, EditorError> {
    required(line, arg, what)?
        .parse()
        .map_err(|_| parse_failure(line, format!("{what} must be a number, got `{arg}`")))
}

fn color(line: &str, arg: &str) -> Result<Color, EditorError> {
    required(line, arg, "color")?
        .parse()
        .map_err(|e: core_text::ParseColorError| parse_failure(line, e.to_string()))
}

/// Expand `\n`, `\t` and `\\` in typed text.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// 1-based tab number to a 0-based index.
/// Split `replace` arguments into the find text and the replacement. A find
/// text in double quotes may contain spaces; the quotes are not part of it.
fn split_find<'a>(line: &str, arg: &'a str) -> Result<(&'a str, &'a str), EditorError> {
    if let Some(quoted) = arg.strip_prefix('"') {
        let (find, rest) = quoted
            .split_once('"')
            .ok_or_else(|| parse_failure(line, "unterminated quote in find text"))?;
        return Ok((find, rest.trim()));
    }
    Ok(match arg.split_once(char::is_whitespace) {
        Some((f, r)) => (f, r.trim()),
        None => (arg, ""),
    })
}

/// Leading word of `s` and everything after it, separator included.
fn next_word(s: &str) -> Option<(&str, &str)> {
    let s = s.trim_start();
    if s.is_empty() {
        return None;
    }
    Some(match s.find(char::is_whitespace) {
        Some(i) => s.split_at(i),
        None => (s, ""),
    })
}

fn tab_index(line: &str, arg: &str) -> Result<usize, EditorError> {
    match number::<usize>(line, arg, "tab number")? {
        0 => Err(parse_failure(line, "tab numbers start at 1")),
        n => Ok(n - 1),
    }
}

/// Parse `<name> [args]` into an action.
pub fn parse_command(line: &str) -> Result<Action, EditorError> {
    let trimmed = line.trim_start();
    let (name, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest),
        None => (trimmed.trim_end(), ""),
    };
    // `insert` keeps its argument verbatim, everything else is trimmed
    let arg = rest.trim();
    let action = match name {
        "insert" => Action::InsertText(unescape(required(line, rest, "text")?)),
        "newline" => Action::InsertText("\n".to_string()),
        "delete" => Action::DeleteNext,
        "backspace" => Action::Backspace,
        "select-all" => Action::SelectAll,
        "select" => {
            let (a, b) = arg
                .split_once(char::is_whitespace)
                .ok_or_else(|| parse_failure(line, "usage: select <start> <end>"))?;
            Action::Select {
                start: number(line, a.trim(), "start")?,
                end: number(line, b.trim(), "end")?,
            }
        }
        "caret" => Action::MoveCaret(number(line, arg, "offset")?),
        "goto" => Action::GoToLine(arg.to_string()),
        "datetime" => Action::InsertDateTime,
        "cut" => Action::Cut,
        "copy" => Action::Copy,
        "paste" => Action::Paste,
        "bold" => Action::ToggleDecoration(Decoration::BOLD),
        "italic" => Action::ToggleDecoration(Decoration::ITALIC),
        "underline" => Action::ToggleDecoration(Decoration::UNDERLINE),
        "strikethrough" => Action::ToggleDecoration(Decoration::STRIKETHROUGH),
        "subscript" => Action::ToggleDecoration(Decoration::SUBSCRIPT),
        "superscript" => Action::ToggleDecoration(Decoration::SUPERSCRIPT),
        "font" => Action::SetFontFamily(required(line, arg, "font family")?.to_string()),
        "size" => match number::<u16>(line, arg, "font size")? {
            0 => return Err(parse_failure(line, "font size must be positive")),
            n => Action::SetFontSize(n),
        },
        "grow" => Action::IncreaseFontSize,
        "shrink" => Action::DecreaseFontSize,
        "color" => Action::Foreground(color(line, arg)?),
        "background" => Action::Background(color(line, arg)?),
        "fill" => Action::BackgroundFill(color(line, arg)?),
        "clear-format" => Action::ClearFormatting,
        "copy-format" => Action::CopyFormat,
        "apply-format" => Action::ApplyFormat,
        "toggle-case" => Action::ToggleCase,
        "bullets" => Action::ToggleList(ListKind::Bullets),
        "numbering" => Action::ToggleList(ListKind::Numbering),
        "multilevel" => Action::ToggleList(ListKind::Multilevel),
        "theme" => Action::ToggleTheme,
        "find" => Action::Find(unescape(required(line, rest, "search text")?)),
        "find-next" => Action::FindNext,
        "find-previous" => Action::FindPrevious,
        "replace" => {
            let (find, replacement) = split_find(line, arg)?;
            Action::Replace {
                find: unescape(required(line, find, "word to replace")?),
                replacement: unescape(replacement),
            }
        }
        "undo" => Action::Undo,
        "redo" => Action::Redo,
        "new" => Action::NewFile,
        "open" => Action::Open(PathBuf::from(required(line, arg, "path")?)),
        "save" => Action::Save,
        "save-as" => Action::SaveAs(PathBuf::from(required(line, arg, "path")?)),
        "autosave" => Action::AutoSave,
        "new-tab" => Action::NewTab,
        "close-tab" if arg.is_empty() => Action::CloseTab(None),
        "close-tab" => Action::CloseTab(Some(tab_index(line, arg)?)),
        "tab" => Action::SwitchTab(tab_index(line, arg)?),
        "tabs" => Action::ListTabs,
        "help" => Action::Help,
        "close" | "quit" => Action::Quit,
        "" => return Err(parse_failure(line, "empty command")),
        other => return Err(parse_failure(line, format!("unknown command `{other}`"))),
    };
    Ok(action)
}

fn find_menu(title: &str) -> Option<&'static Menu> {
    MENUS
        .iter()
        .chain(std::iter::once(&CONTEXT_MENU))
        .find(|m| m.title.eq_ignore_ascii_case(title))
}

/// The part of `input` left after `label`'s words, or `None` when the
/// leading words differ (ASCII case-insensitive).
fn strip_label<'a>(label: &str, input: &'a str) -> Option<&'a str> {
    let mut rest = input;
    for word in label.split_whitespace() {
        let (typed, after) = next_word(rest)?;
        if !typed.eq_ignore_ascii_case(word) {
            return None;
        }
        rest = after;
    }
    Some(rest)
}

/// Resolve `<Menu> <Label> [args]` to a command line. The longest label
/// matching the leading words wins, so `Find Next` beats `Find`. Whatever
/// follows the label is passed on unchanged.
fn resolve_menu(line: &str, target: &str) -> Result<String, EditorError> {
    let (title, rest) = next_word(target)
        .ok_or_else(|| parse_failure(line, "usage: menu <menu> <item> [args]"))?;
    let menu = find_menu(title).ok_or_else(|| parse_failure(line, format!("no menu `{title}`")))?;
    let best = menu
        .items
        .iter()
        .filter_map(|it| strip_label(it.label, rest).map(|args| (it.label.len(), it, args)))
        .max_by_key(|(n, _, _)| *n);
    let Some((_, it, args)) = best else {
        return Err(parse_failure(
            line,
            format!("no item `{}` in menu {}", rest.trim(), menu.title),
        ));
    };
    Ok(format!("{}{}", it.command, args))
}

/// Resolve one line of user input: `key <chord>`, `menu <Menu> <Item> [args]`
/// or a plain command line.
pub fn resolve_input(line: &str) -> Result<Action, EditorError> {
    let trimmed = line.trim();
    if let Some(chord) = trimmed.strip_prefix("key ") {
        let key: KeyEvent = chord
            .parse()
            .map_err(|e: core_events::ParseKeyError| parse_failure(line, e.to_string()))?;
        return resolve_key(&key);
    }
    if let Some(target) = line.trim_start().strip_prefix("menu ") {
        let command = resolve_menu(line, target)?;
        return parse_command(&command);
    }
    parse_command(line)
}

/// Action bound to `key`, or `ParseFailure` when the chord is unbound.
pub fn resolve_key(key: &KeyEvent) -> Result<Action, EditorError> {
    let name = action_for_key(key)
        .ok_or_else(|| EditorError::parse(key.to_string(), "no command bound to this key"))?;
    tracing::trace!(target: "actions.dispatch", %key, command = name, "key_resolved");
    parse_command(name)
}
