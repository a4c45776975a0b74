//! Bullet, numbering and multilevel-numbering toggles over a block of lines.
//!
//! The transforms are pure string rewrites; the dispatcher applies the
//! result to the document as one delete + insert group.
//!
//! Rules shared by all three kinds:
//! * one trailing `\n` is set aside and restored after rebuilding;
//! * if every line already carries the marker, markers are stripped from
//!   all lines, otherwise a marker is added to every line (an already
//!   marked line in a mixed block gets a second marker).

use std::sync::LazyLock;

use regex::Regex;

static NUMBERED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("numbered marker pattern"));
static NUMBER_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("number prefix pattern"));
static MULTILEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*\.\s+").expect("multilevel marker pattern"));
static MULTILEVEL_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(\.\d+)*\.\s*").expect("multilevel prefix pattern"));
static BULLET_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"•\s*").expect("bullet prefix pattern"));

pub const BULLET: &str = "•";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    Bullets,
    Numbering,
    Multilevel,
}

impl ListKind {
    fn is_marked(self, line: &str) -> bool {
        let trimmed = line.trim();
        match self {
            ListKind::Bullets => trimmed.starts_with(BULLET),
            ListKind::Numbering => NUMBERED.is_match(trimmed),
            ListKind::Multilevel => MULTILEVEL.is_match(trimmed),
        }
    }

    fn strip(self, line: &str) -> String {
        let re = match self {
            ListKind::Bullets => &*BULLET_PREFIX,
            ListKind::Numbering => &*NUMBER_PREFIX,
            ListKind::Multilevel => &*MULTILEVEL_PREFIX,
        };
        re.replacen(line, 1, "").into_owned()
    }
}

/// Indentation level of a line: its count of leading spaces and tabs.
fn indent_level(line: &str) -> usize {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count()
}

/// `1.2.3.` with `level + 1` components.
fn multilevel_prefix(level: usize) -> String {
    (1..=level + 1).map(|i| format!("{i}.")).collect()
}

/// Rebuild `block` with markers of `kind` toggled.
pub fn toggle(kind: ListKind, block: &str) -> String {
    let (body, trailing) = match block.strip_suffix('\n') {
        Some(body) => (body, "\n"),
        None => (block, ""),
    };
    let lines: Vec<&str> = body.split('\n').collect();
    let all_marked = lines.iter().all(|l| kind.is_marked(l));

    let rebuilt: Vec<String> = if all_marked {
        lines.iter().map(|l| kind.strip(l)).collect()
    } else {
        lines
            .iter()
            .enumerate()
            .map(|(i, l)| match kind {
                ListKind::Bullets => format!("{BULLET} {l}"),
                ListKind::Numbering => format!("{}. {l}", i + 1),
                ListKind::Multilevel => {
                    format!("{} {}", multilevel_prefix(indent_level(l)), l.trim())
                }
            })
            .collect()
    };
    let mut out = rebuilt.join("\n");
    out.push_str(trailing);
    out
}
