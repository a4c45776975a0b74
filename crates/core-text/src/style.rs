//! Character formatting attributes.
//!
//! A [`Style`] is the complete attribute set carried by every character of a
//! document. A [`StyleDelta`] names only the fields an operation wants to
//! change; merging a delta onto a style leaves every unnamed field untouched.

use std::fmt;
use std::str::FromStr;

bitflags::bitflags! {
    /// Boolean decoration flags. Sub- and superscript are independent flags,
    /// the same way the toggles treat them.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Decoration: u8 {
        const BOLD = 1;
        const ITALIC = 2;
        const UNDERLINE = 4;
        const STRIKETHROUGH = 8;
        const SUBSCRIPT = 16;
        const SUPERSCRIPT = 32;
    }
}

/// 24-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    pub const YELLOW: Color = Color::rgb(255, 255, 0);
    pub const GRAY: Color = Color::rgb(128, 128, 128);
    pub const ORANGE: Color = Color::rgb(255, 200, 0);
    pub const CYAN: Color = Color::rgb(0, 255, 255);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error returned when a color literal is neither `#rrggbb` nor a known name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid color `{0}` (expected #rrggbb or a color name)")]
pub struct ParseColorError(pub String);

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        if let Some(hex) = raw.strip_prefix('#') {
            if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                    return Ok(Color::rgb(r, g, b));
                }
            }
            return Err(ParseColorError(raw.to_string()));
        }
        let named = match raw.to_ascii_lowercase().as_str() {
            "black" => Color::BLACK,
            "white" => Color::WHITE,
            "red" => Color::RED,
            "green" => Color::GREEN,
            "blue" => Color::BLUE,
            "yellow" => Color::YELLOW,
            "gray" | "grey" => Color::GRAY,
            "orange" => Color::ORANGE,
            "cyan" => Color::CYAN,
            "magenta" => Color::MAGENTA,
            _ => return Err(ParseColorError(raw.to_string())),
        };
        Ok(named)
    }
}

/// Complete formatting of a character range.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Style {
    pub font_family: String,
    pub font_size: u16,
    pub decoration: Decoration,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl Style {
    pub fn new(font_family: impl Into<String>, font_size: u16) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            decoration: Decoration::empty(),
            foreground: None,
            background: None,
        }
    }

    pub fn has(&self, flag: Decoration) -> bool {
        self.decoration.contains(flag)
    }

    pub fn is_bold(&self) -> bool {
        self.has(Decoration::BOLD)
    }

    pub fn is_italic(&self) -> bool {
        self.has(Decoration::ITALIC)
    }
}

impl Default for Style {
    fn default() -> Self {
        Style::new("Times New Roman", 14)
    }
}

/// How a delta combines with the attributes already on a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleMode {
    /// Overlay only the fields named by the delta.
    Merge,
    /// Discard prior attributes: the range becomes the document default with
    /// the delta applied on top.
    Replace,
}

/// Partial style update. Unset fields leave the target untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleDelta {
    pub font_family: Option<String>,
    pub font_size: Option<u16>,
    /// Flags forced on.
    pub set: Decoration,
    /// Flags forced off.
    pub clear: Decoration,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

impl StyleDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta carrying every attribute of `style`, used by "apply format".
    pub fn from_style(style: &Style) -> Self {
        Self {
            font_family: Some(style.font_family.clone()),
            font_size: Some(style.font_size),
            set: style.decoration,
            clear: Decoration::all().difference(style.decoration),
            foreground: style.foreground,
            background: style.background,
        }
    }

    pub fn flag(mut self, flag: Decoration, on: bool) -> Self {
        if on {
            self.set.insert(flag);
            self.clear.remove(flag);
        } else {
            self.clear.insert(flag);
            self.set.remove(flag);
        }
        self
    }

    pub fn font_family(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }

    pub fn font_size(mut self, size: u16) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    pub fn background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &StyleDelta::default()
    }

    /// Overlay this delta onto `base`, returning the resulting style.
    pub fn apply_to(&self, base: &Style) -> Style {
        let mut out = base.clone();
        if let Some(family) = &self.font_family {
            out.font_family = family.clone();
        }
        if let Some(size) = self.font_size {
            out.font_size = size;
        }
        out.decoration.insert(self.set);
        out.decoration.remove(self.clear);
        if self.foreground.is_some() {
            out.foreground = self.foreground;
        }
        if self.background.is_some() {
            out.background = self.background;
        }
        out
    }
}
