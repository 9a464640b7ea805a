// src/console/formatter.rs

//! Style-tag formatter for console messages.
//!
//! Messages may contain tags such as `<info>done</info>`. A decorated
//! formatter replaces known tags with ANSI escape sequences; an undecorated
//! one strips them. Unknown tags are left untouched so literal text such as
//! `<path>` survives.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<(/?)([a-z][a-z0-9_-]*)?>").expect("style tag regex is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

impl Color {
    fn offset(self) -> u8 {
        match self {
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
        }
    }
}

/// An ANSI style: the sequence that switches it on and the one that resets it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    set: String,
    unset: String,
}

impl Style {
    pub fn new(foreground: Option<Color>, background: Option<Color>, bold: bool) -> Self {
        let mut set = Vec::new();
        let mut unset = Vec::new();
        if let Some(fg) = foreground {
            set.push((30 + fg.offset()).to_string());
            unset.push("39".to_string());
        }
        if let Some(bg) = background {
            set.push((40 + bg.offset()).to_string());
            unset.push("49".to_string());
        }
        if bold {
            set.push("1".to_string());
            unset.push("22".to_string());
        }

        Self {
            set: format!("\x1b[{}m", set.join(";")),
            unset: format!("\x1b[{}m", unset.join(";")),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        format!("{}{}{}", self.set, text, self.unset)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFormatter {
    decorated: bool,
    styles: BTreeMap<String, Style>,
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false)
    }
}

impl OutputFormatter {
    /// Create a formatter with the stock `error`, `info`, `comment` and
    /// `question` styles.
    pub fn new(decorated: bool) -> Self {
        let mut styles = BTreeMap::new();
        styles.insert(
            "error".to_string(),
            Style::new(Some(Color::White), Some(Color::Red), false),
        );
        styles.insert("info".to_string(), Style::new(Some(Color::Green), None, false));
        styles.insert("comment".to_string(), Style::new(Some(Color::Yellow), None, false));
        styles.insert(
            "question".to_string(),
            Style::new(Some(Color::Black), Some(Color::Cyan), false),
        );

        Self { decorated, styles }
    }

    pub fn is_decorated(&self) -> bool {
        self.decorated
    }

    pub fn set_decorated(&mut self, decorated: bool) {
        self.decorated = decorated;
    }

    pub fn set_style(&mut self, name: impl Into<String>, style: Style) {
        self.styles.insert(name.into().to_lowercase(), style);
    }

    pub fn has_style(&self, name: &str) -> bool {
        self.styles.contains_key(&name.to_lowercase())
    }

    /// Render all known style tags in `message`.
    ///
    /// `</>` closes the innermost open style. Closing tags that do not match
    /// the innermost style are kept as literal text.
    pub fn format(&self, message: &str) -> String {
        let mut out = String::with_capacity(message.len());
        let mut stack: Vec<(&str, &Style)> = Vec::new();
        let mut last = 0;

        for caps in TAG.captures_iter(message) {
            let Some(whole) = caps.get(0) else { continue };
            let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
            let name = caps.get(2).map(|m| m.as_str());

            let handled = if closing {
                match name {
                    None => !stack.is_empty(),
                    Some(n) => stack.last().is_some_and(|(top, _)| *top == n),
                }
            } else {
                name.is_some_and(|n| self.styles.contains_key(n))
            };
            if !handled {
                continue;
            }

            out.push_str(&message[last..whole.start()]);
            last = whole.end();

            if closing {
                if let Some((_, style)) = stack.pop() {
                    if self.decorated {
                        out.push_str(&style.unset);
                        if let Some((_, outer)) = stack.last() {
                            out.push_str(&outer.set);
                        }
                    }
                }
            } else if let Some((n, style)) = name.and_then(|n| self.styles.get_key_value(n)) {
                if self.decorated {
                    out.push_str(&style.set);
                }
                stack.push((n.as_str(), style));
            }
        }

        out.push_str(&message[last..]);
        out
    }
}
