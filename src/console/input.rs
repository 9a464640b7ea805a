// src/console/input.rs

//! Structured command input.
//!
//! An [`Input`] is the list of argument tokens handed to a command (the
//! command name itself is not part of it). Text is split the way console
//! input is usually split: whitespace separates tokens, single and double
//! quotes group, and a backslash escapes the next character inside quotes.
//! Binding tokens to a command's argument definition is done by `clap`.

use std::fmt;

use clap::ArgMatches;

use crate::errors::{AdditionsError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    tokens: Vec<String>,
}

impl Input {
    /// An empty argument set.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse argument text such as `--env=prod "some name"`.
    pub fn parse(text: &str) -> Result<Self> {
        Ok(Self {
            tokens: tokenize(text)?,
        })
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Match the tokens against `definition`, with `command_name` in the
    /// program-name position.
    pub fn bind(&self, command_name: &str, definition: clap::Command) -> Result<ArgMatches> {
        definition
            .try_get_matches_from(
                std::iter::once(command_name).chain(self.tokens.iter().map(String::as_str)),
            )
            .map_err(|e| AdditionsError::InvalidInput(e.to_string().trim_end().to_string()))
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.tokens.iter().map(|t| escape_token(t)).collect();
        f.write_str(&rendered.join(" "))
    }
}

/// Quote `token` for display unless it only contains characters that are
/// unambiguous on a command line.
pub(crate) fn escape_token(token: &str) -> String {
    let plain = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '=' | '.' | '/' | ':' | ',' | '@' | '+'));
    if plain {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r"'\''"))
    }
}

fn tokenize(text: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            '"' | '\'' => {
                in_token = true;
                let quote = c;
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == quote {
                        closed = true;
                        break;
                    }
                    if q == '\\' {
                        match chars.next() {
                            Some(escaped) => current.push(unescape(escaped)),
                            None => break,
                        }
                    } else {
                        current.push(q);
                    }
                }
                if !closed {
                    return Err(AdditionsError::InvalidInput(format!(
                        "unterminated {quote} quote in '{text}'"
                    )));
                }
            }
            '\\' if chars.peek().is_some_and(|n| matches!(n, '"' | '\'' | '\\' | ' ')) => {
                in_token = true;
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            other => {
                in_token = true;
                current.push(other);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}
