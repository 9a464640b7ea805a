// src/batch/interpolate.rs

//! printf-style positional interpolation for command templates.
//!
//! Supported directives: `%s` and `%d` consume the next argument, `%N$s`
//! and `%N$d` pick argument `N` (1-based), `%%` is a literal percent sign.
//! `%d` requires an argument that renders as an integer.

use std::fmt::Display;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::errors::{AdditionsError, Result};

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%(?:(\d+)\$)?([sd%])").expect("directive regex is valid"));

pub fn interpolate(template: &str, args: &[&dyn Display]) -> Result<String> {
    if args.is_empty() {
        return Ok(template.to_string());
    }

    let mut next = 0usize;
    let mut failure: Option<AdditionsError> = None;

    let rendered = DIRECTIVE.replace_all(template, |caps: &Captures<'_>| {
        if failure.is_some() {
            return String::new();
        }
        match render_directive(template, caps, args, &mut next) {
            Ok(s) => s,
            Err(e) => {
                failure = Some(e);
                String::new()
            }
        }
    });

    match failure {
        Some(e) => Err(e),
        None => Ok(rendered.into_owned()),
    }
}

fn render_directive(
    template: &str,
    caps: &Captures<'_>,
    args: &[&dyn Display],
    next: &mut usize,
) -> Result<String> {
    let kind = &caps[2];
    if kind == "%" {
        return Ok("%".to_string());
    }

    let index = match caps.get(1) {
        Some(pos) => {
            let pos: usize = pos.as_str().parse().map_err(|_| {
                AdditionsError::Interpolation(format!("invalid position in '{template}'"))
            })?;
            if pos == 0 {
                return Err(AdditionsError::Interpolation(format!(
                    "argument positions start at 1 in '{template}'"
                )));
            }
            pos - 1
        }
        None => {
            let i = *next;
            *next += 1;
            i
        }
    };

    let arg = args.get(index).ok_or_else(|| {
        AdditionsError::Interpolation(format!(
            "'{template}' needs at least {} argument(s), got {}",
            index + 1,
            args.len()
        ))
    })?;

    let value = arg.to_string();
    if kind == "d" && value.trim().parse::<i64>().is_err() {
        return Err(AdditionsError::Interpolation(format!(
            "'{value}' is not an integer for %d in '{template}'"
        )));
    }
    Ok(value)
}
