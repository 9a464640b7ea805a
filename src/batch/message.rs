// src/batch/message.rs

use std::fmt;

use crate::batch::action::Action;
use crate::console::output::Output;
use crate::errors::Result;
use crate::types::Verbosity;

/// Writes a literal message. Always succeeds with exit code 0 (write errors
/// from the output still propagate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageAction {
    message: String,
    newline: bool,
    verbosity: Verbosity,
}

impl MessageAction {
    pub fn new(message: impl Into<String>, newline: bool, verbosity: Verbosity) -> Self {
        Self {
            message: message.into(),
            newline,
            verbosity,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Action for MessageAction {
    fn execute(&mut self, output: &mut dyn Output) -> Result<i32> {
        output.write(&self.message, self.newline, self.verbosity)?;
        Ok(0)
    }
}

impl fmt::Display for MessageAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if self.newline {
            f.write_str("\n")?;
        }
        Ok(())
    }
}
