// src/batch/string_command.rs

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::batch::action::Action;
use crate::console::application::Application;
use crate::console::input::Input;
use crate::console::output::Output;
use crate::errors::{AdditionsError, Result};

/// A command given as text, e.g. `cache:clear --env=prod`.
///
/// The command is resolved lazily: the name (text up to the first
/// whitespace) is looked up in the attached application when the action
/// executes, and the rest of the text becomes the command input.
#[derive(Debug, Clone)]
pub struct StringCommandAction {
    command_string: String,
    application: Option<Arc<Application>>,
}

impl StringCommandAction {
    pub fn new(command_string: impl Into<String>) -> Self {
        Self {
            command_string: command_string.into(),
            application: None,
        }
    }

    pub fn with_application(mut self, application: Arc<Application>) -> Self {
        self.application = Some(application);
        self
    }

    pub fn command_string(&self) -> &str {
        &self.command_string
    }

    /// Split the command text into the command name and its input.
    pub fn parse(&self) -> Result<(&str, Input)> {
        let text = self.command_string.trim();
        let (name, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        if name.is_empty() {
            return Err(AdditionsError::CommandNotFound(String::new()));
        }
        Ok((name, Input::parse(rest)?))
    }
}

impl Action for StringCommandAction {
    fn execute(&mut self, output: &mut dyn Output) -> Result<i32> {
        let application = self
            .application
            .as_ref()
            .ok_or(AdditionsError::MissingApplication)?;
        let (name, input) = self.parse()?;
        let command = application.get(name)?;

        debug!(command = %name, input = %input, "running command from string");
        command.run(&input, output)
    }

    fn attach_application(&mut self, application: Arc<Application>) {
        self.application = Some(application);
    }
}

impl fmt::Display for StringCommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.application {
            Some(app) => write!(f, "{}", format!("{} {}", app.name(), self.command_string).trim()),
            None => f.write_str(self.command_string.trim()),
        }
    }
}
