// src/batch/instance_command.rs

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::batch::action::Action;
use crate::console::application::Application;
use crate::console::command::Command;
use crate::console::input::Input;
use crate::console::output::Output;
use crate::errors::Result;

/// An already constructed command together with its input.
pub struct InstanceCommandAction {
    command: Arc<dyn Command>,
    input: Input,
    application: Option<Arc<Application>>,
}

impl InstanceCommandAction {
    /// `None` input runs the command with an empty argument set.
    pub fn new(command: Arc<dyn Command>, input: Option<Input>) -> Self {
        Self {
            command,
            input: input.unwrap_or_default(),
            application: None,
        }
    }

    pub fn command(&self) -> &Arc<dyn Command> {
        &self.command
    }

    pub fn input(&self) -> &Input {
        &self.input
    }
}

impl Action for InstanceCommandAction {
    fn execute(&mut self, output: &mut dyn Output) -> Result<i32> {
        debug!(command = %self.command.name(), input = %self.input, "running command instance");
        self.command.run(&self.input, output)
    }

    fn attach_application(&mut self, application: Arc<Application>) {
        self.application = Some(application);
    }
}

impl fmt::Display for InstanceCommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let app_name = self.application.as_ref().map_or("", |app| app.name());
        let rendered = format!("{} {} {}", app_name, self.command.name(), self.input);
        f.write_str(rendered.trim())
    }
}

impl fmt::Debug for InstanceCommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceCommandAction")
            .field("command", &self.command.name())
            .field("input", &self.input)
            .finish()
    }
}
