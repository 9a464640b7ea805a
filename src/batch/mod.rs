// src/batch/mod.rs

//! Batching of console commands, subprocesses and messages.
//!
//! A [`Batch`] runs its actions strictly in insertion order against one
//! output and records every exit code in a [`ReturnCodeStack`]:
//!
//! ```no_run
//! # use std::sync::Arc;
//! # use console_additions::batch::Batch;
//! # use console_additions::console::{Application, ConsoleOutput};
//! # fn main() -> console_additions::errors::Result<()> {
//! let app = Arc::new(Application::new("deploy"));
//! let mut output = ConsoleOutput::stdout();
//! let mut batch = Batch::new(app, &mut output);
//! batch
//!     .add("cache:clear --env=%s", &[&"prod"])?
//!     .add_shell(["git", "pull", "--ff-only"])?
//!     .add_message("<info>done</info>", true, Default::default());
//! let last_code = batch.run()?;
//! # let _ = last_code;
//! # Ok(())
//! # }
//! ```
//!
//! - [`run`](Batch::run) is fail-fast: the first error aborts the run and is
//!   returned; actions already executed keep their recorded codes.
//! - [`run_silent`](Batch::run_silent) keeps the error for inspection and
//!   returns `-1` instead.
//! - Every run starts with a fresh return-code stack and returns the code of
//!   the last action (0 for an empty batch).

pub mod action;
pub mod instance_command;
pub mod interpolate;
pub mod message;
pub mod process;
pub mod return_codes;
pub mod string_command;

#[cfg(test)]
pub(crate) mod testing;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

pub use action::Action;
pub use instance_command::InstanceCommandAction;
pub use message::MessageAction;
pub use process::{ProcessAction, ShellAction};
pub use return_codes::ReturnCodeStack;
pub use string_command::StringCommandAction;

use crate::console::application::Application;
use crate::console::command::Command;
use crate::console::input::Input;
use crate::console::output::Output;
use crate::errors::{AdditionsError, Result};
use crate::exec::process::Process;
use crate::types::Verbosity;

pub struct Batch<'o> {
    application: Arc<Application>,
    output: &'o mut dyn Output,
    actions: Vec<Box<dyn Action>>,
    return_codes: ReturnCodeStack,
    last_error: Option<AdditionsError>,
    has_run: bool,
}

impl<'o> Batch<'o> {
    pub fn new(application: Arc<Application>, output: &'o mut dyn Output) -> Self {
        Self {
            application,
            output,
            actions: Vec::new(),
            return_codes: ReturnCodeStack::new(),
            last_error: None,
            has_run: false,
        }
    }

    pub fn application(&self) -> &Arc<Application> {
        &self.application
    }

    pub fn output(&mut self) -> &mut dyn Output {
        &mut *self.output
    }

    pub fn set_output(&mut self, output: &'o mut dyn Output) -> &mut Self {
        self.output = output;
        self
    }

    pub fn actions(&self) -> &[Box<dyn Action>] {
        &self.actions
    }

    /// Append an action, attaching the batch's application to it.
    pub fn add_action(&mut self, mut action: Box<dyn Action>) -> &mut Self {
        action.attach_application(Arc::clone(&self.application));
        self.actions.push(action);
        self
    }

    /// Append every action in order.
    pub fn set_actions<I>(&mut self, actions: I) -> &mut Self
    where
        I: IntoIterator<Item = Box<dyn Action>>,
    {
        for action in actions {
            self.add_action(action);
        }
        self
    }

    /// Add a command given as text. `args` are interpolated into `template`
    /// (`%s`, `%d`, `%N$s`, `%%`) before the text is parsed.
    pub fn add(&mut self, template: &str, args: &[&dyn fmt::Display]) -> Result<&mut Self> {
        let command = interpolate::interpolate(template, args)?;
        Ok(self.add_action(Box::new(StringCommandAction::new(command))))
    }

    /// Add an already constructed command. `None` input means no arguments.
    pub fn add_command_instance(&mut self, command: Arc<dyn Command>, input: Option<Input>) -> &mut Self {
        self.add_action(Box::new(InstanceCommandAction::new(command, input)))
    }

    pub fn add_message(&mut self, message: impl Into<String>, newline: bool, verbosity: Verbosity) -> &mut Self {
        self.add_action(Box::new(MessageAction::new(message, newline, verbosity)))
    }

    /// Add a subprocess given as an argument vector.
    pub fn add_shell<I, S>(&mut self, argv: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let action = ShellAction::new(argv)?;
        Ok(self.add_action(Box::new(action)))
    }

    /// Like [`add_shell`](Self::add_shell), letting `configure` set the
    /// working directory, environment, stdin input or timeout first.
    pub fn add_shell_with<I, S, F>(&mut self, argv: I, configure: F) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: FnOnce(&mut Process),
    {
        let mut action = ShellAction::new(argv)?;
        configure(action.process_mut());
        Ok(self.add_action(Box::new(action)))
    }

    pub fn add_process(&mut self, process: Process) -> Result<&mut Self> {
        let action = ProcessAction::new(process)?;
        Ok(self.add_action(Box::new(action)))
    }

    /// Execute every action in order, returning the last exit code.
    pub fn run(&mut self) -> Result<i32> {
        let count = self.actions.len();
        debug!(actions = count, application = %self.application.name(), "running batch");
        self.has_run = true;
        self.return_codes = ReturnCodeStack::new();

        self.output
            .writeln(&format!("Running {count} actions..."), Verbosity::Verbose)?;

        for (index, action) in self.actions.iter_mut().enumerate() {
            debug!(index, action = %action, "next action");
            let code = run_action(&mut *self.output, action.as_mut())?;
            self.return_codes.push(code);
        }

        Ok(self.return_codes.last().unwrap_or(0))
    }

    /// Execute a single action against the batch output without recording
    /// its code.
    pub fn run_one(&mut self, action: &mut dyn Action) -> Result<i32> {
        run_action(&mut *self.output, action)
    }

    /// Like [`run`](Self::run) but never fails: an error is stored (see
    /// [`last_error`](Self::last_error)) and `-1` is returned.
    pub fn run_silent(&mut self) -> i32 {
        self.last_error = None;
        match self.run() {
            Ok(code) => code,
            Err(err) => {
                warn!(error = %err, "batch run failed");
                self.last_error = Some(err);
                -1
            }
        }
    }

    pub fn has_run(&self) -> bool {
        self.has_run
    }

    pub fn has_error(&self) -> bool {
        self.last_error.is_some()
    }

    pub fn last_error(&self) -> Option<&AdditionsError> {
        self.last_error.as_ref()
    }

    pub fn take_last_error(&mut self) -> Option<AdditionsError> {
        self.last_error.take()
    }

    pub fn all_actions_succeeded(&self) -> bool {
        self.return_codes.all_successful()
    }

    pub fn at_least_one_action_failed(&self) -> bool {
        self.return_codes.any_errored()
    }

    /// Exit codes of the latest run in execution order.
    pub fn all_return_codes(&self) -> &[i32] {
        self.return_codes.all()
    }

    pub fn return_codes(&self) -> &ReturnCodeStack {
        &self.return_codes
    }
}

fn run_action(output: &mut dyn Output, action: &mut dyn Action) -> Result<i32> {
    output.writeln(&format!("Next action: {action}"), Verbosity::Verbose)?;
    let code = action.execute(output)?;
    debug!(exit_code = code, "action finished");
    Ok(code)
}

impl fmt::Display for Batch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lines: Vec<String> = self.actions.iter().map(|a| a.to_string()).collect();
        f.write_str(&lines.join("\n"))
    }
}

impl fmt::Debug for Batch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Batch")
            .field("application", &self.application.name())
            .field("actions", &self.actions)
            .field("return_codes", &self.return_codes)
            .field("last_error", &self.last_error)
            .field("has_run", &self.has_run)
            .finish()
    }
}
