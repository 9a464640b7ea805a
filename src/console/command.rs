// src/console/command.rs

//! Console commands.

use clap::ArgMatches;

use crate::console::input::Input;
use crate::console::output::Output;
use crate::errors::Result;

/// A named console command.
///
/// The argument definition is a `clap::Command`; [`Command::run`] binds an
/// [`Input`] against it and hands the matches to [`Command::execute`].
/// Commands are shared through `Arc`, so any state they keep across runs
/// needs interior mutability.
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    /// Argument definition. Defaults to a command accepting no arguments.
    fn definition(&self) -> clap::Command {
        clap::Command::new(self.name().to_string())
    }

    /// Command body; returns the exit code.
    fn execute(&self, args: &ArgMatches, output: &mut dyn Output) -> Result<i32>;

    fn run(&self, input: &Input, output: &mut dyn Output) -> Result<i32> {
        let matches = input.bind(self.name(), self.definition())?;
        self.execute(&matches, output)
    }
}
