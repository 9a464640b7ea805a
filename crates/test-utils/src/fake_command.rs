use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use clap::{Arg, ArgAction, ArgMatches};
use console_additions::console::{Command, Output};
use console_additions::errors::Result;
use console_additions::types::Verbosity;

#[derive(Debug, Clone)]
enum Outcome {
    Code(i32),
    Fail(String),
}

/// A command with a fixed outcome that records the arguments of every
/// invocation.
///
/// It accepts any arguments, so it can stand in for commands given as text.
#[derive(Debug, Clone)]
pub struct FakeCommand {
    name: String,
    outcome: Outcome,
    invocations: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeCommand {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            outcome: Outcome::Code(0),
            invocations: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_code(mut self, code: i32) -> Self {
        self.outcome = Outcome::Code(code);
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.outcome = Outcome::Fail(message.to_string());
        self
    }

    /// Arguments of every invocation so far, shared with all clones.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.invocations.lock().unwrap().len()
    }
}

impl Command for FakeCommand {
    fn name(&self) -> &str {
        &self.name
    }

    fn definition(&self) -> clap::Command {
        clap::Command::new(self.name.clone()).arg(
            Arg::new("args")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
    }

    fn execute(&self, args: &ArgMatches, output: &mut dyn Output) -> Result<i32> {
        let args: Vec<String> = args
            .get_many::<String>("args")
            .map(|values| values.cloned().collect())
            .unwrap_or_default();
        self.invocations.lock().unwrap().push(args);

        output.writeln(&format!("{} ran", self.name), Verbosity::Normal)?;

        match &self.outcome {
            Outcome::Code(code) => Ok(*code),
            Outcome::Fail(message) => Err(anyhow!("{message}").into()),
        }
    }
}

/// `greet [name] [--yell] [--code N]`: writes `Hello <name>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreetCommand;

impl Command for GreetCommand {
    fn name(&self) -> &str {
        "greet"
    }

    fn definition(&self) -> clap::Command {
        clap::Command::new("greet")
            .arg(Arg::new("name").default_value("World"))
            .arg(Arg::new("yell").long("yell").action(ArgAction::SetTrue))
            .arg(
                Arg::new("code")
                    .long("code")
                    .value_parser(clap::value_parser!(i32))
                    .default_value("0"),
            )
    }

    fn execute(&self, args: &ArgMatches, output: &mut dyn Output) -> Result<i32> {
        let name = args.get_one::<String>("name").map_or("World", String::as_str);
        let greeting = format!("Hello {name}");
        let greeting = if args.get_flag("yell") {
            greeting.to_uppercase()
        } else {
            greeting
        };
        output.writeln(&greeting, Verbosity::Normal)?;
        Ok(args.get_one::<i32>("code").copied().unwrap_or(0))
    }
}
