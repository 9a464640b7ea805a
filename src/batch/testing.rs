// src/batch/testing.rs

//! Fixtures shared by the batch unit tests.

use std::sync::Arc;

use anyhow::anyhow;
use clap::{Arg, ArgAction, ArgMatches};

use crate::console::application::Application;
use crate::console::command::Command;
use crate::console::output::Output;
use crate::errors::Result;
use crate::types::Verbosity;

/// Writes `Hello <name>`; fails when `--throw-exception` is given and exits
/// with `--code` otherwise.
pub(crate) struct TestCommand;

impl Command for TestCommand {
    fn name(&self) -> &str {
        "testCommand"
    }

    fn definition(&self) -> clap::Command {
        clap::Command::new("testCommand")
            .arg(Arg::new("name").default_value("Test"))
            .arg(
                Arg::new("throw-exception")
                    .long("throw-exception")
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("code")
                    .long("code")
                    .value_parser(clap::value_parser!(i32))
                    .default_value("0"),
            )
    }

    fn execute(&self, args: &ArgMatches, output: &mut dyn Output) -> Result<i32> {
        let name = args.get_one::<String>("name").map_or("Test", String::as_str);
        output.write(&format!("Hello {name}"), false, Verbosity::Normal)?;

        if args.get_flag("throw-exception") {
            return Err(anyhow!("Testing exception cascading").into());
        }

        Ok(args.get_one::<i32>("code").copied().unwrap_or(0))
    }
}

pub(crate) fn test_app() -> Arc<Application> {
    let mut app = Application::new("testApp");
    app.add(Arc::new(TestCommand));
    Arc::new(app)
}
