#![allow(dead_code)]

use std::sync::Arc;

use console_additions::console::Application;
use console_additions_test_utils::builders::ApplicationBuilder;
use console_additions_test_utils::{FakeCommand, GreetCommand};

pub use console_additions_test_utils::init_tracing;

/// An application with `greet`, a succeeding `ok` and a failing `boom`.
pub fn sample_app() -> (Arc<Application>, FakeCommand, FakeCommand) {
    let ok = FakeCommand::new("ok");
    let boom = FakeCommand::new("boom").failing("boom went the command");
    let app = ApplicationBuilder::new("sample")
        .with_version("1.0.0")
        .with_command(GreetCommand)
        .with_command(ok.clone())
        .with_command(boom.clone())
        .build();
    (app, ok, boom)
}
