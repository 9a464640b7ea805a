// src/console/mod.rs

//! Host console contract: outputs, formatter, input, commands and the
//! command registry the batch resolves against.

pub mod application;
pub mod command;
pub mod formatter;
pub mod input;
pub mod output;

pub use application::Application;
pub use command::Command;
pub use formatter::{Color, OutputFormatter, Style};
pub use input::Input;
pub use output::{BufferedOutput, ConsoleOutput, NullOutput, Output, OutputState, StreamOutput};
