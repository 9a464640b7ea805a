// src/console/output.rs

//! The output contract every sink in this crate conforms to.
//!
//! Implementors provide access to their [`OutputState`] and a raw
//! [`Output::do_write`]; verbosity filtering and tag formatting come from the
//! provided methods. Decorators such as the multiplexed output override the
//! provided methods to forward calls instead.

use std::io::{self, IsTerminal, Write};

use crate::console::formatter::OutputFormatter;
use crate::errors::Result;
use crate::types::Verbosity;

/// Verbosity and formatter shared by all outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputState {
    pub verbosity: Verbosity,
    pub formatter: OutputFormatter,
}

impl OutputState {
    pub fn new(verbosity: Verbosity, decorated: bool) -> Self {
        Self {
            verbosity,
            formatter: OutputFormatter::new(decorated),
        }
    }
}

pub trait Output {
    fn state(&self) -> &OutputState;

    fn state_mut(&mut self) -> &mut OutputState;

    /// Write an already formatted message to the underlying destination.
    fn do_write(&mut self, message: &str, newline: bool) -> Result<()>;

    /// Write `message` if `verbosity` does not exceed this output's verbosity.
    fn write(&mut self, message: &str, newline: bool, verbosity: Verbosity) -> Result<()> {
        if verbosity > self.verbosity() {
            return Ok(());
        }
        let formatted = self.formatter().format(message);
        self.do_write(&formatted, newline)
    }

    fn writeln(&mut self, message: &str, verbosity: Verbosity) -> Result<()> {
        self.write(message, true, verbosity)
    }

    fn verbosity(&self) -> Verbosity {
        self.state().verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.state_mut().verbosity = verbosity;
    }

    fn is_quiet(&self) -> bool {
        self.verbosity() == Verbosity::Quiet
    }

    fn is_verbose(&self) -> bool {
        self.verbosity() >= Verbosity::Verbose
    }

    fn is_very_verbose(&self) -> bool {
        self.verbosity() >= Verbosity::VeryVerbose
    }

    fn is_debug(&self) -> bool {
        self.verbosity() >= Verbosity::Debug
    }

    fn is_decorated(&self) -> bool {
        self.formatter().is_decorated()
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.state_mut().formatter.set_decorated(decorated);
    }

    fn formatter(&self) -> &OutputFormatter {
        &self.state().formatter
    }

    fn set_formatter(&mut self, formatter: OutputFormatter) {
        self.state_mut().formatter = formatter;
    }
}

/// Output writing to any `std::io::Write`.
#[derive(Debug)]
pub struct StreamOutput<W: Write> {
    writer: W,
    state: OutputState,
}

impl<W: Write> StreamOutput<W> {
    pub fn new(writer: W, verbosity: Verbosity, decorated: bool) -> Self {
        Self {
            writer,
            state: OutputState::new(verbosity, decorated),
        }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for StreamOutput<W> {
    fn state(&self) -> &OutputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    fn do_write(&mut self, message: &str, newline: bool) -> Result<()> {
        self.writer.write_all(message.as_bytes())?;
        if newline {
            self.writer.write_all(b"\n")?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Output to the process stdout.
pub type ConsoleOutput = StreamOutput<io::Stdout>;

impl StreamOutput<io::Stdout> {
    /// Stdout output, decorated when stdout is a terminal.
    pub fn stdout() -> Self {
        let stdout = io::stdout();
        let decorated = stdout.is_terminal();
        Self::new(stdout, Verbosity::Normal, decorated)
    }
}

/// In-memory output, mostly useful for capturing what commands print.
#[derive(Debug, Default)]
pub struct BufferedOutput {
    buffer: String,
    state: OutputState,
}

impl BufferedOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verbosity(verbosity: Verbosity) -> Self {
        Self {
            buffer: String::new(),
            state: OutputState::new(verbosity, false),
        }
    }

    pub fn contents(&self) -> &str {
        &self.buffer
    }

    /// Return the buffered content and empty the buffer.
    pub fn fetch(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

impl Output for BufferedOutput {
    fn state(&self) -> &OutputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    fn do_write(&mut self, message: &str, newline: bool) -> Result<()> {
        self.buffer.push_str(message);
        if newline {
            self.buffer.push('\n');
        }
        Ok(())
    }
}

/// Output that discards everything.
#[derive(Debug, Default)]
pub struct NullOutput {
    state: OutputState,
}

impl NullOutput {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Output for NullOutput {
    fn state(&self) -> &OutputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    fn do_write(&mut self, _message: &str, _newline: bool) -> Result<()> {
        Ok(())
    }
}
