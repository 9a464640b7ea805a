// src/output/multiplexed.rs

//! Fan-out output forwarding every call to a list of sinks.

use std::fmt;

use crate::console::formatter::OutputFormatter;
use crate::console::output::{Output, OutputState};
use crate::errors::Result;
use crate::types::Verbosity;

/// Broadcasts writes and state changes to its sinks in registration order.
///
/// Each sink formats messages itself with the formatter mirrored onto it,
/// so all sinks share one decoration state. Sinks registered later take
/// over the multiplexer's verbosity, formatter and decoration.
pub struct MultiplexedOutput {
    sinks: Vec<Box<dyn Output>>,
    state: OutputState,
}

impl MultiplexedOutput {
    pub fn new(sinks: Vec<Box<dyn Output>>) -> Self {
        Self::with_state(sinks, Verbosity::Normal, false, OutputFormatter::default())
    }

    pub fn with_state(
        sinks: Vec<Box<dyn Output>>,
        verbosity: Verbosity,
        decorated: bool,
        mut formatter: OutputFormatter,
    ) -> Self {
        formatter.set_decorated(decorated);
        let mut out = Self {
            sinks: Vec::with_capacity(sinks.len()),
            state: OutputState {
                verbosity,
                formatter,
            },
        };
        for sink in sinks {
            out.push(sink);
        }
        out
    }

    pub fn push(&mut self, mut sink: Box<dyn Output>) -> &mut Self {
        sink.set_verbosity(self.state.verbosity);
        sink.set_formatter(self.state.formatter.clone());
        self.sinks.push(sink);
        self
    }

    pub fn sinks(&self) -> &[Box<dyn Output>] {
        &self.sinks
    }

    pub fn sinks_mut(&mut self) -> &mut [Box<dyn Output>] {
        &mut self.sinks
    }

    pub fn into_sinks(self) -> Vec<Box<dyn Output>> {
        self.sinks
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Run `f` on every sink, even after a failure; the first error wins.
    fn broadcast(&mut self, mut f: impl FnMut(&mut dyn Output) -> Result<()>) -> Result<()> {
        let mut first_error = None;
        for sink in &mut self.sinks {
            if let Err(err) = f(sink.as_mut()) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for MultiplexedOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiplexedOutput")
            .field("sinks", &self.sinks.len())
            .field("state", &self.state)
            .finish()
    }
}

impl Output for MultiplexedOutput {
    fn state(&self) -> &OutputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    fn do_write(&mut self, message: &str, newline: bool) -> Result<()> {
        self.broadcast(|sink| sink.do_write(message, newline))
    }

    fn write(&mut self, message: &str, newline: bool, verbosity: Verbosity) -> Result<()> {
        self.broadcast(|sink| sink.write(message, newline, verbosity))
    }

    fn writeln(&mut self, message: &str, verbosity: Verbosity) -> Result<()> {
        self.broadcast(|sink| sink.writeln(message, verbosity))
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.state.verbosity = verbosity;
        for sink in &mut self.sinks {
            sink.set_verbosity(verbosity);
        }
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.state.formatter.set_decorated(decorated);
        for sink in &mut self.sinks {
            sink.set_decorated(decorated);
        }
    }

    fn set_formatter(&mut self, formatter: OutputFormatter) {
        for sink in &mut self.sinks {
            sink.set_formatter(formatter.clone());
        }
        self.state.formatter = formatter;
    }
}
