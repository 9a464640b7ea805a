use std::sync::{Arc, Mutex};

use console_additions::console::output::{Output, OutputState};
use console_additions::errors::Result;
use console_additions::types::Verbosity;

/// One call observed by a [`RecordingOutput`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    Write {
        sink: String,
        message: String,
        newline: bool,
    },
    Verbosity {
        sink: String,
        verbosity: Verbosity,
    },
    Decorated {
        sink: String,
        decorated: bool,
    },
}

/// An output that records every write and state change into a log that
/// can be shared between several outputs, so the order in which a
/// multiplexer reaches its sinks is observable.
#[derive(Debug, Clone)]
pub struct RecordingOutput {
    name: String,
    state: OutputState,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl RecordingOutput {
    pub fn new(name: &str) -> Self {
        Self::shared(name, Arc::new(Mutex::new(Vec::new())))
    }

    pub fn shared(name: &str, log: Arc<Mutex<Vec<Recorded>>>) -> Self {
        Self {
            name: name.to_string(),
            state: OutputState::default(),
            log,
        }
    }

    pub fn log(&self) -> Arc<Mutex<Vec<Recorded>>> {
        Arc::clone(&self.log)
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    /// Concatenation of everything this output was asked to write.
    pub fn text(&self) -> String {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Recorded::Write {
                    sink,
                    message,
                    newline,
                } if sink == self.name => Some(if newline { format!("{message}\n") } else { message }),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Recorded) {
        self.log.lock().unwrap().push(call);
    }
}

impl Output for RecordingOutput {
    fn state(&self) -> &OutputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    fn do_write(&mut self, message: &str, newline: bool) -> Result<()> {
        self.record(Recorded::Write {
            sink: self.name.clone(),
            message: message.to_string(),
            newline,
        });
        Ok(())
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.state.verbosity = verbosity;
        self.record(Recorded::Verbosity {
            sink: self.name.clone(),
            verbosity,
        });
    }

    fn set_decorated(&mut self, decorated: bool) {
        self.state.formatter.set_decorated(decorated);
        self.record(Recorded::Decorated {
            sink: self.name.clone(),
            decorated,
        });
    }
}
