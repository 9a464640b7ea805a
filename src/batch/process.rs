// src/batch/process.rs

//! Subprocess actions.

use std::fmt;

use crate::batch::action::Action;
use crate::console::output::Output;
use crate::errors::Result;
use crate::exec::process::Process;
use crate::types::Verbosity;

/// Runs a [`Process`], streaming its stdout to the batch output.
///
/// Stderr is buffered and available through [`ProcessAction::stderr`] after
/// the run. A process without an exit code (terminated by a signal) yields
/// `-1`.
#[derive(Debug, Clone)]
pub struct ProcessAction {
    process: Process,
    stderr: String,
}

impl ProcessAction {
    pub fn new(process: Process) -> Result<Self> {
        ensure_process_capability()?;
        Ok(Self {
            process,
            stderr: String::new(),
        })
    }

    pub fn process(&self) -> &Process {
        &self.process
    }

    /// Adjust the process (cwd, env, input, timeout) before it runs.
    pub fn process_mut(&mut self) -> &mut Process {
        &mut self.process
    }

    /// Stderr of the most recent execution.
    pub fn stderr(&self) -> &str {
        &self.stderr
    }
}

#[cfg(feature = "process")]
fn ensure_process_capability() -> Result<()> {
    Ok(())
}

#[cfg(not(feature = "process"))]
fn ensure_process_capability() -> Result<()> {
    Err(crate::errors::AdditionsError::MissingProcessCapability)
}

impl Action for ProcessAction {
    fn execute(&mut self, output: &mut dyn Output) -> Result<i32> {
        self.stderr.clear();

        let mut pending: Vec<u8> = Vec::new();
        let outcome = self.process.run(|chunk| {
            pending.extend_from_slice(chunk);
            let text = take_complete_utf8(&mut pending);
            if !text.is_empty() {
                output.write(&text, false, Verbosity::Normal)?;
            }
            Ok(())
        })?;
        if !pending.is_empty() {
            output.write(&String::from_utf8_lossy(&pending), false, Verbosity::Normal)?;
        }

        self.stderr = outcome.stderr;
        Ok(outcome.exit_code.unwrap_or(-1))
    }
}

impl fmt::Display for ProcessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.process.command_line())
    }
}

/// Convenience process action built straight from an argument vector, with
/// no timeout.
#[derive(Debug, Clone)]
pub struct ShellAction {
    inner: ProcessAction,
}

impl ShellAction {
    pub fn new<I, S>(argv: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self {
            inner: ProcessAction::new(Process::new(argv)?)?,
        })
    }

    pub fn process(&self) -> &Process {
        self.inner.process()
    }

    pub fn process_mut(&mut self) -> &mut Process {
        self.inner.process_mut()
    }

    pub fn stderr(&self) -> &str {
        self.inner.stderr()
    }
}

impl Action for ShellAction {
    fn execute(&mut self, output: &mut dyn Output) -> Result<i32> {
        self.inner.execute(output)
    }
}

impl fmt::Display for ShellAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Drain the longest valid UTF-8 prefix of `pending`, keeping an incomplete
/// trailing sequence for the next chunk.
fn take_complete_utf8(pending: &mut Vec<u8>) -> String {
    match std::str::from_utf8(pending) {
        Ok(text) => {
            let text = text.to_string();
            pending.clear();
            text
        }
        Err(e) if e.error_len().is_none() => {
            let valid = e.valid_up_to();
            let text = String::from_utf8_lossy(&pending[..valid]).into_owned();
            pending.drain(..valid);
            text
        }
        Err(_) => {
            let text = String::from_utf8_lossy(pending).into_owned();
            pending.clear();
            text
        }
    }
}
