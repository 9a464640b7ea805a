// src/output/file.rs

//! File-backed output with optional write debouncing.
//!
//! [`FileOutput`] buffers formatted messages and hands them to a
//! [`FileSink`]. With a zero debounce interval every write is flushed right
//! away; otherwise pending bytes are flushed only once the interval has
//! elapsed since the last flush. Pending bytes are always flushed before the
//! sink is released: explicitly via [`FileOutput::flush`], or on drop.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::warn;

use crate::console::output::{Output, OutputState};
use crate::errors::Result;
use crate::types::{Verbosity, WriteMode};

/// Backing resource of a [`FileOutput`].
pub trait FileSink: fmt::Debug {
    /// Human readable identifier of the target (usually its path).
    fn target(&self) -> String;

    fn write_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    /// Make everything written so far durable / visible.
    fn flush(&mut self) -> Result<()>;
}

#[derive(Debug)]
pub struct FileOutput<S: FileSink> {
    sink: S,
    state: OutputState,
    mode: WriteMode,
    debounce: Duration,
    pending: Vec<u8>,
    last_flush: Instant,
}

impl<S: FileSink> FileOutput<S> {
    /// Wrap an already opened sink. File outputs are never decorated by
    /// default.
    pub fn from_sink(sink: S, mode: WriteMode) -> Self {
        Self {
            sink,
            state: OutputState::new(Verbosity::Normal, false),
            mode,
            debounce: Duration::ZERO,
            pending: Vec::new(),
            last_flush: Instant::now(),
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.state.verbosity = verbosity;
        self
    }

    pub fn write_mode(&self) -> WriteMode {
        self.mode
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Coalesce writes for `interval`. Zero disables debouncing.
    pub fn set_debounce(&mut self, interval: Duration) -> &mut Self {
        self.debounce = interval;
        self
    }

    pub fn set_debounce_millis(&mut self, millis: u64) -> &mut Self {
        self.set_debounce(Duration::from_millis(millis))
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Write all pending bytes to the sink now, regardless of the debounce
    /// interval.
    pub fn flush(&mut self) -> Result<()> {
        if !self.pending.is_empty() {
            self.sink.write_bytes(&self.pending)?;
            self.pending.clear();
        }
        self.sink.flush()?;
        self.last_flush = Instant::now();
        Ok(())
    }

    fn flush_due(&self) -> bool {
        self.debounce.is_zero() || self.last_flush.elapsed() >= self.debounce
    }
}

impl<S: FileSink> Output for FileOutput<S> {
    fn state(&self) -> &OutputState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut OutputState {
        &mut self.state
    }

    fn do_write(&mut self, message: &str, newline: bool) -> Result<()> {
        self.pending.extend_from_slice(message.as_bytes());
        if newline {
            self.pending.push(b'\n');
        }

        if self.flush_due() {
            self.flush()?;
        }
        Ok(())
    }
}

impl<S: FileSink> Drop for FileOutput<S> {
    fn drop(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        if let Err(err) = self.flush() {
            warn!(
                target_file = %self.sink.target(),
                error = %err,
                "failed to flush buffered output on drop"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Sink recording what reached it, shared with the test.
    #[derive(Debug, Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl SharedSink {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl FileSink for SharedSink {
        fn target(&self) -> String {
            "shared".to_string()
        }

        fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
            self.0.lock().unwrap().extend_from_slice(bytes);
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn writes_through_without_debounce() {
        let sink = SharedSink::default();
        let mut out = FileOutput::from_sink(sink.clone(), WriteMode::Append);
        out.writeln("<info>line</info>", Verbosity::Normal).unwrap();
        assert_eq!(sink.text(), "line\n");
        assert!(!out.has_pending());
        assert!(!out.is_decorated());
    }

    #[test]
    fn debounced_writes_wait_for_the_interval() {
        let sink = SharedSink::default();
        let mut out = FileOutput::from_sink(sink.clone(), WriteMode::Append);
        out.set_debounce_millis(150);

        out.write("message", false, Verbosity::Normal).unwrap();
        assert_eq!(sink.text(), "");
        assert!(out.has_pending());

        std::thread::sleep(Duration::from_millis(200));
        out.write("", false, Verbosity::Normal).unwrap();
        assert_eq!(sink.text(), "message");
    }

    #[test]
    fn drop_flushes_pending_writes() {
        let sink = SharedSink::default();
        {
            let mut out = FileOutput::from_sink(sink.clone(), WriteMode::Append);
            out.set_debounce(Duration::from_secs(60));
            out.write("kept", false, Verbosity::Normal).unwrap();
            assert_eq!(sink.text(), "");
        }
        assert_eq!(sink.text(), "kept");
    }

    #[test]
    fn explicit_flush_ignores_interval() {
        let sink = SharedSink::default();
        let mut out = FileOutput::from_sink(sink.clone(), WriteMode::Reset);
        out.set_debounce(Duration::from_secs(60));
        out.write("now", true, Verbosity::Normal).unwrap();
        out.flush().unwrap();
        assert_eq!(sink.text(), "now\n");
        assert_eq!(out.write_mode(), WriteMode::Reset);
    }

    #[test]
    fn verbosity_filters_before_buffering() {
        let sink = SharedSink::default();
        let mut out = FileOutput::from_sink(sink.clone(), WriteMode::Append).with_verbosity(Verbosity::Quiet);
        out.writeln("dropped", Verbosity::Normal).unwrap();
        assert!(!out.has_pending());
        assert_eq!(sink.text(), "");
    }
}
