// src/exec/mod.rs

//! Subprocess execution.
//!
//! [`process::Process`] describes a command line together with its working
//! directory, environment, stdin and timeout, and runs it while streaming
//! stdout to a callback. Running requires the `process` cargo feature.

pub mod process;

pub use process::{Process, ProcessOutcome};
