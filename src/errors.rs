// src/errors.rs

//! Crate-wide error type and `Result` alias.

use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdditionsError {
    #[error("Command \"{0}\" is not defined")]
    CommandNotFound(String),

    #[error("Command actions need an application to resolve and describe commands")]
    MissingApplication,

    #[error("Invalid action set: {0}")]
    InvalidActionSet(String),

    #[error("Invalid shell command: {0}")]
    InvalidShellCommand(String),

    #[error("Process execution is unavailable, build with the `process` feature to run subprocesses")]
    MissingProcessCapability,

    #[error("Process '{command}' exceeded the timeout of {timeout:?}")]
    ProcessTimedOut { command: String, timeout: Duration },

    #[error("Failed to open '{path}' for writing: {reason}")]
    FileOpen { path: String, reason: String },

    #[error("The write mode '{0}' is not supported")]
    InvalidWriteMode(String),

    #[error("Output '{0}' does not implement the output interface")]
    UnsupportedOutput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Interpolation error: {0}")]
    Interpolation(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AdditionsError>;
