// src/config/model.rs

//! Data model for batch files.
//!
//! `Raw*` types mirror the TOML layout one to one and are produced by
//! `serde`; the validated counterparts ([`BatchFile`], [`ActionConfig`],
//! [`OutputConfig`]) are what the rest of the crate consumes.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::types::{Verbosity, WriteMode};

/// The `[batch]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchSection {
    /// Only used to label log events.
    pub name: Option<String>,
    pub verbosity: Verbosity,
    pub decorated: bool,
    /// Run with `run_silent` instead of `run`.
    pub silent: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBatchFile {
    #[serde(default)]
    pub batch: BatchSection,

    #[serde(default, rename = "output")]
    pub outputs: Vec<RawOutputConfig>,

    #[serde(default, rename = "action")]
    pub actions: Vec<RawActionConfig>,
}

/// One `[[output]]` entry before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOutputConfig {
    pub kind: String,
    pub path: Option<PathBuf>,
    pub mode: Option<String>,
    #[serde(default)]
    pub debounce_ms: u64,
}

/// One `[[action]]` entry before validation. Which fields are required
/// depends on `type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawActionConfig {
    #[serde(rename = "type")]
    pub kind: String,

    // type = "command"
    pub command: Option<String>,
    #[serde(default)]
    pub args: Vec<ArgValue>,

    // type = "shell"
    pub argv: Option<Vec<String>>,
    pub cwd: Option<PathBuf>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
    pub input: Option<String>,
    pub timeout_secs: Option<u64>,

    // type = "message"
    pub text: Option<String>,
    pub newline: Option<bool>,
    pub verbosity: Option<Verbosity>,
}

/// A scalar interpolated into a command template.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Integer(i) => write!(f, "{i}"),
            ArgValue::Float(x) => write!(f, "{x}"),
            ArgValue::Bool(b) => write!(f, "{b}"),
            ArgValue::String(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActionConfig {
    Command {
        command: String,
        args: Vec<ArgValue>,
    },
    Shell {
        argv: Vec<String>,
        cwd: Option<PathBuf>,
        env: BTreeMap<String, String>,
        input: Option<String>,
        timeout: Option<Duration>,
    },
    Message {
        text: String,
        newline: bool,
        verbosity: Verbosity,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputConfig {
    Console,
    Null,
    File {
        path: PathBuf,
        mode: WriteMode,
        debounce: Duration,
    },
    /// A file on the storage backend handed to `build_output`. The path is
    /// relative to the backend's root.
    Storage {
        path: PathBuf,
        mode: WriteMode,
        debounce: Duration,
    },
}

/// A validated batch file.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchFile {
    pub batch: BatchSection,
    pub outputs: Vec<OutputConfig>,
    pub actions: Vec<ActionConfig>,
    base_dir: Option<PathBuf>,
}

impl BatchFile {
    /// Construct without validation. Use `TryFrom<RawBatchFile>` instead
    /// unless the parts are already known to be valid.
    pub fn new_unchecked(batch: BatchSection, outputs: Vec<OutputConfig>, actions: Vec<ActionConfig>) -> Self {
        Self {
            batch,
            outputs,
            actions,
            base_dir: None,
        }
    }

    /// Directory relative paths in this file are resolved against.
    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub(crate) fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }
}
