// src/config/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::config::model::{BatchFile, RawBatchFile};
use crate::errors::Result;

/// Load a batch file from `path` and return the raw `RawBatchFile`.
///
/// This only performs TOML deserialization; it does **not** check action
/// types, required fields or output kinds. Use [`load_and_validate`] for
/// that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawBatchFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawBatchFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a batch file from `path` and validate it.
///
/// Relative paths inside the file (file outputs, shell working
/// directories) resolve against the directory containing it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BatchFile> {
    let path = path.as_ref();
    let raw = load_from_path(path)?;
    let file = BatchFile::try_from(raw)?;

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir()?,
    };
    debug!(
        path = %path.display(),
        actions = file.actions.len(),
        outputs = file.outputs.len(),
        "loaded batch file"
    );

    Ok(file.with_base_dir(base_dir))
}

/// Parse and validate batch file contents held in memory. Relative paths
/// are left as they are.
pub fn parse_str(contents: &str) -> Result<BatchFile> {
    let raw: RawBatchFile = toml::from_str(contents)?;
    BatchFile::try_from(raw)
}
