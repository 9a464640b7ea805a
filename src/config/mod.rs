// src/config/mod.rs

//! Batch files: TOML descriptions of a batch's actions and outputs.

pub mod build;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{ActionConfig, ArgValue, BatchFile, BatchSection, OutputConfig};
