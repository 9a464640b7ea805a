// src/console/application.rs

//! Command registry.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::console::command::Command;
use crate::errors::{AdditionsError, Result};

/// A named registry of commands, resolved by exact name.
#[derive(Clone)]
pub struct Application {
    name: String,
    version: Option<String>,
    commands: BTreeMap<String, Arc<dyn Command>>,
}

impl Application {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            commands: BTreeMap::new(),
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Register a command. A command with the same name is replaced.
    pub fn add(&mut self, command: Arc<dyn Command>) -> &mut Self {
        self.commands.insert(command.name().to_string(), command);
        self
    }

    pub fn get(&self, name: &str) -> Result<Arc<dyn Command>> {
        self.commands
            .get(name)
            .cloned()
            .ok_or_else(|| AdditionsError::CommandNotFound(name.to_string()))
    }

    pub fn has(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Registered command names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }
}

impl fmt::Debug for Application {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Application")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}
