// src/batch/action.rs

//! The unit of work a batch runs.

use std::fmt;
use std::sync::Arc;

use crate::console::application::Application;
use crate::console::output::Output;
use crate::errors::Result;

/// A batched unit of work producing an exit code.
///
/// `Display` renders a human readable description, used when the batch
/// announces the next action and when a batch is printed.
pub trait Action: fmt::Display {
    fn execute(&mut self, output: &mut dyn Output) -> Result<i32>;

    /// Give the action access to the command registry. Only command actions
    /// care; the batch calls this for every action it accepts.
    fn attach_application(&mut self, _application: Arc<Application>) {}
}

impl fmt::Debug for dyn Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({self})")
    }
}
