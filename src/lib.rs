// src/lib.rs

pub mod batch;
pub mod config;
pub mod console;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod output;
pub mod storage;
pub mod types;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

pub use crate::batch::{
    Action, Batch, InstanceCommandAction, MessageAction, ProcessAction, ReturnCodeStack, ShellAction,
    StringCommandAction,
};
pub use crate::console::{Application, Command, Input, Output};
pub use crate::errors::{AdditionsError, Result};
pub use crate::exec::Process;
pub use crate::output::{MultiplexedOutput, NativeFileOutput, StorageFileOutput};
pub use crate::storage::{LocalStorage, Storage};
pub use crate::types::{Verbosity, WriteMode};

use crate::config::loader::load_and_validate;

/// Load the batch file at `path`, run it against `application` and return
/// the exit code of the last action.
///
/// The file's `[[output]]` entries decide where output goes; `storage`
/// backs any `kind = "storage"` outputs. With `silent = true` in the
/// `[batch]` table errors are logged and reported as `-1` instead of being
/// returned.
pub fn run_batch_file(
    path: impl AsRef<Path>,
    application: Arc<Application>,
    storage: Option<Arc<dyn Storage>>,
) -> Result<i32> {
    let path = path.as_ref();
    let file = load_and_validate(path)?;

    let name = file
        .batch
        .name
        .clone()
        .unwrap_or_else(|| path.display().to_string());
    let silent = file.batch.silent;

    let mut output = file.build_output(storage)?;
    let actions = file.into_actions()?;
    info!(batch = %name, actions = actions.len(), silent, "running batch file");

    let mut batch = Batch::new(application, &mut output);
    batch.set_actions(actions);

    let code = if silent { batch.run_silent() } else { batch.run()? };

    info!(batch = %name, code, "batch file finished");
    Ok(code)
}
