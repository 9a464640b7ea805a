// src/config/build.rs

//! Turning a validated [`BatchFile`] into actions and outputs.

use std::fmt;
use std::sync::Arc;

use crate::batch::interpolate::interpolate;
use crate::batch::{Action, MessageAction, ShellAction, StringCommandAction};
use crate::config::model::{ActionConfig, BatchFile, OutputConfig};
use crate::console::formatter::OutputFormatter;
use crate::console::output::{ConsoleOutput, NullOutput, Output};
use crate::errors::{AdditionsError, Result};
use crate::output::{MultiplexedOutput, NativeFileOutput, StorageFileOutput};
use crate::storage::Storage;

impl BatchFile {
    /// Build the actions in file order. Command templates are interpolated
    /// with their `args` here.
    pub fn into_actions(self) -> Result<Vec<Box<dyn Action>>> {
        let mut actions: Vec<Box<dyn Action>> = Vec::with_capacity(self.actions.len());

        for action in &self.actions {
            let built: Box<dyn Action> = match action {
                ActionConfig::Command { command, args } => {
                    let args: Vec<&dyn fmt::Display> = args.iter().map(|a| a as &dyn fmt::Display).collect();
                    Box::new(StringCommandAction::new(interpolate(command, &args)?))
                }
                ActionConfig::Shell {
                    argv,
                    cwd,
                    env,
                    input,
                    timeout,
                } => {
                    let mut shell = ShellAction::new(argv)?;
                    let process = shell.process_mut();
                    if let Some(cwd) = cwd {
                        process.current_dir(self.resolve(cwd));
                    }
                    process.envs(env.clone());
                    if let Some(input) = input {
                        process.input(input.clone());
                    }
                    if let Some(timeout) = timeout {
                        process.timeout(*timeout);
                    }
                    Box::new(shell)
                }
                ActionConfig::Message {
                    text,
                    newline,
                    verbosity,
                } => Box::new(MessageAction::new(text.clone(), *newline, *verbosity)),
            };
            actions.push(built);
        }

        Ok(actions)
    }

    /// Build the output described by the `[[output]]` entries, with the
    /// `[batch]` verbosity and decoration applied to every sink.
    ///
    /// Without any entries the batch writes to the console. `storage`
    /// outputs fail with a configuration error when no backend is given.
    pub fn build_output(&self, storage: Option<Arc<dyn Storage>>) -> Result<MultiplexedOutput> {
        let mut sinks: Vec<Box<dyn Output>> = Vec::with_capacity(self.outputs.len().max(1));

        if self.outputs.is_empty() {
            sinks.push(Box::new(ConsoleOutput::stdout()));
        }

        for output in &self.outputs {
            let sink: Box<dyn Output> = match output {
                OutputConfig::Console => Box::new(ConsoleOutput::stdout()),
                OutputConfig::Null => Box::new(NullOutput::new()),
                OutputConfig::File { path, mode, debounce } => {
                    let mut file = NativeFileOutput::new(self.resolve(path), *mode)?;
                    file.set_debounce(*debounce);
                    Box::new(file)
                }
                OutputConfig::Storage { path, mode, debounce } => {
                    let backend = storage.clone().ok_or_else(|| {
                        AdditionsError::ConfigError(format!(
                            "output '{}' needs a storage backend but none was provided",
                            path.display()
                        ))
                    })?;
                    let mut file = StorageFileOutput::new(backend, path, *mode)?;
                    file.set_debounce(*debounce);
                    Box::new(file)
                }
            };
            sinks.push(sink);
        }

        Ok(MultiplexedOutput::with_state(
            sinks,
            self.batch.verbosity,
            self.batch.decorated,
            OutputFormatter::default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_str;
    use crate::storage::memory::MemoryStorage;
    use crate::types::Verbosity;

    #[test]
    fn actions_are_built_in_order() {
        let file = parse_str(
            r#"
            [[action]]
            type = "command"
            command = "cache:clear --env=%s --retries=%d"
            args = ["prod", 3]

            [[action]]
            type = "shell"
            argv = ["echo", "hello world"]

            [[action]]
            type = "message"
            text = "done"
            newline = false
            "#,
        )
        .unwrap();

        let rendered: Vec<String> = file.into_actions().unwrap().iter().map(|a| a.to_string()).collect();
        assert_eq!(
            rendered,
            vec![
                "cache:clear --env=prod --retries=3".to_string(),
                "echo 'hello world'".to_string(),
                "done".to_string(),
            ]
        );
    }

    #[test]
    fn bad_template_surfaces_interpolation_error() {
        let file = parse_str(
            r#"
            [[action]]
            type = "command"
            command = "run %s %s"
            args = ["only-one"]
            "#,
        )
        .unwrap();
        assert!(matches!(file.into_actions(), Err(AdditionsError::Interpolation(_))));
    }

    #[test]
    fn no_outputs_means_console() {
        let file = parse_str("[[action]]\ntype = \"message\"\ntext = \"x\"\n").unwrap();
        let output = file.build_output(None).unwrap();
        assert_eq!(output.len(), 1);
    }

    #[test]
    fn batch_section_state_is_applied_to_sinks() {
        let file = parse_str(
            r#"
            [batch]
            verbosity = "very_verbose"

            [[output]]
            kind = "null"

            [[output]]
            kind = "storage"
            path = "run.log"

            [[action]]
            type = "message"
            text = "x"
            "#,
        )
        .unwrap();

        let storage: Arc<dyn Storage> = Arc::new(MemoryStorage::new());
        let output = file.build_output(Some(storage)).unwrap();
        assert_eq!(output.verbosity(), Verbosity::VeryVerbose);
        assert!(output.sinks().iter().all(|s| s.is_very_verbose()));
    }

    #[test]
    fn storage_output_without_backend_is_rejected() {
        let file = parse_str(
            "[[output]]\nkind = \"storage\"\npath = \"a.log\"\n[[action]]\ntype = \"message\"\ntext = \"x\"\n",
        )
        .unwrap();
        assert!(matches!(file.build_output(None), Err(AdditionsError::ConfigError(_))));
    }
}
