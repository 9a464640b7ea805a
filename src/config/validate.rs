// src/config/validate.rs

use std::time::Duration;

use crate::config::model::{ActionConfig, BatchFile, OutputConfig, RawActionConfig, RawBatchFile, RawOutputConfig};
use crate::errors::{AdditionsError, Result};
use crate::types::{Verbosity, WriteMode};

impl TryFrom<RawBatchFile> for BatchFile {
    type Error = crate::errors::AdditionsError;

    fn try_from(raw: RawBatchFile) -> std::result::Result<Self, Self::Error> {
        ensure_has_actions(&raw)?;

        let actions = raw
            .actions
            .into_iter()
            .enumerate()
            .map(|(index, action)| validate_action(index, action))
            .collect::<Result<Vec<_>>>()?;

        let outputs = raw
            .outputs
            .into_iter()
            .enumerate()
            .map(|(index, output)| validate_output(index, output))
            .collect::<Result<Vec<_>>>()?;

        Ok(BatchFile::new_unchecked(raw.batch, outputs, actions))
    }
}

fn ensure_has_actions(raw: &RawBatchFile) -> Result<()> {
    if raw.actions.is_empty() {
        return Err(AdditionsError::ConfigError(
            "batch file must contain at least one [[action]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_action(index: usize, raw: RawActionConfig) -> Result<ActionConfig> {
    let missing = |field: &str| {
        AdditionsError::ConfigError(format!(
            "action #{} of type '{}' is missing `{field}`",
            index + 1,
            raw.kind
        ))
    };

    match raw.kind.as_str() {
        "command" => {
            let command = raw.command.ok_or_else(|| missing("command"))?;
            if command.trim().is_empty() {
                return Err(missing("command"));
            }
            Ok(ActionConfig::Command {
                command,
                args: raw.args,
            })
        }
        "shell" => {
            let argv = raw.argv.ok_or_else(|| missing("argv"))?;
            if argv.is_empty() {
                return Err(missing("argv"));
            }
            Ok(ActionConfig::Shell {
                argv,
                cwd: raw.cwd,
                env: raw.env,
                input: raw.input,
                timeout: raw.timeout_secs.filter(|secs| *secs > 0).map(Duration::from_secs),
            })
        }
        "message" => {
            let text = raw.text.ok_or_else(|| missing("text"))?;
            Ok(ActionConfig::Message {
                text,
                newline: raw.newline.unwrap_or(true),
                verbosity: raw.verbosity.unwrap_or(Verbosity::Normal),
            })
        }
        other => Err(AdditionsError::InvalidActionSet(format!(
            "action #{} has unknown type '{other}' (expected command, shell or message)",
            index + 1
        ))),
    }
}

fn validate_output(index: usize, raw: RawOutputConfig) -> Result<OutputConfig> {
    match raw.kind.as_str() {
        "console" => Ok(OutputConfig::Console),
        "null" => Ok(OutputConfig::Null),
        "file" | "storage" => {
            let path = raw.path.ok_or_else(|| {
                AdditionsError::ConfigError(format!(
                    "output #{} of kind '{}' is missing `path`",
                    index + 1,
                    raw.kind
                ))
            })?;
            let mode = match raw.mode.as_deref() {
                Some(mode) => mode.parse::<WriteMode>()?,
                None => WriteMode::default(),
            };
            let debounce = Duration::from_millis(raw.debounce_ms);

            if raw.kind == "file" {
                Ok(OutputConfig::File { path, mode, debounce })
            } else {
                Ok(OutputConfig::Storage { path, mode, debounce })
            }
        }
        other => Err(AdditionsError::UnsupportedOutput(other.to_string())),
    }
}
