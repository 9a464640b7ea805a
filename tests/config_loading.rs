// tests/config_loading.rs

mod common;
use crate::common::{init_tracing, sample_app};

use std::fs;
use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;

use console_additions::config::{load_and_validate, load_from_path, ActionConfig, OutputConfig};
use console_additions::errors::AdditionsError;
use console_additions::run_batch_file;
use console_additions::storage::{MemoryStorage, Storage};
use console_additions::types::{Verbosity, WriteMode};
use console_additions_test_utils::builders::BatchFileBuilder;

#[test]
fn full_batch_file_is_loaded_and_validated() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[batch]
name = "deploy"
verbosity = "verbose"
silent = true

[[output]]
kind = "file"
path = "deploy.log"
mode = "reset"
debounce_ms = 250

[[action]]
type = "command"
command = "cache:clear --env=%s"
args = ["prod"]

[[action]]
type = "shell"
argv = ["git", "pull"]
env = {{ GIT_TERMINAL_PROMPT = "0" }}
timeout_secs = 30

[[action]]
type = "message"
text = "<info>done</info>"
newline = false
verbosity = "quiet"
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.batch.name.as_deref(), Some("deploy"));
    assert_eq!(cfg.batch.verbosity, Verbosity::Verbose);
    assert!(cfg.batch.silent);
    assert_eq!(cfg.base_dir(), file.path().parent());
    assert!(matches!(
        &cfg.outputs[0],
        OutputConfig::File { mode: WriteMode::Reset, debounce, .. } if debounce.as_millis() == 250
    ));
    assert_eq!(cfg.actions.len(), 3);
    assert!(matches!(&cfg.actions[1], ActionConfig::Shell { env, .. } if env["GIT_TERMINAL_PROMPT"] == "0"));
    assert!(matches!(
        &cfg.actions[2],
        ActionConfig::Message { newline: false, verbosity: Verbosity::Quiet, .. }
    ));
}

#[test]
fn raw_loading_skips_validation() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[[action]]\ntype = \"unheard-of\"\n").unwrap();

    let raw = load_from_path(file.path()).unwrap();
    assert_eq!(raw.actions[0].kind, "unheard-of");

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, AdditionsError::InvalidActionSet(_)));
}

#[test]
fn malformed_toml_is_a_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[[action]\ntype = ").unwrap();
    assert!(matches!(load_from_path(file.path()), Err(AdditionsError::TomlError(_))));
}

#[test]
fn unknown_fields_are_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[[action]]\ntype = \"message\"\ntext = \"x\"\ncolour = \"red\"\n").unwrap();
    assert!(matches!(load_from_path(file.path()), Err(AdditionsError::TomlError(_))));
}

#[test]
fn run_batch_file_writes_relative_file_output() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let (app, ok, _) = sample_app();

    let path = BatchFileBuilder::new()
        .name("relative")
        .file_output("file", "out/run.log", "reset", 0)
        .command("greet Frank")
        .command("ok one")
        .message("<comment>all good</comment>")
        .write_to(dir.path());

    // The nested directory has to exist for a native file output.
    fs::create_dir_all(dir.path().join("out")).unwrap();

    let code = run_batch_file(&path, app, None).unwrap();
    assert_eq!(code, 0);
    assert_eq!(ok.call_count(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("out/run.log")).unwrap(),
        "Hello Frank\nok ran\nall good\n"
    );
}

#[test]
fn run_batch_file_into_storage() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _, _) = sample_app();
    let memory = MemoryStorage::new();
    memory.add_file("history.log", "earlier\n");

    let path = BatchFileBuilder::new()
        .file_output("storage", "history.log", "append", 0)
        .command("greet --code 5")
        .write_to(dir.path());

    let storage: Arc<dyn Storage> = Arc::new(memory.clone());
    let code = run_batch_file(&path, app, Some(storage)).unwrap();

    assert_eq!(code, 5);
    assert_eq!(memory.contents("history.log").as_deref(), Some("earlier\nHello World\n"));
}

#[test]
fn silent_batch_file_reports_failure_as_minus_one() {
    let dir = tempfile::tempdir().unwrap();
    let (app, ok, boom) = sample_app();

    let path = BatchFileBuilder::new()
        .silent(true)
        .output("null")
        .command("boom")
        .command("ok")
        .write_to(dir.path());

    assert_eq!(run_batch_file(&path, Arc::clone(&app), None).unwrap(), -1);
    assert_eq!(boom.call_count(), 1);
    assert_eq!(ok.call_count(), 0);

    let loud = BatchFileBuilder::new()
        .output("null")
        .command("boom")
        .write_to(dir.path());
    assert!(run_batch_file(&loud, app, None).is_err());
}

#[cfg(all(unix, feature = "process"))]
#[test]
fn shell_actions_resolve_cwd_against_the_batch_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("work")).unwrap();
    fs::write(dir.path().join("work/marker.txt"), "").unwrap();
    let (app, _, _) = sample_app();

    let path = BatchFileBuilder::new()
        .file_output("file", "shell.log", "reset", 0)
        .raw_action("type = \"shell\"\nargv = [\"ls\"]\ncwd = \"work\"")
        .write_to(dir.path());

    assert_eq!(run_batch_file(&path, app, None).unwrap(), 0);
    assert_eq!(fs::read_to_string(dir.path().join("shell.log")).unwrap(), "marker.txt\n");
}
