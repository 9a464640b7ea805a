// tests/multiplexed_output.rs

mod common;
use crate::common::sample_app;

use std::fs;
use std::sync::{Arc, Mutex};

use console_additions::console::{BufferedOutput, Output, OutputFormatter};
use console_additions::types::{Verbosity, WriteMode};
use console_additions::{Batch, MultiplexedOutput, NativeFileOutput};
use console_additions_test_utils::{Recorded, RecordingOutput};

#[test]
fn writes_reach_sinks_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut out = MultiplexedOutput::new(vec![
        Box::new(RecordingOutput::shared("a", Arc::clone(&log))),
        Box::new(RecordingOutput::shared("b", Arc::clone(&log))),
    ]);
    log.lock().unwrap().clear();

    out.writeln("hello", Verbosity::Normal).unwrap();

    let calls = log.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            Recorded::Write {
                sink: "a".into(),
                message: "hello".into(),
                newline: true,
            },
            Recorded::Write {
                sink: "b".into(),
                message: "hello".into(),
                newline: true,
            },
        ]
    );
}

#[test]
fn construction_mirrors_state_onto_sinks() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let out = MultiplexedOutput::with_state(
        vec![Box::new(RecordingOutput::shared("a", Arc::clone(&log)))],
        Verbosity::Debug,
        true,
        OutputFormatter::default(),
    );

    assert!(out.is_decorated());
    assert!(out.sinks()[0].is_debug());
    assert!(out.sinks()[0].is_decorated());
    assert!(log.lock().unwrap().contains(&Recorded::Verbosity {
        sink: "a".into(),
        verbosity: Verbosity::Debug,
    }));
}

#[test]
fn state_changes_are_broadcast_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut out = MultiplexedOutput::new(vec![
        Box::new(RecordingOutput::shared("a", Arc::clone(&log))),
        Box::new(RecordingOutput::shared("b", Arc::clone(&log))),
    ]);
    log.lock().unwrap().clear();

    out.set_verbosity(Verbosity::Quiet);
    out.set_decorated(true);

    let calls = log.lock().unwrap().clone();
    assert_eq!(
        calls,
        vec![
            Recorded::Verbosity {
                sink: "a".into(),
                verbosity: Verbosity::Quiet,
            },
            Recorded::Verbosity {
                sink: "b".into(),
                verbosity: Verbosity::Quiet,
            },
            Recorded::Decorated {
                sink: "a".into(),
                decorated: true,
            },
            Recorded::Decorated {
                sink: "b".into(),
                decorated: true,
            },
        ]
    );
}

#[test]
fn quiet_sinks_filter_normal_messages() {
    let recorder = RecordingOutput::new("only");
    let mut out = MultiplexedOutput::with_state(
        vec![Box::new(recorder.clone())],
        Verbosity::Quiet,
        false,
        OutputFormatter::default(),
    );

    out.writeln("hidden", Verbosity::Normal).unwrap();
    out.writeln("shown", Verbosity::Quiet).unwrap();

    assert_eq!(recorder.text(), "shown\n");
}

#[test]
fn batch_writes_to_console_buffer_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("batch.log");
    let (app, _, _) = sample_app();

    let recorder = RecordingOutput::new("console");
    let mut out = MultiplexedOutput::new(vec![
        Box::new(recorder.clone()),
        Box::new(BufferedOutput::new()),
        Box::new(NativeFileOutput::new(&path, WriteMode::Reset).unwrap()),
    ]);

    {
        let mut batch = Batch::new(app, &mut out);
        batch.add("greet Eve", &[]).unwrap();
        assert_eq!(batch.run().unwrap(), 0);
    }
    drop(out);

    assert_eq!(recorder.text(), "Hello Eve\n");
    assert_eq!(fs::read_to_string(&path).unwrap(), "Hello Eve\n");
}
