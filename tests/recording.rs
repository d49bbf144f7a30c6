//! Recording lifecycle integration tests
//!
//! Exercise the recorder without audio hardware via fake capture backends.

use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use lingua_gateway::session::Recorder;
use lingua_gateway::voice::CaptureBackend;
use lingua_gateway::{Error, Result};

mod common;
use common::FakeMic;

/// Backend that fails immediately, as missing hardware would
struct BrokenMic;

impl CaptureBackend for BrokenMic {
    fn record(&self, _dest: &Path, _stop: &AtomicBool) -> Result<()> {
        Err(Error::Audio("no input device".to_string()))
    }
}

fn recorder_with(backend: impl CaptureBackend) -> (tempfile::TempDir, Recorder) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let target = dir.path().join("question.wav");
    (dir, Recorder::with_backend(target, Arc::new(backend)))
}

#[test]
fn second_start_is_rejected_while_recording() {
    let (_dir, recorder) = recorder_with(FakeMic);

    recorder.start().expect("first start should succeed");
    assert!(recorder.is_recording());

    let err = recorder.start().expect_err("second start should be rejected");
    assert!(matches!(err, Error::AlreadyRecording));

    // The rejection left the original worker running
    assert!(recorder.is_recording());
    recorder.stop().expect("stop should succeed");
}

#[test]
fn stop_without_start_is_rejected() {
    let (dir, recorder) = recorder_with(FakeMic);

    let err = recorder.stop().expect_err("stop while idle should be rejected");
    assert!(matches!(err, Error::NotRecording));

    // No state changed: nothing was captured
    assert!(!recorder.is_recording());
    assert!(!dir.path().join("question.wav").exists());
}

#[test]
fn stop_leaves_a_closed_readable_capture_file() {
    let (dir, recorder) = recorder_with(FakeMic);

    recorder.start().expect("start should succeed");
    recorder.stop().expect("stop should succeed");
    assert!(!recorder.is_recording());

    let path = dir.path().join("question.wav");
    assert!(path.exists());

    let mut reader = hound::WavReader::open(&path).expect("capture file should be readable");
    let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
    assert_eq!(samples.len(), 1600);
    assert!(samples.iter().any(|&s| s != 0));
}

#[test]
fn start_stop_cycle_can_repeat() {
    let (dir, recorder) = recorder_with(FakeMic);

    for _ in 0..3 {
        recorder.start().expect("start should succeed");
        recorder.stop().expect("stop should succeed");
    }

    assert!(dir.path().join("question.wav").exists());
}

#[test]
fn dead_worker_is_reaped_on_next_start() {
    let (_dir, recorder) = recorder_with(BrokenMic);

    recorder.start().expect("start itself should succeed");

    // Wait for the worker to die on its own
    while recorder.is_recording() {
        std::thread::sleep(std::time::Duration::from_millis(5));
    }

    // The dead worker does not block a new start
    recorder.start().expect("start after worker death should succeed");
}

#[test]
fn stop_surfaces_capture_failure() {
    let (_dir, recorder) = recorder_with(BrokenMic);

    recorder.start().expect("start itself should succeed");
    let err = recorder.stop().expect_err("stop should surface the worker failure");
    assert!(matches!(err, Error::Audio(_)));
}
