//! Shared test utilities

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use lingua_gateway::voice::{capture, CaptureBackend};
use lingua_gateway::Result;

/// Capture backend that writes a short sine clip, then waits for the stop flag
///
/// Lets lifecycle tests run without audio hardware.
pub struct FakeMic;

impl CaptureBackend for FakeMic {
    fn record(&self, dest: &Path, stop: &AtomicBool) -> Result<()> {
        let mut writer = hound::WavWriter::create(dest, capture::wav_spec())
            .expect("failed to create test wav");

        // 100ms of 440Hz tone
        for i in 0..1600_u32 {
            let t = i as f32 / capture::SAMPLE_RATE as f32;
            let sample = ((2.0 * std::f32::consts::PI * 440.0 * t).sin() * 16384.0) as i16;
            writer.write_sample(sample).expect("failed to write sample");
        }

        while !stop.load(Ordering::Acquire) {
            std::thread::sleep(Duration::from_millis(5));
        }

        writer.finalize().expect("failed to finalize test wav");
        Ok(())
    }
}
