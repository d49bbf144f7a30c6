//! Audio capture from microphone to a WAV file
//!
//! The capture backend runs on a dedicated worker thread owned by the
//! recorder: it streams default-input-device samples into the target file
//! until the stop flag is raised, then flushes and closes the file before
//! returning. The backend sits behind a trait so the recording lifecycle can
//! be exercised without audio hardware.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::SampleRate;

use crate::{Error, Result};

/// Sample rate for audio capture (16kHz for speech)
pub const SAMPLE_RATE: u32 = 16_000;

/// How often the worker drains buffered samples to disk
const DRAIN_INTERVAL: Duration = Duration::from_millis(100);

/// Streams input-device samples into a file until told to stop
pub trait CaptureBackend: Send + Sync + 'static {
    /// Record into `dest` until `stop` is raised; the file must be flushed
    /// and closed before this returns
    ///
    /// # Errors
    ///
    /// Returns error if the device or the file cannot be driven
    fn record(&self, dest: &Path, stop: &AtomicBool) -> Result<()>;
}

/// Capture backend over the default input device
pub struct MicBackend;

impl CaptureBackend for MicBackend {
    fn record(&self, dest: &Path, stop: &AtomicBool) -> Result<()> {
        let host = cpal::default_host();

        let device = host
            .default_input_device()
            .ok_or_else(|| Error::Audio("no input device available".to_string()))?;

        let supported_config = device
            .supported_input_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                c.channels() == 1
                    && c.min_sample_rate() <= SampleRate(SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable capture config found".to_string()))?;

        let config = supported_config
            .with_sample_rate(SampleRate(SAMPLE_RATE))
            .config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            sample_rate = SAMPLE_RATE,
            dest = %dest.display(),
            "capture worker started"
        );

        let buffer = Arc::new(Mutex::new(Vec::<f32>::new()));
        let callback_buffer = Arc::clone(&buffer);

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    if let Ok(mut buf) = callback_buffer.lock() {
                        buf.extend_from_slice(data);
                    }
                },
                |err| {
                    tracing::error!(error = %err, "audio capture error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        let mut writer =
            hound::WavWriter::create(dest, wav_spec()).map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        while !stop.load(Ordering::Acquire) {
            std::thread::sleep(DRAIN_INTERVAL);
            drain(&buffer, &mut writer)?;
        }

        // Stop the device before the final drain so no samples race the close
        drop(stream);
        drain(&buffer, &mut writer)?;
        writer
            .finalize()
            .map_err(|e| Error::Audio(e.to_string()))?;

        tracing::debug!(dest = %dest.display(), "capture worker finished");
        Ok(())
    }
}

/// WAV spec for capture output (16-bit mono PCM)
#[must_use]
pub const fn wav_spec() -> hound::WavSpec {
    hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    }
}

/// Move buffered samples into the WAV writer
fn drain<W: std::io::Write + std::io::Seek>(
    buffer: &Arc<Mutex<Vec<f32>>>,
    writer: &mut hound::WavWriter<W>,
) -> Result<()> {
    let samples = buffer
        .lock()
        .map(|mut buf| std::mem::take(&mut *buf))
        .unwrap_or_default();

    for sample in samples {
        // Convert f32 [-1.0, 1.0] to i16
        #[allow(clippy::cast_possible_truncation)]
        let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
        writer
            .write_sample(sample_i16)
            .map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wav_spec_is_mono_16bit_speech_rate() {
        let spec = wav_spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);
    }

    #[test]
    fn drain_writes_clamped_samples() {
        let buffer = Arc::new(Mutex::new(vec![0.0_f32, 0.5, -0.5, 2.0, -2.0]));
        let mut cursor = std::io::Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, wav_spec()).unwrap();
            drain(&buffer, &mut writer).unwrap();
            writer.finalize().unwrap();
        }

        let mut reader = hound::WavReader::new(std::io::Cursor::new(cursor.into_inner())).unwrap();
        let samples: Vec<i16> = reader.samples::<i16>().map(std::result::Result::unwrap).collect();
        assert_eq!(samples.len(), 5);
        assert_eq!(samples[3], 32767);
        assert_eq!(samples[4], -32768);
        assert!(buffer.lock().unwrap().is_empty());
    }
}
