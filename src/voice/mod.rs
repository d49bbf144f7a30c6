//! Voice processing module
//!
//! Handles audio capture, playback, transcription, and speech synthesis.

pub mod capture;
pub mod locale;
mod playback;
mod stt;
mod tts;

pub use capture::{CaptureBackend, MicBackend, SAMPLE_RATE};
pub use locale::SynthesisVoice;
pub use playback::AudioPlayback;
pub use stt::SpeechToText;
pub use tts::TextToSpeech;
