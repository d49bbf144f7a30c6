//! Lingua Gateway - voice chat gateway for vision-grounded conversations
//!
//! This library provides the core functionality for the lingua gateway:
//! - Microphone capture lifecycle (start/stop around a single worker)
//! - A file-backed conversation log with a locked append protocol
//! - The turn pipeline: seed, fetch reference image, transcribe, chat,
//!   synthesize, play
//! - The HTTP surface a client polls to drive a session
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                  HTTP surface                        │
//! │   /ai  │  /start  │  /stop  │  /chat  │  /close    │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                Lingua Gateway                        │
//! │   Recorder  │  Transcript  │  Turn pipeline         │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │             Remote collaborators                     │
//! │   Store  │  Chat (vision)  │  STT  │  TTS          │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod session;
pub mod store;
pub mod transcript;
pub mod voice;

pub use config::{Config, SessionPaths};
pub use error::{Error, Result};
pub use session::SessionState;
pub use transcript::{ContentPart, Message, Role, TranscriptStore};
