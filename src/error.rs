//! Error types for the lingua gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the gateway
#[derive(Debug, Error)]
pub enum Error {
    /// A capture worker is already running
    #[error("recording already in progress")]
    AlreadyRecording,

    /// Stop requested with no capture worker running
    #[error("no recording in progress")]
    NotRecording,

    /// Share URL did not contain a durable file identifier
    #[error("no file id in share url: {0}")]
    NoFileId(String),

    /// Detected language has no synthesis locale mapping
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Remote document store error
    #[error("store error: {0}")]
    Store(String),

    /// Chat completion provider error
    #[error("chat error: {0}")]
    Chat(String),

    /// Speech-to-text error
    #[error("STT error: {0}")]
    Stt(String),

    /// Text-to-speech error
    #[error("TTS error: {0}")]
    Tts(String),

    /// Audio capture or playback error
    #[error("audio error: {0}")]
    Audio(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error originated in a remote collaborator.
    ///
    /// The HTTP layer uses this to pick between 502 and 500.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Store(_) | Self::Chat(_) | Self::Stt(_) | Self::Tts(_) | Self::Http(_)
        )
    }
}
