//! Configuration management for the lingua gateway

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::{Error, Result};

/// Default port, kept for compatibility with existing clients
pub const DEFAULT_PORT: u16 = 6969;

/// Gateway configuration
///
/// Resolution order: built-in defaults, then the optional TOML file
/// (`~/.config/lingua/config.toml`), then environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port to listen on
    pub port: u16,

    /// Session file paths (working-directory subfolder)
    pub paths: SessionPaths,

    /// Remote document store
    pub store: StoreConfig,

    /// Chat completion provider
    pub llm: LlmConfig,

    /// Voice input/output
    pub voice: VoiceConfig,
}

/// Remote document store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Store endpoint base URL
    pub url: String,

    /// API key sent with every store request
    pub api_key: Option<SecretString>,

    /// Identifier of the priming-seed record
    pub priming_record: String,
}

/// Chat completion configuration
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider API key
    pub api_key: SecretString,

    /// Vision-capable model identifier
    pub model: String,

    /// Token budget per completion
    pub max_tokens: u32,

    /// Per-request timeout for all remote calls
    pub timeout: Duration,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// Enable microphone capture, transcription, and spoken replies
    pub enabled: bool,

    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// Synthesis service subscription key (required when enabled)
    pub speech_key: Option<SecretString>,

    /// Synthesis service region (e.g. "westeurope")
    pub speech_region: String,
}

impl Config {
    /// Load configuration from the TOML file and environment
    ///
    /// # Errors
    ///
    /// Returns error if a required setting is missing or malformed
    pub fn load(disable_voice: bool) -> Result<Self> {
        let file = file::load_config_file();

        let port = env_var("LINGUA_PORT")
            .map(|v| {
                v.parse::<u16>()
                    .map_err(|_| Error::Config(format!("invalid LINGUA_PORT: {v}")))
            })
            .transpose()?
            .or(file.port)
            .unwrap_or(DEFAULT_PORT);

        let data_dir = env_var("LINGUA_DATA_DIR")
            .map(PathBuf::from)
            .or(file.data_dir)
            .unwrap_or_else(|| PathBuf::from("temp"));

        let store_url = env_var("LINGUA_STORE_URL")
            .or(file.store.url)
            .ok_or_else(|| Error::Config("LINGUA_STORE_URL is required".to_string()))?;

        let priming_record = env_var("LINGUA_PRIMING_RECORD")
            .or(file.store.priming_record)
            .ok_or_else(|| Error::Config("LINGUA_PRIMING_RECORD is required".to_string()))?;

        let store_key = env_var("LINGUA_STORE_KEY")
            .or(file.api_keys.store)
            .map(SecretString::from);

        let openai_key = env_var("OPENAI_API_KEY")
            .or(file.api_keys.openai)
            .ok_or_else(|| Error::Config("OPENAI_API_KEY is required".to_string()))?;

        let timeout_secs = env_var("LINGUA_TIMEOUT_SECS")
            .map(|v| {
                v.parse::<u64>()
                    .map_err(|_| Error::Config(format!("invalid LINGUA_TIMEOUT_SECS: {v}")))
            })
            .transpose()?
            .or(file.llm.timeout_secs)
            .unwrap_or(30);

        let max_tokens = env_var("LINGUA_MAX_TOKENS")
            .map(|v| {
                v.parse::<u32>()
                    .map_err(|_| Error::Config(format!("invalid LINGUA_MAX_TOKENS: {v}")))
            })
            .transpose()?
            .or(file.llm.max_tokens)
            .unwrap_or(3000);

        let voice_enabled = !disable_voice
            && !env_var("LINGUA_DISABLE_VOICE").is_some_and(|v| v == "1" || v == "true")
            && file.voice.enabled.unwrap_or(true);

        let speech_key = env_var("AZURE_SPEECH_KEY")
            .or(file.api_keys.speech)
            .map(SecretString::from);

        if voice_enabled && speech_key.is_none() {
            return Err(Error::Config(
                "AZURE_SPEECH_KEY is required when voice is enabled".to_string(),
            ));
        }

        let speech_region = env_var("AZURE_SPEECH_REGION")
            .or(file.voice.speech_region)
            .unwrap_or_else(|| "westeurope".to_string());

        Ok(Self {
            port,
            paths: SessionPaths::new(data_dir),
            store: StoreConfig {
                url: store_url,
                api_key: store_key,
                priming_record,
            },
            llm: LlmConfig {
                api_key: SecretString::from(openai_key),
                model: env_var("LINGUA_CHAT_MODEL")
                    .or(file.llm.model)
                    .unwrap_or_else(|| "gpt-4o".to_string()),
                max_tokens,
                timeout: Duration::from_secs(timeout_secs),
            },
            voice: VoiceConfig {
                enabled: voice_enabled,
                stt_model: env_var("LINGUA_STT_MODEL")
                    .or(file.voice.stt_model)
                    .unwrap_or_else(|| "whisper-1".to_string()),
                speech_key,
                speech_region,
            },
        })
    }
}

/// Fixed paths for the session files, all under one working-directory subfolder
#[derive(Debug, Clone)]
pub struct SessionPaths {
    root: PathBuf,
}

impl SessionPaths {
    /// Create a paths object rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the working directory if it does not exist
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Root of the session working directory
    #[must_use]
    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Conversation log file
    #[must_use]
    pub fn log(&self) -> PathBuf {
        self.root.join("logs.json")
    }

    /// Reference image file
    #[must_use]
    pub fn image(&self) -> PathBuf {
        self.root.join("ad.jpg")
    }

    /// Microphone capture file
    #[must_use]
    pub fn capture(&self) -> PathBuf {
        self.root.join("question.wav")
    }

    /// Synthesized speech file
    #[must_use]
    pub fn speech(&self) -> PathBuf {
        self.root.join("reply.mp3")
    }
}

/// Read an environment variable, treating empty values as unset
fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_paths_are_fixed_under_root() {
        let paths = SessionPaths::new("temp");
        assert_eq!(paths.log(), PathBuf::from("temp/logs.json"));
        assert_eq!(paths.image(), PathBuf::from("temp/ad.jpg"));
        assert_eq!(paths.capture(), PathBuf::from("temp/question.wav"));
        assert_eq!(paths.speech(), PathBuf::from("temp/reply.mp3"));
    }
}
