//! TOML configuration file loading
//!
//! Supports `~/.config/lingua/config.toml` as a persistent config source.
//! All fields are optional — the file is a partial overlay on top of defaults.

use std::path::PathBuf;

use serde::Deserialize;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct LinguaConfigFile {
    /// API server port
    #[serde(default)]
    pub port: Option<u16>,

    /// Working directory for session files
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Remote document store
    #[serde(default)]
    pub store: StoreFileConfig,

    /// Chat completion configuration
    #[serde(default)]
    pub llm: LlmFileConfig,

    /// Voice input/output configuration
    #[serde(default)]
    pub voice: VoiceFileConfig,

    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeysFileConfig,
}

/// Remote store configuration
#[derive(Debug, Default, Deserialize)]
pub struct StoreFileConfig {
    /// Store endpoint base URL
    pub url: Option<String>,

    /// Identifier of the priming-seed record
    pub priming_record: Option<String>,
}

/// Chat completion configuration
#[derive(Debug, Default, Deserialize)]
pub struct LlmFileConfig {
    /// Vision-capable model identifier (e.g. "gpt-4o")
    pub model: Option<String>,

    /// Token budget per completion
    pub max_tokens: Option<u32>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Voice processing configuration
#[derive(Debug, Default, Deserialize)]
pub struct VoiceFileConfig {
    /// Enable voice input/output
    pub enabled: Option<bool>,

    /// STT model (e.g. "whisper-1")
    pub stt_model: Option<String>,

    /// Synthesis service region (e.g. "westeurope")
    pub speech_region: Option<String>,
}

/// API keys configuration
#[derive(Debug, Default, Deserialize)]
pub struct ApiKeysFileConfig {
    pub openai: Option<String>,
    pub store: Option<String>,
    pub speech: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns `LinguaConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> LinguaConfigFile {
    let Some(path) = config_file_path() else {
        return LinguaConfigFile::default();
    };

    if !path.exists() {
        return LinguaConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                LinguaConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            LinguaConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/lingua/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("lingua").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_parses() {
        let file: LinguaConfigFile = toml::from_str(
            r#"
            port = 7070

            [llm]
            model = "gpt-4o"

            [voice]
            enabled = true
            "#,
        )
        .unwrap();

        assert_eq!(file.port, Some(7070));
        assert_eq!(file.llm.model.as_deref(), Some("gpt-4o"));
        assert_eq!(file.voice.enabled, Some(true));
        assert!(file.store.url.is_none());
        assert!(file.api_keys.openai.is_none());
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let file: LinguaConfigFile = toml::from_str("").unwrap();
        assert!(file.port.is_none());
        assert!(file.data_dir.is_none());
        assert!(file.llm.max_tokens.is_none());
    }
}
