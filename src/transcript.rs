//! File-backed conversation log
//!
//! The log is a JSON array of chat messages at a fixed path. All access goes
//! through [`TranscriptStore`], which serializes read-modify-write cycles
//! behind a scoped lock and writes atomically (temp file + rename), so the
//! file on disk is always a valid serialized message array.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::Result;

/// Role of a chat message author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message
///
/// Immutable once appended to the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: Content,
}

/// Message content: plain text or a list of typed parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    Text(String),
    Parts(Vec<ContentPart>),
}

/// A typed content part in the chat API wire format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

/// Image reference carried inline as a data URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl Message {
    /// Plain-text message with the given role
    #[must_use]
    pub const fn text(role: Role, text: String) -> Self {
        Self {
            role,
            content: Content::Text(text),
        }
    }

    /// User message carrying an utterance and an inline reference image
    #[must_use]
    pub fn user_with_image(utterance: String, image_data_url: String) -> Self {
        Self {
            role: Role::User,
            content: Content::Parts(vec![
                ContentPart::Text { text: utterance },
                ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: image_data_url,
                    },
                },
            ]),
        }
    }

    /// Plain-text body, if this message has one
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.content {
            Content::Text(text) => Some(text),
            Content::Parts(_) => None,
        }
    }
}

/// Repository over the on-disk conversation log
///
/// Cloneable; clones share one lock, so concurrent requests cannot interleave
/// their read-modify-write cycles.
#[derive(Debug, Clone)]
pub struct TranscriptStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl TranscriptStore {
    /// Create a store over the log file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Whether the log file exists on disk
    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `seed` verbatim as the initial log if no log exists yet
    ///
    /// Returns `true` when the seed was applied. An existing log is left
    /// untouched; the seed is never re-applied or merged.
    ///
    /// # Errors
    ///
    /// Returns error if the seed cannot be serialized or written
    pub async fn seed_if_missing(&self, seed: &[Message]) -> Result<bool> {
        let _guard = self.lock.lock().await;
        if self.path.exists() {
            return Ok(false);
        }
        self.write_messages(seed)?;
        tracing::debug!(messages = seed.len(), "conversation log seeded");
        Ok(true)
    }

    /// Load the full message array
    ///
    /// # Errors
    ///
    /// Returns error if the log is missing or not a valid message array
    pub async fn load(&self) -> Result<Vec<Message>> {
        let _guard = self.lock.lock().await;
        self.read_messages()
    }

    /// Append one message and persist the log
    ///
    /// # Errors
    ///
    /// Returns error if the log cannot be read back or written
    pub async fn append(&self, message: Message) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut messages = self.read_messages()?;
        messages.push(message);
        self.write_messages(&messages)?;
        Ok(())
    }

    /// Delete the log file; succeeds whether or not it exists
    ///
    /// # Errors
    ///
    /// Returns error only on filesystem failures other than absence
    pub async fn remove(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn read_messages(&self) -> Result<Vec<Message>> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Atomic write: serialize to a sibling temp file, then rename over the
    /// log so a crash mid-write never leaves a truncated array behind.
    fn write_messages(&self, messages: &[Message]) -> Result<()> {
        let json = serde_json::to_vec_pretty(messages)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_roles_serialize_lowercase() {
        let msg = Message::text(Role::System, "You are an assistant.".to_string());
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are an assistant.");
    }

    #[test]
    fn user_message_uses_chat_api_wire_format() {
        let msg = Message::user_with_image(
            "What is this object?".to_string(),
            "data:image/jpeg;base64,AAAA".to_string(),
        );
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["content"][0]["type"], "text");
        assert_eq!(json["content"][0]["text"], "What is this object?");
        assert_eq!(json["content"][1]["type"], "image_url");
        assert_eq!(
            json["content"][1]["image_url"]["url"],
            "data:image/jpeg;base64,AAAA"
        );
    }

    #[test]
    fn wire_format_round_trips() {
        let original = vec![
            Message::text(Role::System, "seed".to_string()),
            Message::user_with_image("q".to_string(), "data:image/jpeg;base64,QQ".to_string()),
            Message::text(Role::Assistant, "a".to_string()),
        ];
        let json = serde_json::to_string(&original).unwrap();
        let parsed: Vec<Message> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn as_text_only_for_plain_content() {
        let plain = Message::text(Role::Assistant, "It is a gear.".to_string());
        assert_eq!(plain.as_text(), Some("It is a gear."));

        let parts = Message::user_with_image("q".to_string(), "u".to_string());
        assert!(parts.as_text().is_none());
    }
}
