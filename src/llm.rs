//! Vision-capable chat completion client
//!
//! Submits the whole conversation log per turn; no retry, failures surface
//! to the caller.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::transcript::{Message, Role};
use crate::{Error, Result};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODELS_URL: &str = "https://api.openai.com/v1/models";

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Chat completion client
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    api_key: SecretString,
    model: String,
    max_tokens: u32,
}

impl ChatClient {
    /// Create a new chat client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Chat(format!("failed to build chat client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    /// Submit the conversation and return the assistant's reply message
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or an
    /// empty completion
    pub async fn complete(&self, messages: &[Message]) -> Result<Message> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Chat(format!("chat request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Chat(format!("chat API error {status}: {body}")));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Chat(format!("failed to parse chat response: {e}")))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::Chat("empty completion".to_string()))?;

        tracing::debug!(model = %self.model, reply_chars = content.len(), "chat turn complete");
        Ok(Message::text(Role::Assistant, content))
    }

    /// Fetch the provider's model listing, passed through untouched
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or a non-success status
    pub async fn list_models(&self) -> Result<serde_json::Value> {
        let response = self
            .client
            .get(MODELS_URL)
            .header(
                "Authorization",
                format!("Bearer {}", self.api_key.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| Error::Chat(format!("model listing failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Chat(format!("model listing error {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Chat(format!("failed to parse model listing: {e}")))
    }
}
