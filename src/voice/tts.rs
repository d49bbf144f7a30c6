//! Text-to-speech over the synthesis service
//!
//! Speaks SSML to the regional synthesis endpoint with subscription-key
//! auth. The voice is chosen from the reply's detected language (see
//! [`crate::voice::locale`]); output is MP3 at the playback sample rate.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::voice::locale::SynthesisVoice;
use crate::{Error, Result};

/// MP3 output matching the playback sample rate
const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Synthesizes speech from text
#[derive(Debug, Clone)]
pub struct TextToSpeech {
    client: reqwest::Client,
    subscription_key: SecretString,
    endpoint: String,
}

impl TextToSpeech {
    /// Create a new TTS instance for a service region
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(subscription_key: SecretString, region: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Tts(format!("failed to build TTS client: {e}")))?;

        Ok(Self {
            client,
            subscription_key,
            endpoint: format!("https://{region}.tts.speech.microsoft.com/cognitiveservices/v1"),
        })
    }

    /// Synthesize text with the given voice
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format)
    ///
    /// # Errors
    ///
    /// Returns error if synthesis fails
    pub async fn synthesize(&self, text: &str, voice: &SynthesisVoice) -> Result<Vec<u8>> {
        let ssml = format!(
            "<speak version='1.0' xml:lang='{locale}'>\
             <voice xml:lang='{locale}' name='{name}'>{text}</voice>\
             </speak>",
            locale = voice.locale,
            name = voice.name,
            text = escape_xml(text),
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Ocp-Apim-Subscription-Key", self.subscription_key.expose_secret())
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(ssml)
            .send()
            .await
            .map_err(|e| Error::Tts(format!("synthesis request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Tts(format!("synthesis error {status}: {body}")));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| Error::Tts(format!("synthesis body read failed: {e}")))?;

        tracing::debug!(
            locale = voice.locale,
            voice = voice.name,
            audio_bytes = audio.len(),
            "speech synthesized"
        );
        Ok(audio.to_vec())
    }
}

/// Escape text for embedding in an SSML body
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
