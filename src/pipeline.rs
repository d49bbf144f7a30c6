//! The turn pipeline
//!
//! One chat turn runs strictly sequentially: seed the log if absent, fetch
//! the reference image, obtain the user utterance (text or transcribed
//! audio), append the user turn, call the chat model, append the reply, and
//! speak it when voice is enabled. No step begins before the previous
//! completes; the first failure aborts the rest and surfaces to the caller.
//! A failure after the user turn is appended leaves an unanswered user
//! message in the log; callers tolerate that.

use base64::Engine;

use crate::llm::ChatClient;
use crate::session::SessionState;
use crate::store::{drive, StoreClient};
use crate::transcript::Message;
use crate::voice::{locale, AudioPlayback, SpeechToText, TextToSpeech};
use crate::{Error, Result};

/// Where this turn's user utterance comes from
#[derive(Debug, Clone)]
pub enum Utterance {
    /// Text supplied directly in the request body
    Text(String),
    /// The most recent microphone capture, to be transcribed
    Recorded,
}

/// Orchestrates chat turns over the session state and remote collaborators
#[derive(Clone)]
pub struct TurnPipeline {
    session: SessionState,
    store: StoreClient,
    llm: ChatClient,
    stt: Option<SpeechToText>,
    tts: Option<TextToSpeech>,
}

impl TurnPipeline {
    /// Create a pipeline; `stt`/`tts` are absent when voice is disabled
    #[must_use]
    pub const fn new(
        session: SessionState,
        store: StoreClient,
        llm: ChatClient,
        stt: Option<SpeechToText>,
        tts: Option<TextToSpeech>,
    ) -> Self {
        Self {
            session,
            store,
            llm,
            stt,
            tts,
        }
    }

    /// Run one full turn and return the assistant's reply text
    ///
    /// # Errors
    ///
    /// Surfaces the originating error of the first failing step
    pub async fn run(&self, utterance: Utterance) -> Result<String> {
        let transcript = self.session.transcript();
        let paths = self.session.paths();

        // 1. Seed an absent log; an existing log is never re-seeded
        if !transcript.exists() {
            let seed = self.store.priming_seed().await?;
            transcript.seed_if_missing(&seed).await?;
        }

        // 2. Reference image: latest photo record -> file id -> download
        let photo = self.store.latest_photo().await?;
        let file_id = drive::require_file_id(&photo.file_url)?;
        let download_url = drive::direct_download_url(file_id);
        drive::download_to(self.store.http(), &download_url, &paths.image()).await?;

        // 3. User utterance
        let text = match utterance {
            Utterance::Text(text) => text,
            Utterance::Recorded => {
                let stt = self.stt.as_ref().ok_or_else(|| {
                    Error::Config("voice input is disabled; send text input instead".to_string())
                })?;
                let audio = tokio::fs::read(paths.capture()).await?;
                stt.transcribe(&audio).await?
            }
        };

        // 4. Append the user turn with the image inlined as a data URL
        let image = tokio::fs::read(paths.image()).await?;
        let data_url = format!(
            "data:image/jpeg;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(image)
        );
        transcript
            .append(Message::user_with_image(text, data_url))
            .await?;

        // 5-6. Chat completion over the whole log, reply appended verbatim
        let log = transcript.load().await?;
        let reply = self.llm.complete(&log).await?;
        transcript.append(reply.clone()).await?;

        let reply_text = reply.as_text().unwrap_or_default().to_string();

        // 7. Spoken reply
        if let Some(tts) = &self.tts {
            self.speak(tts, &reply_text).await?;
        }

        Ok(reply_text)
    }

    /// Synthesize and play the reply, then drop the transient audio files
    async fn speak(&self, tts: &TextToSpeech, reply: &str) -> Result<()> {
        let paths = self.session.paths();

        let voice = locale::voice_for(reply)?;
        let audio = tts.synthesize(reply, &voice).await?;
        tokio::fs::write(paths.speech(), &audio).await?;

        tokio::task::spawn_blocking(move || AudioPlayback::new()?.play_mp3(&audio))
            .await
            .map_err(|e| Error::Audio(format!("playback task failed: {e}")))??;

        remove_transient(&paths.capture()).await;
        remove_transient(&paths.speech()).await;
        Ok(())
    }
}

/// Remove a transient file, ignoring absence
async fn remove_transient(path: &std::path::Path) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove transient file"),
    }
}
