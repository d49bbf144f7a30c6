//! Session state: the recorder, the conversation log, and their fixed paths
//!
//! One logical session exists process-wide. The state object is cloneable
//! and owned by the request-handling context; there are no module-level
//! globals.

mod recorder;

pub use recorder::Recorder;

use std::sync::Arc;

use crate::config::SessionPaths;
use crate::transcript::TranscriptStore;
use crate::voice::CaptureBackend;

/// Owned session state shared across request handlers
#[derive(Clone)]
pub struct SessionState {
    recorder: Arc<Recorder>,
    transcript: TranscriptStore,
    paths: SessionPaths,
}

impl SessionState {
    /// Create session state capturing from the default input device
    #[must_use]
    pub fn new(paths: SessionPaths) -> Self {
        let recorder = Arc::new(Recorder::new(paths.capture()));
        Self::with_recorder(paths, recorder)
    }

    /// Create session state with an explicit capture backend
    #[must_use]
    pub fn with_backend(paths: SessionPaths, backend: Arc<dyn CaptureBackend>) -> Self {
        let recorder = Arc::new(Recorder::with_backend(paths.capture(), backend));
        Self::with_recorder(paths, recorder)
    }

    fn with_recorder(paths: SessionPaths, recorder: Arc<Recorder>) -> Self {
        Self {
            recorder,
            transcript: TranscriptStore::new(paths.log()),
            paths,
        }
    }

    /// The recording controller
    #[must_use]
    pub fn recorder(&self) -> &Arc<Recorder> {
        &self.recorder
    }

    /// The conversation log repository
    #[must_use]
    pub const fn transcript(&self) -> &TranscriptStore {
        &self.transcript
    }

    /// The fixed session file paths
    #[must_use]
    pub const fn paths(&self) -> &SessionPaths {
        &self.paths
    }

    /// Delete the conversation log and reference image
    ///
    /// Idempotent and infallible: absent files are fine, and filesystem
    /// failures are logged rather than surfaced.
    pub async fn close(&self) {
        if let Err(e) = self.transcript.remove().await {
            tracing::warn!(error = %e, "failed to remove conversation log");
        }
        remove_if_present(&self.paths.image());
        tracing::info!("session files deleted");
    }
}

/// Remove a file, ignoring absence and logging other failures
fn remove_if_present(path: &std::path::Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "failed to remove file"),
    }
}
