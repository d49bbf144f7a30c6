//! Recording lifecycle around a single capture worker
//!
//! At most one worker exists at a time. `start` spawns a dedicated thread
//! running the capture backend; `stop` raises the stop flag and joins it.
//! The stop flag is the only cross-thread signal, and the worker is the sole
//! writer of the capture file.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::voice::{CaptureBackend, MicBackend};
use crate::{Error, Result};

struct Worker {
    stop: Arc<AtomicBool>,
    handle: JoinHandle<Result<()>>,
}

/// Controls the single microphone capture worker
pub struct Recorder {
    backend: Arc<dyn CaptureBackend>,
    target: PathBuf,
    worker: Mutex<Option<Worker>>,
}

impl Recorder {
    /// Create a recorder capturing from the default input device into `target`
    #[must_use]
    pub fn new(target: PathBuf) -> Self {
        Self::with_backend(target, Arc::new(MicBackend))
    }

    /// Create a recorder with an explicit capture backend
    #[must_use]
    pub fn with_backend(target: PathBuf, backend: Arc<dyn CaptureBackend>) -> Self {
        Self {
            backend,
            target,
            worker: Mutex::new(None),
        }
    }

    /// Begin capturing; returns immediately once the worker is running
    ///
    /// # Errors
    ///
    /// Returns `AlreadyRecording` if a live worker exists. A worker that has
    /// already exited on its own is reaped first and does not block the new
    /// start.
    pub fn start(&self) -> Result<()> {
        let mut slot = self.lock_worker()?;

        if let Some(worker) = slot.as_ref() {
            if worker.handle.is_finished() {
                if let Some(worker) = slot.take() {
                    reap(worker);
                }
            } else {
                return Err(Error::AlreadyRecording);
            }
        }

        let stop = Arc::new(AtomicBool::new(false));
        let worker_stop = Arc::clone(&stop);
        let backend = Arc::clone(&self.backend);
        let target = self.target.clone();

        let handle = std::thread::Builder::new()
            .name("audio-capture".to_string())
            .spawn(move || backend.record(&target, &worker_stop))
            .map_err(|e| Error::Audio(format!("failed to spawn capture worker: {e}")))?;

        *slot = Some(Worker { stop, handle });
        tracing::info!(target = %self.target.display(), "recording started");
        Ok(())
    }

    /// Signal the worker to stop and block until the file is flushed and closed
    ///
    /// # Errors
    ///
    /// Returns `NotRecording` when idle; otherwise surfaces any capture
    /// failure the worker ended with
    pub fn stop(&self) -> Result<()> {
        let worker = self.lock_worker()?.take().ok_or(Error::NotRecording)?;

        worker.stop.store(true, Ordering::Release);
        let result = worker
            .handle
            .join()
            .map_err(|_| Error::Audio("capture worker panicked".to_string()))?;

        tracing::info!("recording stopped");
        result
    }

    /// Whether a capture worker is currently live
    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.lock_worker()
            .map(|slot| slot.as_ref().is_some_and(|w| !w.handle.is_finished()))
            .unwrap_or(false)
    }

    fn lock_worker(&self) -> Result<std::sync::MutexGuard<'_, Option<Worker>>> {
        self.worker
            .lock()
            .map_err(|_| Error::Audio("recorder state poisoned".to_string()))
    }
}

/// Join a worker that exited on its own, logging any failure it ended with
fn reap(worker: Worker) {
    match worker.handle.join() {
        Ok(Ok(())) => tracing::debug!("reaped finished capture worker"),
        Ok(Err(e)) => tracing::warn!(error = %e, "capture worker had failed"),
        Err(_) => tracing::warn!("capture worker had panicked"),
    }
}
