//! Upload task — drives an `UploadTransport` to completion in the background,
//! publishing and persisting progress, and stopping on `cancel()`.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::draft::model::{ResumeFile, progress_percent, storage_keys};
use crate::error::UploadError;
use crate::store::LocalPersistence;

/// Moves resume bytes somewhere, one chunk per call.
#[async_trait]
pub trait UploadTransport: Send + Sync {
    /// Send the chunk starting at `fraction` and return the new fraction.
    async fn send_next(&self, resume: &ResumeFile, fraction: f64) -> Result<f64, UploadError>;
}

/// Time-based stand-in for a network upload: `1 / steps` of the file per tick.
#[derive(Debug, Clone)]
pub struct SimulatedTransport {
    steps: u32,
    tick: Duration,
}

impl SimulatedTransport {
    pub fn new(steps: u32, tick: Duration) -> Self {
        Self {
            steps: steps.max(1),
            tick,
        }
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new(20, Duration::from_millis(150))
    }
}

#[async_trait]
impl UploadTransport for SimulatedTransport {
    async fn send_next(&self, _resume: &ResumeFile, fraction: f64) -> Result<f64, UploadError> {
        tokio::time::sleep(self.tick).await;
        let steps = f64::from(self.steps);
        let done = (fraction * steps).round() + 1.0;
        Ok((done / steps).min(1.0))
    }
}

/// How an upload task ended.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadOutcome {
    Completed,
    /// Stopped by `cancel()`; carries the fraction reached.
    Cancelled(f64),
    Failed(String),
}

/// Handle to a running upload. Dropping it cancels the upload.
#[derive(Debug)]
pub struct UploadTask {
    progress: watch::Receiver<f64>,
    cancel: Option<oneshot::Sender<()>>,
    /// Cleared by `cancel()`; progress is only written while it holds.
    live: Arc<Mutex<bool>>,
    handle: JoinHandle<UploadOutcome>,
}

impl UploadTask {
    /// Start uploading `resume` from `resume.uploaded_fraction`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        resume: ResumeFile,
        transport: Arc<dyn UploadTransport>,
        persistence: LocalPersistence,
    ) -> Self {
        let start = resume.uploaded_fraction.clamp(0.0, 1.0);
        let (progress_tx, progress) = watch::channel(start);
        let (cancel, cancel_rx) = oneshot::channel();
        let live = Arc::new(Mutex::new(true));

        let handle = tokio::spawn(run(
            resume,
            start,
            transport,
            ProgressSink {
                persistence,
                live: Arc::clone(&live),
            },
            progress_tx,
            cancel_rx,
        ));

        Self {
            progress,
            cancel: Some(cancel),
            live,
            handle,
        }
    }

    /// Latest published fraction.
    pub fn progress(&self) -> f64 {
        *self.progress.borrow()
    }

    /// Watch progress updates.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.progress.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Ask the task to stop. Progress stays at the last value reached.
    ///
    /// Once this returns the task writes no further progress, even if a
    /// step was already in flight.
    pub fn cancel(&mut self) {
        *self.live.lock().unwrap_or_else(PoisonError::into_inner) = false;
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(());
        }
    }

    /// Wait for the task to end.
    pub async fn wait(mut self) -> UploadOutcome {
        // Hold the sender so waiting is not mistaken for dropping the handle.
        let _cancel = self.cancel.take();
        match (&mut self.handle).await {
            Ok(outcome) => outcome,
            Err(e) => UploadOutcome::Failed(e.to_string()),
        }
    }
}

/// Where a running task saves its progress.
struct ProgressSink {
    persistence: LocalPersistence,
    live: Arc<Mutex<bool>>,
}

impl ProgressSink {
    /// Persist `fraction` on the blocking pool. Returns `false` once the task
    /// has been cancelled.
    async fn save(&self, file_name: &str, fraction: f64) -> bool {
        let persistence = self.persistence.clone();
        let live = Arc::clone(&self.live);
        let percent = progress_percent(fraction);
        let saved = tokio::task::spawn_blocking(move || {
            let live = live.lock().unwrap_or_else(PoisonError::into_inner);
            if !*live {
                return Ok(false);
            }
            persistence
                .set(storage_keys::RESUME_PROGRESS, &percent)
                .map(|()| true)
        })
        .await;

        match saved {
            Ok(Ok(live)) => live,
            Ok(Err(e)) => {
                warn!(file = file_name, "Failed to save upload progress: {e}");
                true
            }
            Err(e) => {
                warn!(file = file_name, "Progress writer failed: {e}");
                true
            }
        }
    }
}

async fn run(
    resume: ResumeFile,
    start: f64,
    transport: Arc<dyn UploadTransport>,
    sink: ProgressSink,
    progress: watch::Sender<f64>,
    mut cancel: oneshot::Receiver<()>,
) -> UploadOutcome {
    let mut fraction = start;
    info!(file = %resume.file_name, start, "Upload started");

    while fraction < 1.0 {
        tokio::select! {
            biased;
            _ = &mut cancel => {
                info!(file = %resume.file_name, fraction, "Upload cancelled");
                return UploadOutcome::Cancelled(fraction);
            }
            step = transport.send_next(&resume, fraction) => match step {
                Ok(next) => {
                    // Never move backwards.
                    let next = next.clamp(fraction, 1.0);
                    if !sink.save(&resume.file_name, next).await {
                        info!(file = %resume.file_name, fraction, "Upload cancelled");
                        return UploadOutcome::Cancelled(fraction);
                    }
                    fraction = next;
                    progress.send_replace(fraction);
                    debug!(file = %resume.file_name, fraction, "Upload progress");
                }
                Err(e) => {
                    warn!(file = %resume.file_name, "Upload failed: {e}");
                    return UploadOutcome::Failed(e.to_string());
                }
            }
        }
    }

    info!(file = %resume.file_name, "Upload completed");
    UploadOutcome::Completed
}
