//! `ResumeUploader` — the resume step's state: accept or reject a selected
//! file, store it, and own the upload task.

use std::sync::Arc;

use tracing::{info, warn};

use crate::draft::model::{ResumeFile, progress_percent, storage_keys};
use crate::error::{StoreError, UploadError};
use crate::store::LocalPersistence;

use super::policy::ResumePolicy;
use super::reader::{ResumeReader, SelectedFile};
use super::upload::{UploadTask, UploadTransport};

const RESUME_KEYS: [&str; 4] = [
    storage_keys::RESUME_CONTENT,
    storage_keys::RESUME_FILE_NAME,
    storage_keys::RESUME_MIME_TYPE,
    storage_keys::RESUME_PROGRESS,
];

pub struct ResumeUploader {
    persistence: LocalPersistence,
    policy: ResumePolicy,
    reader: Arc<dyn ResumeReader>,
    transport: Arc<dyn UploadTransport>,
    current: Option<ResumeFile>,
    task: Option<UploadTask>,
}

impl std::fmt::Debug for ResumeUploader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResumeUploader")
            .field("policy", &self.policy)
            .field("file", &self.current.as_ref().map(|r| &r.file_name))
            .field("uploading", &self.is_uploading())
            .finish_non_exhaustive()
    }
}

impl ResumeUploader {
    pub fn new(
        persistence: LocalPersistence,
        policy: ResumePolicy,
        reader: Arc<dyn ResumeReader>,
        transport: Arc<dyn UploadTransport>,
    ) -> Self {
        Self {
            persistence,
            policy,
            reader,
            transport,
            current: None,
            task: None,
        }
    }

    /// Rehydrate the saved resume, if any. An unfinished upload stays paused
    /// until [`resume_upload`](Self::resume_upload) is called.
    pub fn load(&mut self) {
        self.current = ResumeFile::load(&self.persistence);
    }

    pub fn policy(&self) -> &ResumePolicy {
        &self.policy
    }

    /// Snapshot of the stored resume with live progress.
    pub fn resume(&self) -> Option<ResumeFile> {
        let mut resume = self.current.clone()?;
        if let Some(task) = &self.task {
            resume.uploaded_fraction = resume.uploaded_fraction.max(task.progress());
        }
        Some(resume)
    }

    pub fn has_resume(&self) -> bool {
        self.current.is_some()
    }

    /// Upload fraction in `[0, 1]`; zero when no resume is stored.
    pub fn progress(&self) -> f64 {
        self.resume().map(|r| r.uploaded_fraction).unwrap_or(0.0)
    }

    pub fn is_uploading(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Accept a newly selected file.
    ///
    /// A rejected file (type, size, read, or storage failure) leaves the
    /// previously stored resume untouched, and its upload carries on from
    /// where it got to. On success the file is stored in full and an upload
    /// task starts from zero.
    pub async fn select(&mut self, file: SelectedFile) -> Result<ResumeFile, UploadError> {
        if let Err(e) = self.policy.check(&file) {
            info!(file = %file.name, mime = %file.mime_type, "Resume rejected: {e}");
            return Err(e);
        }

        let bytes = self.reader.read(&file).await?;
        self.policy.check_size(bytes.len() as u64)?;
        let resume = ResumeFile::from_bytes(&file.name, &file.mime_type, &bytes);

        let was_uploading = self.is_uploading();
        self.stop_task();
        if let Err(e) = self.store(&resume) {
            warn!(file = %file.name, "Failed to store resume: {e}");
            self.restore();
            if was_uploading && self.resume_upload() {
                info!("Upload of previous resume resumed");
            }
            return Err(e.into());
        }

        info!(file = %file.name, bytes = bytes.len(), "Resume stored");
        self.current = Some(resume.clone());
        self.start_task(resume.clone());
        Ok(resume)
    }

    /// Stop the running upload. Progress stays where it got to.
    pub fn cancel_upload(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.cancel();
        }
        self.sync_progress();
    }

    /// Continue an unfinished upload from its saved fraction.
    /// Returns whether a task was started.
    pub fn resume_upload(&mut self) -> bool {
        if self.is_uploading() {
            return false;
        }
        self.sync_progress();
        match self.current.clone() {
            Some(resume) if !resume.is_complete() => {
                self.start_task(resume);
                true
            }
            _ => false,
        }
    }

    /// Wait for the running upload, if any, to end.
    pub async fn wait_for_upload(&mut self) -> Option<super::UploadOutcome> {
        let task = self.task.take()?;
        let outcome = task.wait().await;
        self.current = ResumeFile::load(&self.persistence).or(self.current.take());
        Some(outcome)
    }

    /// Discard the resume and every key it was stored under.
    pub fn remove(&mut self) -> Result<(), StoreError> {
        self.stop_task();
        self.current = None;
        for key in RESUME_KEYS {
            self.persistence.remove(key)?;
        }
        info!("Resume removed");
        Ok(())
    }

    /// Forget in-memory state (storage is cleared separately).
    pub fn reset(&mut self) {
        self.stop_task();
        self.current = None;
    }

    fn store(&self, resume: &ResumeFile) -> Result<(), StoreError> {
        self.store_file(resume)?;
        self.persistence.set(
            storage_keys::RESUME_PROGRESS,
            &progress_percent(resume.uploaded_fraction),
        )
    }

    fn store_file(&self, resume: &ResumeFile) -> Result<(), StoreError> {
        // Content first: it is the write most likely to hit the quota.
        self.persistence
            .set(storage_keys::RESUME_CONTENT, &resume.content_base64)?;
        self.persistence
            .set(storage_keys::RESUME_FILE_NAME, &resume.file_name)?;
        self.persistence
            .set(storage_keys::RESUME_MIME_TYPE, &resume.mime_type)
    }

    /// Put back what was stored before a failed `select`.
    ///
    /// The progress key is written last by `store`, so a failed store never
    /// reached it and the previous upload's saved progress is left alone.
    fn restore(&mut self) {
        let outcome = match &self.current {
            Some(resume) => self.store_file(resume),
            None => RESUME_KEYS
                .iter()
                .try_for_each(|key| self.persistence.remove(key).map(|_| ())),
        };
        if let Err(e) = outcome {
            warn!("Failed to restore previous resume: {e}");
        }
    }

    fn start_task(&mut self, resume: ResumeFile) {
        self.task = Some(UploadTask::spawn(
            resume,
            Arc::clone(&self.transport),
            self.persistence.clone(),
        ));
    }

    /// Cancel the running task, folding the progress it reached into
    /// `current`.
    fn stop_task(&mut self) {
        if let Some(task) = self.task.as_mut() {
            task.cancel();
        }
        self.sync_progress();
        self.task = None;
    }

    fn sync_progress(&mut self) {
        if let (Some(current), Some(task)) = (self.current.as_mut(), self.task.as_ref()) {
            current.uploaded_fraction = current.uploaded_fraction.max(task.progress());
        }
    }
}
