//! Which files are accepted as a resume.

use crate::config::WizardConfig;
use crate::error::UploadError;

use super::reader::SelectedFile;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOC: &str = "application/msword";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// PDF, legacy Word, and Open XML Word.
pub const ACCEPTED_MIME_TYPES: [&str; 3] = [MIME_PDF, MIME_DOC, MIME_DOCX];

/// Default size ceiling: 5 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumePolicy {
    pub accepted_mime_types: Vec<String>,
    pub max_bytes: u64,
}

impl Default for ResumePolicy {
    fn default() -> Self {
        Self {
            accepted_mime_types: ACCEPTED_MIME_TYPES.iter().map(|m| m.to_string()).collect(),
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }
}

impl ResumePolicy {
    pub fn from_config(config: &WizardConfig) -> Self {
        Self {
            max_bytes: config.max_resume_bytes,
            ..Self::default()
        }
    }

    pub fn accepts_mime(&self, mime_type: &str) -> bool {
        self.accepted_mime_types
            .iter()
            .any(|m| m.eq_ignore_ascii_case(mime_type.trim()))
    }

    /// Check type and declared size before anything is read.
    pub fn check(&self, file: &SelectedFile) -> Result<(), UploadError> {
        if !self.accepts_mime(&file.mime_type) {
            return Err(UploadError::UnsupportedType {
                mime_type: file.mime_type.clone(),
            });
        }
        self.check_size(file.size)
    }

    pub fn check_size(&self, size: u64) -> Result<(), UploadError> {
        if size > self.max_bytes {
            return Err(UploadError::TooLarge {
                size,
                max: self.max_bytes,
            });
        }
        Ok(())
    }
}
