//! Reading the selected file's bytes.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::UploadError;

/// A file the candidate picked, before it has been read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub mime_type: String,
    /// Size as reported at selection time.
    pub size: u64,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size: u64,
        path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            size,
            path: path.into(),
        }
    }

    /// Describe a file on disk, guessing its MIME type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, UploadError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        let metadata = tokio::fs::metadata(path).await.map_err(|e| UploadError::Read {
            file_name: name.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            mime_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
            name,
            size: metadata.len(),
            path: path.to_path_buf(),
        })
    }
}

/// Produces the bytes of a selected file.
#[async_trait]
pub trait ResumeReader: Send + Sync {
    async fn read(&self, file: &SelectedFile) -> Result<Vec<u8>, UploadError>;
}

/// Reads from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsResumeReader;

#[async_trait]
impl ResumeReader for FsResumeReader {
    async fn read(&self, file: &SelectedFile) -> Result<Vec<u8>, UploadError> {
        tokio::fs::read(&file.path)
            .await
            .map_err(|e| UploadError::Read {
                file_name: file.name.clone(),
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    use crate::resume::policy::{MIME_DOC, MIME_DOCX, MIME_PDF};

    #[tokio::test]
    async fn from_path_guesses_type_and_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Resume.DOCX");
        tokio::fs::write(&path, b"PK\x03\x04").await.unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "Resume.DOCX");
        assert_eq!(file.mime_type, MIME_DOCX);
        assert_eq!(file.size, 4);

        let bytes = FsResumeReader.read(&file).await.unwrap();
        assert_eq!(bytes, b"PK\x03\x04");
    }

    #[tokio::test]
    async fn from_path_maps_common_extensions() {
        let dir = TempDir::new().unwrap();
        for (name, mime) in [
            ("cv.pdf", MIME_PDF),
            ("cv.doc", MIME_DOC),
            ("me.png", "image/png"),
            ("notes", "application/octet-stream"),
        ] {
            let path = dir.path().join(name);
            tokio::fs::write(&path, b"x").await.unwrap();
            let file = SelectedFile::from_path(&path).await.unwrap();
            assert_eq!(file.mime_type, mime, "{name}");
        }
    }

    #[tokio::test]
    async fn missing_file_is_a_read_error() {
        let file = SelectedFile::new("gone.pdf", MIME_PDF, 1, "/definitely/not/here.pdf");
        assert!(matches!(
            FsResumeReader.read(&file).await,
            Err(UploadError::Read { .. })
        ));
    }
}
