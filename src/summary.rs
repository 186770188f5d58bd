//! Summary — a read-only review of the saved draft, built from storage.

use std::path::{Path, PathBuf};

use crate::draft::{ApplicationDraft, BasicInfoField, ResumeFile};
use crate::error::StoreError;
use crate::store::LocalPersistence;

/// Declaration shown above the consent checkbox.
pub const TERMS: &str = "By submitting this form, you confirm that all information provided \
is accurate and complete to the best of your knowledge. Any false or misleading information \
may result in disqualification from the recruitment process or termination of employment if \
discovered later.\n\nSubmission of this form does not guarantee an interview or employment. \
Your personal data will be handled confidentially and used solely for recruitment purposes.";

pub const CONSENT_LABEL: &str = "By submitting, you agree to our Terms & Conditions.";

/// Everything the candidate is asked to review before confirming.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub draft: ApplicationDraft,
}

impl Summary {
    /// Read the draft as currently saved, independent of any step's state.
    pub fn load(persistence: &LocalPersistence) -> Self {
        Self {
            draft: ApplicationDraft::load(persistence),
        }
    }

    /// The stored resume as a downloadable file, if one was uploaded.
    pub fn resume_download(&self) -> Option<Result<ResumeDownload, StoreError>> {
        self.draft.resume.as_ref().map(ResumeDownload::from_resume)
    }

    pub fn render(&self) -> String {
        let draft = &self.draft;
        let mut parts = vec!["# Summary".to_string(), String::new(), "## Resume".to_string()];

        match &draft.resume {
            Some(resume) => parts.push(format!("- **File name:** {}", resume.file_name)),
            None => parts.push("- No resume uploaded".to_string()),
        }

        parts.push(String::new());
        parts.push("## Basic Information".to_string());
        for field in BasicInfoField::ALL {
            let value = draft.basic_info.get(field).unwrap_or("");
            parts.push(format!("- **{}:** {}", field.label(), value));
        }

        parts.push(String::new());
        parts.push("## Skills".to_string());
        if draft.skills.is_empty() {
            parts.push("- None".to_string());
        }
        for (i, skill) in draft.skills.iter().enumerate() {
            parts.push(format!("{}. {} ({})", i + 1, skill.name, skill.level));
        }

        parts.push(String::new());
        parts.push("## Education".to_string());
        if draft.education.is_empty() {
            parts.push("- None".to_string());
        }
        for edu in &draft.education {
            parts.push(format!(
                "- {}, {}, {}",
                edu.degree_name, edu.institution, edu.year_of_completion
            ));
        }

        parts.push(String::new());
        parts.push(TERMS.to_string());
        parts.push(String::new());
        let mark = if draft.consent_given { "x" } else { " " };
        parts.push(format!("[{mark}] {CONSENT_LABEL}"));

        parts.join("\n")
    }
}

/// A stored resume decoded back into its original bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeDownload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ResumeDownload {
    pub fn from_resume(resume: &ResumeFile) -> Result<Self, StoreError> {
        let bytes = resume.decode().map_err(|e| {
            StoreError::Corrupted(format!("resume {}: {e}", resume.file_name))
        })?;
        Ok(Self {
            file_name: resume.file_name.clone(),
            mime_type: resume.mime_type.clone(),
            bytes,
        })
    }

    /// Write the file into `dir` under its original name and return the path.
    ///
    /// Directory components in the stored name are ignored.
    pub async fn save_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let name = Path::new(&self.file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "resume".into());
        let path = dir.as_ref().join(name);
        tokio::fs::create_dir_all(dir.as_ref()).await?;
        tokio::fs::write(&path, &self.bytes).await?;
        tracing::info!(path = %path.display(), bytes = self.bytes.len(), "Resume saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::draft::storage_keys;
    use crate::store::MemoryStore;

    fn persistence() -> LocalPersistence {
        LocalPersistence::with_default_prefix(Arc::new(MemoryStore::new()))
    }

    fn seed(p: &LocalPersistence) {
        p.set("firstName", "Ada").unwrap();
        p.set("lastName", "Lovelace").unwrap();
        p.set("email", "ada@example.com").unwrap();
        p.set("phone", "+14155552671").unwrap();
        p.set(
            "skills",
            r#"[{"id":"skill-1","name":"Go","level":"Expert"},{"id":"skill-2","name":"Rust","level":"Beginner"}]"#,
        )
        .unwrap();
        p.set(
            "education",
            r#"[{"id":"edu-1","degreeName":"BSc","institution":"MIT","yearOfCompletion":"2020"}]"#,
        )
        .unwrap();
        p.set(storage_keys::RESUME_CONTENT, "data:application/pdf;base64,JVBERg==")
            .unwrap();
        p.set(storage_keys::RESUME_FILE_NAME, "cv.pdf").unwrap();
        p.set(storage_keys::RESUME_MIME_TYPE, "application/pdf").unwrap();
        p.set(storage_keys::RESUME_PROGRESS, "100").unwrap();
    }

    #[test]
    fn render_full_draft() {
        let p = persistence();
        seed(&p);
        let text = Summary::load(&p).render();

        assert!(text.contains("- **File name:** cv.pdf"));
        assert!(text.contains("- **First name:** Ada"));
        assert!(text.contains("1. Go (Expert)"));
        assert!(text.contains("2. Rust (Beginner)"));
        assert!(text.contains("- BSc, MIT, 2020"));
        assert!(text.contains("[ ] By submitting"));
    }

    #[test]
    fn render_empty_draft() {
        let text = Summary::load(&persistence()).render();
        assert!(text.contains("No resume uploaded"));
        assert!(text.contains("## Skills\n- None"));
        assert!(text.contains(TERMS));
    }

    #[test]
    fn consent_is_read_from_storage() {
        let p = persistence();
        p.set_json(storage_keys::CONSENT, &true).unwrap();
        let summary = Summary::load(&p);
        assert!(summary.draft.consent_given);
        assert!(summary.render().contains("[x] By submitting"));
    }

    #[tokio::test]
    async fn download_decodes_data_url() {
        let p = persistence();
        seed(&p);
        let download = Summary::load(&p).resume_download().unwrap().unwrap();
        assert_eq!(download.bytes, b"%PDF");
        assert_eq!(download.mime_type, "application/pdf");

        let dir = tempfile::tempdir().unwrap();
        let path = download.save_to(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("cv.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF");
    }

    #[tokio::test]
    async fn save_to_strips_directories() {
        let download = ResumeDownload {
            file_name: "../../etc/cv.pdf".into(),
            mime_type: "application/pdf".into(),
            bytes: b"x".to_vec(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = download.save_to(dir.path()).await.unwrap();
        assert_eq!(path, dir.path().join("cv.pdf"));
    }

    #[test]
    fn corrupted_resume_reports_error() {
        let p = persistence();
        seed(&p);
        p.set(storage_keys::RESUME_CONTENT, "not base64!!").unwrap();
        let err = Summary::load(&p).resume_download().unwrap().unwrap_err();
        assert!(matches!(err, StoreError::Corrupted(_)));
    }
}
