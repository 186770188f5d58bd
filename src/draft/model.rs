//! Draft data model and the storage keys each field lives under.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::store::LocalPersistence;

/// Storage keys, relative to the persistence prefix. One key per field.
pub mod storage_keys {
    pub const FIRST_NAME: &str = "firstName";
    pub const LAST_NAME: &str = "lastName";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const SKILLS: &str = "skills";
    pub const EDUCATION: &str = "education";
    pub const RESUME_FILE_NAME: &str = "uploadedFileName";
    pub const RESUME_MIME_TYPE: &str = "uploadedFileType";
    /// Upload progress as a percentage string, `"0"` to `"100"`.
    pub const RESUME_PROGRESS: &str = "uploadProgress";
    /// Base64 file content (optionally as a `data:` URL).
    pub const RESUME_CONTENT: &str = "uploadedFile";
    pub const CONSENT: &str = "consentGiven";
}

/// Self-assessed proficiency for a skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Expert,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 3] = [Self::Beginner, Self::Intermediate, Self::Expert];
}

impl std::fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Expert => write!(f, "Expert"),
        }
    }
}

impl std::str::FromStr for SkillLevel {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Self::Beginner),
            "intermediate" => Ok(Self::Intermediate),
            "expert" => Ok(Self::Expert),
            _ => Err(format!("Unknown experience level: {}", s)),
        }
    }
}

/// One entry in the skills list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: String,
    pub name: String,
    pub level: SkillLevel,
}

/// One entry in the education list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EducationEntry {
    pub id: String,
    pub degree_name: String,
    pub institution: String,
    /// Four-digit year, kept as entered.
    pub year_of_completion: String,
}

/// An uploaded resume, stored in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeFile {
    pub file_name: String,
    pub mime_type: String,
    pub content_base64: String,
    /// Fraction of the upload completed, in `[0, 1]`.
    pub uploaded_fraction: f64,
}

impl ResumeFile {
    /// Encode raw file bytes.
    pub fn from_bytes(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            content_base64: STANDARD.encode(bytes),
            uploaded_fraction: 0.0,
        }
    }

    /// Reconstruct the original bytes.
    ///
    /// Accepts a bare payload or a `data:<mime>;base64,<payload>` URL.
    pub fn decode(&self) -> Result<Vec<u8>, base64::DecodeError> {
        let payload = match self.content_base64.strip_prefix("data:") {
            Some(url) => url.split_once(',').map(|(_, p)| p).unwrap_or(""),
            None => self.content_base64.as_str(),
        };
        STANDARD.decode(payload.trim())
    }

    pub fn is_complete(&self) -> bool {
        self.uploaded_fraction >= 1.0
    }

    /// Read the resume back from its four storage keys.
    ///
    /// Content, name, and type must all be present; missing progress reads as zero.
    pub fn load(persistence: &LocalPersistence) -> Option<Self> {
        let content_base64 = persistence.get_or_none(storage_keys::RESUME_CONTENT)?;
        let file_name = persistence.get_or_none(storage_keys::RESUME_FILE_NAME)?;
        let mime_type = persistence.get_or_none(storage_keys::RESUME_MIME_TYPE)?;
        let uploaded_fraction = persistence
            .get_or_none(storage_keys::RESUME_PROGRESS)
            .and_then(|p| p.trim().parse::<f64>().ok())
            .map(|percent| (percent / 100.0).clamp(0.0, 1.0))
            .unwrap_or(0.0);

        Some(Self {
            file_name,
            mime_type,
            content_base64,
            uploaded_fraction,
        })
    }
}

/// Progress fraction rendered the way it is stored.
pub(crate) fn progress_percent(fraction: f64) -> String {
    let percent = (fraction.clamp(0.0, 1.0) * 100.0).round();
    format!("{percent}")
}

/// Which basic-info field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasicInfoField {
    FirstName,
    LastName,
    Email,
    Phone,
}

impl BasicInfoField {
    pub const ALL: [BasicInfoField; 4] = [Self::FirstName, Self::LastName, Self::Email, Self::Phone];

    /// Storage key, also used as the field name in validation errors.
    pub fn key(&self) -> &'static str {
        match self {
            Self::FirstName => storage_keys::FIRST_NAME,
            Self::LastName => storage_keys::LAST_NAME,
            Self::Email => storage_keys::EMAIL,
            Self::Phone => storage_keys::PHONE,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstName => "First name",
            Self::LastName => "Last name",
            Self::Email => "Email",
            Self::Phone => "Phone",
        }
    }
}

/// Contact details. Each field stays `None` until filled in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicInfo {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl BasicInfo {
    pub fn get(&self, field: BasicInfoField) -> Option<&str> {
        match field {
            BasicInfoField::FirstName => self.first_name.as_deref(),
            BasicInfoField::LastName => self.last_name.as_deref(),
            BasicInfoField::Email => self.email.as_deref(),
            BasicInfoField::Phone => self.phone.as_deref(),
        }
    }

    pub(crate) fn slot(&mut self, field: BasicInfoField) -> &mut Option<String> {
        match field {
            BasicInfoField::FirstName => &mut self.first_name,
            BasicInfoField::LastName => &mut self.last_name,
            BasicInfoField::Email => &mut self.email,
            BasicInfoField::Phone => &mut self.phone,
        }
    }

    /// Read every field from storage; absent keys stay `None`.
    pub fn load(persistence: &LocalPersistence) -> Self {
        let mut info = Self::default();
        for field in BasicInfoField::ALL {
            *info.slot(field) = persistence
                .get_or_none(field.key())
                .filter(|v| !v.is_empty());
        }
        info
    }
}

/// The aggregate persisted across a session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationDraft {
    pub resume: Option<ResumeFile>,
    pub basic_info: BasicInfo,
    pub skills: Vec<Skill>,
    pub education: Vec<EducationEntry>,
    pub consent_given: bool,
}

impl ApplicationDraft {
    /// Assemble the draft purely from what is persisted.
    pub fn load(persistence: &LocalPersistence) -> Self {
        Self {
            resume: ResumeFile::load(persistence),
            basic_info: BasicInfo::load(persistence),
            skills: persistence
                .get_json(storage_keys::SKILLS)
                .unwrap_or_default(),
            education: persistence
                .get_json(storage_keys::EDUCATION)
                .unwrap_or_default(),
            consent_given: persistence
                .get_json(storage_keys::CONSENT)
                .unwrap_or(false),
        }
    }
}
