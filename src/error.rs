//! Error types for the application wizard.

use crate::wizard::steps::StepId;

/// Top-level error type for the wizard.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Persistence backend errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage quota exceeded writing {key}: needs {needed} bytes, capacity is {capacity}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        capacity: usize,
    },

    #[error("Stored document is corrupted: {0}")]
    Corrupted(String),
}

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Field the message is attached to, e.g. `"name"` or `"yearOfCompletion"`.
    pub field: &'static str,
    pub message: String,
}

/// Every field error produced by one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("{}", summary(.errors))]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

fn summary(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `field`.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Record the outcome of a field validator, if it failed.
    pub fn check(&mut self, field: &'static str, outcome: std::result::Result<(), String>) {
        if let Err(message) = outcome {
            self.push(field, message);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The message attached to `field`, if any.
    pub fn field(&self, field: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> std::result::Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Reorderable collection errors.
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("Failed to persist collection: {0}")]
    Store(#[from] StoreError),
}

/// Resume upload errors.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Only PDF or DOC/DOCX files are allowed.")]
    UnsupportedType { mime_type: String },

    #[error("File is too large: {size} bytes (maximum {max} bytes)")]
    TooLarge { size: u64, max: u64 },

    #[error("Failed to read {file_name}: {reason}")]
    Read { file_name: String, reason: String },

    #[error("Upload transport failed: {0}")]
    Transport(String),

    #[error("Upload cancelled")]
    Cancelled,

    #[error("Failed to store resume: {0}")]
    Store(#[from] StoreError),
}

/// A step whose prerequisites are not met.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct StepGateError {
    /// The step whose validator failed.
    pub step: StepId,
    /// Human-readable reason shown to the candidate.
    pub reason: String,
}

/// Refused wizard navigation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error(transparent)]
    Gate(#[from] StepGateError),

    #[error("Step index {index} is out of range (last step is {last})")]
    OutOfRange { index: usize, last: usize },

    #[error("The application has already been submitted")]
    Finished,
}

/// Result type alias for the wizard.
pub type Result<T> = std::result::Result<T, Error>;
