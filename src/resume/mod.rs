//! Resume upload — file-type policy, reading, encoding, and the upload task.

pub mod policy;
pub mod reader;
pub mod upload;
pub mod uploader;

pub use policy::{ACCEPTED_MIME_TYPES, ResumePolicy};
pub use reader::{FsResumeReader, ResumeReader, SelectedFile};
pub use upload::{SimulatedTransport, UploadOutcome, UploadTask, UploadTransport};
pub use uploader::ResumeUploader;
