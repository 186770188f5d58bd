//! Apply Wizard — a multi-step job application with a durable local draft.

pub mod collection;
pub mod config;
pub mod draft;
pub mod error;
pub mod resume;
pub mod store;
pub mod summary;
pub mod telemetry;
pub mod validation;
pub mod wizard;

pub use config::WizardConfig;
pub use error::{Error, Result};
pub use wizard::{ApplicationSession, StepId};
