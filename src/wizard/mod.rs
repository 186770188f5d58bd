//! Step wizard — the ordered steps, their completeness checks, and the
//! session that moves a candidate through them.
//!
//! A candidate starts on the resume step. `next` only advances when the
//! active step is complete; `back` is always allowed until the application
//! is confirmed. Every step's data is written through to storage as it is
//! entered, so reopening a session restores the draft (but not the active
//! step).

pub mod controller;
pub mod gate;
pub mod notify;
pub mod session;
pub mod steps;

pub use controller::StepController;
pub use gate::StepValidators;
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier, TracingNotifier};
pub use session::{ApplicationSession, SessionBuilder};
pub use steps::{PrimaryAction, StepId, StepStatus};
