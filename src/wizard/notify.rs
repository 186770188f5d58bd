//! User-facing notifications (toasts) raised by refused navigation and
//! rejected uploads.

use std::sync::{Mutex, PoisonError};

use tracing::{info, warn};

/// Title used when a step validator refuses a transition.
pub const INCOMPLETE_STEP_TITLE: &str = "Incomplete Step";

/// Title used for any other refused move: no such step, or already submitted.
pub const NAVIGATION_UNAVAILABLE_TITLE: &str = "Navigation Unavailable";

/// Title used for rejected resume files.
pub const UPLOAD_FAILED_TITLE: &str = "Upload Failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

/// Where notifications are shown. The host UI supplies its own.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Info => info!(title = %n.title, "{}", n.message),
            NotificationLevel::Warning | NotificationLevel::Error => {
                warn!(title = %n.title, "{}", n.message)
            }
        }
    }
}

/// Keeps every notification in memory, e.g. for a headless host.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, oldest first.
    pub fn notifications(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
