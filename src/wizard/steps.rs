//! Wizard steps — the fixed, ordered pages of the application.

use serde::{Deserialize, Serialize};

/// The pages of the wizard, in order.
///
/// Progresses linearly: Resume → BasicInfo → Skills → Education → Summary →
/// Completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepId {
    Resume,
    BasicInfo,
    Skills,
    Education,
    Summary,
    Completed,
}

impl StepId {
    pub const ALL: [StepId; 6] = [
        Self::Resume,
        Self::BasicInfo,
        Self::Skills,
        Self::Education,
        Self::Summary,
        Self::Completed,
    ];

    pub const FIRST: StepId = Self::Resume;
    pub const LAST: StepId = Self::Completed;

    /// Zero-based position in the wizard.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_index(index: usize) -> Option<StepId> {
        Self::ALL.get(index).copied()
    }

    /// Whether this step is terminal (application submitted).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// The following step, if any.
    pub fn next(&self) -> Option<StepId> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding step, if any.
    pub fn prev(&self) -> Option<StepId> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    /// Title shown in the step indicator.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Resume => "Upload Resume",
            Self::BasicInfo => "Basic Information",
            Self::Skills => "Skill Set",
            Self::Education => "Education",
            Self::Summary => "Summary",
            Self::Completed => "Completed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Resume => "Upload your latest resume (PDF or DOC/DOCX).",
            Self::BasicInfo => "Tell us your name and how to reach you.",
            Self::Skills => "List your skills and how experienced you are with each.",
            Self::Education => "Add the degrees or certificates you have completed.",
            Self::Summary => "Review your application and agree to the terms.",
            Self::Completed => "Your application has been submitted.",
        }
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for StepId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Resume => "resume",
            Self::BasicInfo => "basic_info",
            Self::Skills => "skills",
            Self::Education => "education",
            Self::Summary => "summary",
            Self::Completed => "completed",
        };
        write!(f, "{s}")
    }
}

/// How a step relates to the active one, for the step indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Completed,
    Active,
    Pending,
}

/// The primary button shown on a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryAction {
    Next,
    Confirm,
}

impl PrimaryAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Next => "Next",
            Self::Confirm => "Confirm",
        }
    }
}
