//! Step validators — whether a step's content is complete enough to leave it.

use std::sync::Arc;

use crate::draft::ApplicationDraft;
use crate::draft::basic_info::validate_basic_info;
use crate::error::StepGateError;
use crate::validation::{E164PhoneValidator, PhoneValidator};

use super::steps::StepId;

/// One completeness predicate per step, evaluated against a draft snapshot.
#[derive(Clone)]
pub struct StepValidators {
    phone: Arc<dyn PhoneValidator>,
}

impl std::fmt::Debug for StepValidators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StepValidators").finish_non_exhaustive()
    }
}

impl Default for StepValidators {
    fn default() -> Self {
        Self::new(Arc::new(E164PhoneValidator))
    }
}

impl StepValidators {
    pub fn new(phone: Arc<dyn PhoneValidator>) -> Self {
        Self { phone }
    }

    pub fn phone(&self) -> &dyn PhoneValidator {
        self.phone.as_ref()
    }

    /// Check `step` against `draft`.
    pub fn check(&self, step: StepId, draft: &ApplicationDraft) -> Result<(), StepGateError> {
        let passes = match step {
            StepId::Resume => draft.resume.is_some(),
            StepId::BasicInfo => validate_basic_info(&draft.basic_info, self.phone()).is_ok(),
            StepId::Skills => !draft.skills.is_empty(),
            StepId::Education => !draft.education.is_empty(),
            StepId::Summary => draft.consent_given,
            StepId::Completed => true,
        };
        if passes {
            Ok(())
        } else {
            Err(StepGateError {
                step,
                reason: failure_message(step).to_string(),
            })
        }
    }

    pub fn passes(&self, step: StepId, draft: &ApplicationDraft) -> bool {
        self.check(step, draft).is_ok()
    }
}

fn failure_message(step: StepId) -> &'static str {
    match step {
        StepId::Resume => "Please upload your resume to proceed.",
        StepId::BasicInfo => "Please correct the highlighted fields to proceed.",
        StepId::Skills => "Please select at least one skill to proceed.",
        StepId::Education => "Please provide at least one education entry to proceed.",
        StepId::Summary => "Please agree to the terms before proceeding.",
        StepId::Completed => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{BasicInfo, EducationEntry, ResumeFile, Skill, SkillLevel};

    fn complete_draft() -> ApplicationDraft {
        ApplicationDraft {
            resume: Some(ResumeFile::from_bytes("cv.pdf", "application/pdf", b"%PDF")),
            basic_info: BasicInfo {
                first_name: Some("Ada".into()),
                last_name: Some("Lovelace".into()),
                email: Some("ada@example.com".into()),
                phone: Some("+14155552671".into()),
            },
            skills: vec![Skill {
                id: "skill-1".into(),
                name: "Go".into(),
                level: SkillLevel::Expert,
            }],
            education: vec![EducationEntry {
                id: "edu-1".into(),
                degree_name: "BSc".into(),
                institution: "MIT".into(),
                year_of_completion: "2020".into(),
            }],
            consent_given: true,
        }
    }

    #[test]
    fn complete_draft_passes_every_step() {
        let gate = StepValidators::default();
        let draft = complete_draft();
        for step in StepId::ALL {
            assert!(gate.passes(step, &draft), "{step} should pass");
        }
    }

    #[test]
    fn empty_draft_fails_with_step_messages() {
        let gate = StepValidators::default();
        let draft = ApplicationDraft::default();

        let err = gate.check(StepId::Resume, &draft).unwrap_err();
        assert_eq!(err.step, StepId::Resume);
        assert_eq!(err.to_string(), "Please upload your resume to proceed.");
        assert_eq!(
            gate.check(StepId::Skills, &draft).unwrap_err().reason,
            "Please select at least one skill to proceed."
        );
        assert_eq!(
            gate.check(StepId::Summary, &draft).unwrap_err().reason,
            "Please agree to the terms before proceeding."
        );
        assert!(gate.passes(StepId::Completed, &draft));
    }

    #[test]
    fn malformed_phone_blocks_basic_info() {
        let gate = StepValidators::default();
        let mut draft = complete_draft();
        draft.basic_info.phone = Some("123".into());
        assert_eq!(
            gate.check(StepId::BasicInfo, &draft).unwrap_err().reason,
            "Please correct the highlighted fields to proceed."
        );
    }

    struct AnyPhone;

    impl PhoneValidator for AnyPhone {
        fn is_valid(&self, _phone: &str) -> bool {
            true
        }
    }

    #[test]
    fn phone_validator_is_injected() {
        let gate = StepValidators::new(Arc::new(AnyPhone));
        let mut draft = complete_draft();
        draft.basic_info.phone = Some("123".into());
        assert!(gate.passes(StepId::BasicInfo, &draft));
    }
}
