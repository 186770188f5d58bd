//! `ApplicationSession` — one candidate's run through the wizard.
//!
//! Owns every step's state (the draft) plus the step controller, and turns
//! refused navigation or rejected uploads into notifications.

use std::sync::Arc;

use tracing::{info, warn};

use crate::collection::{EducationEditor, SkillsEditor};
use crate::config::WizardConfig;
use crate::draft::{ApplicationDraft, BasicInfoField, BasicInfoForm, ResumeFile, storage_keys};
use crate::error::{Error, NavigationError, StoreError, UploadError};
use crate::resume::{
    FsResumeReader, ResumePolicy, ResumeReader, ResumeUploader, SelectedFile, SimulatedTransport,
    UploadTransport,
};
use crate::store::{FileStore, KeyValueStore, LocalPersistence};
use crate::summary::Summary;
use crate::validation::{E164PhoneValidator, PhoneValidator, ValidationContext};

use super::controller::StepController;
use super::gate::StepValidators;
use super::notify::{
    INCOMPLETE_STEP_TITLE, NAVIGATION_UNAVAILABLE_TITLE, Notification, Notifier, TracingNotifier,
    UPLOAD_FAILED_TITLE,
};
use super::steps::StepId;

/// Collaborators for a session. Anything not supplied gets a default
/// derived from the config.
pub struct SessionBuilder {
    config: WizardConfig,
    store: Option<Arc<dyn KeyValueStore>>,
    notifier: Option<Arc<dyn Notifier>>,
    phone: Option<Arc<dyn PhoneValidator>>,
    reader: Option<Arc<dyn ResumeReader>>,
    transport: Option<Arc<dyn UploadTransport>>,
    context: Option<ValidationContext>,
}

impl SessionBuilder {
    pub fn new(config: WizardConfig) -> Self {
        Self {
            config,
            store: None,
            notifier: None,
            phone: None,
            reader: None,
            transport: None,
            context: None,
        }
    }

    /// Storage backend. Defaults to a [`FileStore`] at `config.storage_path`.
    pub fn store(mut self, store: Arc<dyn KeyValueStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn phone_validator(mut self, phone: Arc<dyn PhoneValidator>) -> Self {
        self.phone = Some(phone);
        self
    }

    pub fn reader(mut self, reader: Arc<dyn ResumeReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn UploadTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn validation_context(mut self, context: ValidationContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Build the session and rehydrate it from storage.
    pub fn open(self) -> Result<ApplicationSession, Error> {
        let config = self.config;
        let store = match self.store {
            Some(store) => store,
            None => Arc::new(FileStore::open(&config.storage_path, config.storage_capacity)?),
        };
        let persistence = LocalPersistence::new(store, config.storage_prefix.clone());
        let context = self.context.unwrap_or_else(ValidationContext::now);
        let phone = self.phone.unwrap_or_else(|| Arc::new(E164PhoneValidator));
        let transport = self.transport.unwrap_or_else(|| {
            Arc::new(SimulatedTransport::new(config.upload_steps, config.upload_tick))
        });

        let mut session = ApplicationSession {
            resume: ResumeUploader::new(
                persistence.clone(),
                ResumePolicy::from_config(&config),
                self.reader.unwrap_or_else(|| Arc::new(FsResumeReader)),
                transport,
            ),
            basic_info: BasicInfoForm::new(persistence.clone()),
            skills: SkillsEditor::new(persistence.clone()).with_context(context),
            education: EducationEditor::new(persistence.clone()).with_context(context),
            consent_given: false,
            controller: StepController::new(config.jump_policy),
            validators: StepValidators::new(phone),
            notifier: self.notifier.unwrap_or_else(|| Arc::new(TracingNotifier)),
            persistence,
            config,
        };
        session.reload();
        Ok(session)
    }
}

/// The wizard as the host UI drives it.
pub struct ApplicationSession {
    config: WizardConfig,
    persistence: LocalPersistence,
    resume: ResumeUploader,
    basic_info: BasicInfoForm,
    skills: SkillsEditor,
    education: EducationEditor,
    consent_given: bool,
    controller: StepController,
    validators: StepValidators,
    notifier: Arc<dyn Notifier>,
}

impl std::fmt::Debug for ApplicationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationSession")
            .field("active", &self.controller.active())
            .field("persistence", &self.persistence)
            .field("resume", &self.resume)
            .field("skills", &self.skills.len())
            .field("education", &self.education.len())
            .field("consent_given", &self.consent_given)
            .finish_non_exhaustive()
    }
}

impl ApplicationSession {
    pub fn builder(config: WizardConfig) -> SessionBuilder {
        SessionBuilder::new(config)
    }

    /// Open a session with default collaborators.
    pub fn open(config: WizardConfig) -> Result<Self, Error> {
        SessionBuilder::new(config).open()
    }

    /// Re-read every step's state from storage. The active step is kept.
    pub fn reload(&mut self) {
        self.resume.load();
        self.basic_info.load();
        self.skills.load();
        self.education.load();
        self.consent_given = self
            .persistence
            .get_json(storage_keys::CONSENT)
            .unwrap_or(false);
        info!(
            prefix = self.persistence.prefix(),
            resume = self.resume.has_resume(),
            skills = self.skills.len(),
            education = self.education.len(),
            "Draft loaded"
        );
    }

    pub fn config(&self) -> &WizardConfig {
        &self.config
    }

    pub fn persistence(&self) -> &LocalPersistence {
        &self.persistence
    }

    /// Snapshot of every step's current state.
    pub fn draft(&self) -> ApplicationDraft {
        ApplicationDraft {
            resume: self.resume.resume(),
            basic_info: self.basic_info.values().clone(),
            skills: self.skills.items().to_vec(),
            education: self.education.items().to_vec(),
            consent_given: self.consent_given,
        }
    }

    // ── Navigation ──────────────────────────────────────────────────

    pub fn controller(&self) -> &StepController {
        &self.controller
    }

    pub fn active_step(&self) -> StepId {
        self.controller.active()
    }

    pub fn validators(&self) -> &StepValidators {
        &self.validators
    }

    /// Advance if the active step is complete. On the summary step this
    /// confirms the application.
    pub fn next(&mut self) -> Result<StepId, NavigationError> {
        let draft = self.draft();
        let validators = &self.validators;
        let outcome = self.controller.next(|step| validators.check(step, &draft));
        self.report(outcome)
    }

    pub fn back(&mut self) -> Result<StepId, NavigationError> {
        let outcome = self.controller.back();
        self.report(outcome)
    }

    pub fn jump_to(&mut self, index: usize) -> Result<StepId, NavigationError> {
        let draft = self.draft();
        let validators = &self.validators;
        let outcome = self
            .controller
            .jump_to(index, |step| validators.check(step, &draft));
        self.report(outcome)
    }

    fn report(&self, outcome: Result<StepId, NavigationError>) -> Result<StepId, NavigationError> {
        if let Err(e) = &outcome {
            let title = match e {
                NavigationError::Gate(_) => INCOMPLETE_STEP_TITLE,
                NavigationError::OutOfRange { .. } | NavigationError::Finished => {
                    NAVIGATION_UNAVAILABLE_TITLE
                }
            };
            self.notifier.notify(Notification::warning(title, e.to_string()));
        }
        outcome
    }

    // ── Resume ──────────────────────────────────────────────────────

    pub fn resume(&self) -> &ResumeUploader {
        &self.resume
    }

    pub fn resume_mut(&mut self) -> &mut ResumeUploader {
        &mut self.resume
    }

    /// Accept a selected resume file, or notify why it was rejected.
    pub async fn select_resume(&mut self, file: SelectedFile) -> Result<ResumeFile, UploadError> {
        let outcome = self.resume.select(file).await;
        if let Err(e) = &outcome {
            self.notifier
                .notify(Notification::error(UPLOAD_FAILED_TITLE, e.to_string()));
        }
        outcome
    }

    pub fn is_uploading(&self) -> bool {
        self.resume.is_uploading()
    }

    pub fn remove_resume(&mut self) -> Result<(), StoreError> {
        self.resume.remove()
    }

    // ── Basic information ───────────────────────────────────────────

    pub fn basic_info(&self) -> &BasicInfoForm {
        &self.basic_info
    }

    pub fn set_basic_info(&mut self, field: BasicInfoField, value: &str) -> Result<(), StoreError> {
        self.basic_info.set(field, value)
    }

    /// Field-level check, as on blur.
    pub fn validate_basic_info_field(&self, field: BasicInfoField) -> Result<(), String> {
        self.basic_info.validate_field(field, self.validators.phone())
    }

    // ── Skills & education ──────────────────────────────────────────

    pub fn skills(&self) -> &SkillsEditor {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut SkillsEditor {
        &mut self.skills
    }

    pub fn education(&self) -> &EducationEditor {
        &self.education
    }

    pub fn education_mut(&mut self) -> &mut EducationEditor {
        &mut self.education
    }

    // ── Summary ─────────────────────────────────────────────────────

    pub fn consent_given(&self) -> bool {
        self.consent_given
    }

    /// Tick or untick the terms checkbox. Saved before returning.
    pub fn set_consent(&mut self, agreed: bool) -> Result<(), StoreError> {
        if let Err(e) = self.persistence.set_json(storage_keys::CONSENT, &agreed) {
            warn!("Failed to save consent: {e}");
            return Err(e);
        }
        self.consent_given = agreed;
        Ok(())
    }

    /// Review document built from what is saved.
    pub fn summary(&self) -> Summary {
        Summary::load(&self.persistence)
    }

    /// Discard the whole draft, in storage and in memory, and start over.
    pub fn clear(&mut self) -> Result<usize, StoreError> {
        self.resume.reset();
        let removed = self.persistence.clear()?;
        self.basic_info.reset();
        self.skills.reset();
        self.education.reset();
        self.consent_given = false;
        self.controller.reset();
        info!(removed, "Draft cleared");
        Ok(removed)
    }
}
