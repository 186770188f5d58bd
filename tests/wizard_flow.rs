//! Integration tests for the application wizard.
//!
//! Each test opens a session over an on-disk draft in a temp directory,
//! drives it the way the host UI would, and reopens it to check what
//! survived.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use tokio::time::timeout;

use apply_wizard::collection::{EducationForm, SkillForm};
use apply_wizard::config::{JumpPolicy, WizardConfig};
use apply_wizard::draft::BasicInfoField;
use apply_wizard::error::{CollectionError, NavigationError, StoreError, UploadError};
use apply_wizard::resume::{SelectedFile, UploadOutcome};
use apply_wizard::validation::ValidationContext;
use apply_wizard::wizard::{ApplicationSession, RecordingNotifier, StepId};

/// Maximum time any test is allowed to run before we consider it hung.
const TEST_TIMEOUT: Duration = Duration::from_secs(5);

fn config(dir: &Path) -> WizardConfig {
    WizardConfig {
        storage_path: dir.join("draft.json"),
        upload_steps: 4,
        upload_tick: Duration::from_millis(5),
        ..WizardConfig::default()
    }
}

fn open(config: WizardConfig, notifier: Arc<RecordingNotifier>) -> ApplicationSession {
    ApplicationSession::builder(config)
        .notifier(notifier)
        .validation_context(ValidationContext::for_year(2025))
        .open()
        .unwrap()
}

async fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> SelectedFile {
    let path = dir.join(name);
    tokio::fs::write(&path, bytes).await.unwrap();
    SelectedFile::from_path(&path).await.unwrap()
}

fn fill_basic_info(session: &mut ApplicationSession) {
    session.set_basic_info(BasicInfoField::FirstName, "Ada").unwrap();
    session.set_basic_info(BasicInfoField::LastName, "Lovelace").unwrap();
    session.set_basic_info(BasicInfoField::Email, "ada@example.com").unwrap();
    session.set_basic_info(BasicInfoField::Phone, "+44 20 7946 0958").unwrap();
}

#[tokio::test]
async fn draft_survives_restart() {
    let dir = TempDir::new().unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let resume_bytes = b"%PDF-1.7 resume body".to_vec();

    let before = {
        let mut s = open(config(dir.path()), notifier.clone());
        let file = write_file(dir.path(), "ada-cv.pdf", &resume_bytes).await;
        s.select_resume(file).await.unwrap();
        let outcome = timeout(TEST_TIMEOUT, s.resume_mut().wait_for_upload())
            .await
            .expect("upload hung");
        assert_eq!(outcome, Some(UploadOutcome::Completed));

        fill_basic_info(&mut s);
        let go = s.skills_mut().add(SkillForm::new("Go", "Expert")).unwrap();
        let rust = s.skills_mut().add(SkillForm::new("Rust", "Intermediate")).unwrap();
        assert!(s.skills_mut().reorder(&rust.id, &go.id).unwrap());
        s.education_mut()
            .add(EducationForm::new("BSc Mathematics", "University of London", "2020"))
            .unwrap();
        s.set_consent(true).unwrap();

        for expected in [StepId::BasicInfo, StepId::Skills, StepId::Education, StepId::Summary] {
            assert_eq!(s.next().unwrap(), expected);
        }
        s.draft()
    };

    let s = open(config(dir.path()), notifier.clone());
    assert_eq!(s.active_step(), StepId::Resume, "active step is not persisted");
    assert_eq!(s.draft(), before);

    let names: Vec<&str> = s.skills().items().iter().map(|k| k.name.as_str()).collect();
    assert_eq!(names, ["Rust", "Go"]);
    assert_eq!(s.resume().progress(), 1.0);

    let summary = s.summary();
    assert_eq!(summary.draft, before);
    let download = summary.resume_download().unwrap().unwrap();
    assert_eq!(download.file_name, "ada-cv.pdf");
    assert_eq!(download.bytes, resume_bytes);

    let out = TempDir::new().unwrap();
    let saved = download.save_to(out.path()).await.unwrap();
    assert_eq!(tokio::fs::read(saved).await.unwrap(), resume_bytes);
}

#[tokio::test]
async fn jump_after_restart_checks_previous_step() {
    let dir = TempDir::new().unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    {
        let mut s = open(config(dir.path()), notifier.clone());
        fill_basic_info(&mut s);
        s.skills_mut().add(SkillForm::new("Go", "Expert")).unwrap();
    }

    let mut s = open(config(dir.path()), notifier.clone());
    // Skills are done, so Education is reachable even without a resume.
    assert_eq!(s.jump_to(3).unwrap(), StepId::Education);

    let err = s.jump_to(4).unwrap_err();
    assert!(matches!(err, NavigationError::Gate(ref g) if g.step == StepId::Education));
    assert_eq!(
        notifier.last().unwrap().message,
        "Please complete the previous step to jump ahead."
    );
    assert_eq!(s.active_step(), StepId::Education);

    assert_eq!(
        s.jump_to(9),
        Err(NavigationError::OutOfRange { index: 9, last: 5 })
    );
    assert_eq!(s.jump_to(0).unwrap(), StepId::Resume);
}

#[tokio::test]
async fn all_prior_policy_from_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("draft.json");
    let config = WizardConfig::from_lookup(|key| match key {
        "APPLY_WIZARD_JUMP_POLICY" => Some("all_prior".to_string()),
        "APPLY_WIZARD_STORAGE_PATH" => Some(path.display().to_string()),
        _ => None,
    })
    .unwrap();
    assert_eq!(config.jump_policy, JumpPolicy::AllPrior);

    let mut s = open(config, Arc::new(RecordingNotifier::new()));
    s.skills_mut().add(SkillForm::new("Go", "Expert")).unwrap();

    let err = s.jump_to(3).unwrap_err();
    assert!(matches!(err, NavigationError::Gate(ref g) if g.step == StepId::Resume));
}

#[tokio::test]
async fn invalid_entries_are_rejected_with_field_errors() {
    let dir = TempDir::new().unwrap();
    let mut s = open(config(dir.path()), Arc::new(RecordingNotifier::new()));

    s.skills_mut().show_form();
    s.skills_mut().form_mut().name = "A".into();
    s.skills_mut().form_mut().level = "Expert".into();
    let Err(CollectionError::Invalid(errors)) = s.skills_mut().add_from_form() else {
        panic!("one-letter skill should be rejected");
    };
    assert_eq!(
        errors.field("name"),
        Some("Skill name must be at least 2 characters")
    );
    assert!(s.skills().is_empty());
    assert!(s.skills().is_form_visible(), "form stays open with its values");
    assert_eq!(s.skills().form().name, "A");

    let Err(CollectionError::Invalid(errors)) = s
        .education_mut()
        .add(EducationForm::new("BSc", "MIT", "1899"))
    else {
        panic!("1899 should be rejected");
    };
    assert_eq!(
        errors.field("yearOfCompletion"),
        Some("Please enter a valid year between 1900 and 2035")
    );
    assert!(
        s.education_mut()
            .add(EducationForm::new("BSc", "MIT", "2026"))
            .is_ok()
    );
}

#[tokio::test]
async fn rejected_uploads_leave_resume_unset() {
    let dir = TempDir::new().unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let mut s = open(config(dir.path()), notifier.clone());

    let png = write_file(dir.path(), "photo.png", b"\x89PNG\r\n").await;
    let err = s.select_resume(png).await.unwrap_err();
    assert_eq!(err.to_string(), "Only PDF or DOC/DOCX files are allowed.");
    assert_eq!(
        notifier.last().unwrap().message,
        "Only PDF or DOC/DOCX files are allowed."
    );
    assert!(!s.resume().has_resume());
    assert!(s.next().is_err());
}

#[tokio::test]
async fn storage_quota_is_reported() {
    let dir = TempDir::new().unwrap();
    let config = WizardConfig {
        storage_capacity: Some(1024),
        ..config(dir.path())
    };
    let mut s = open(config.clone(), Arc::new(RecordingNotifier::new()));

    let big = write_file(dir.path(), "big.pdf", &vec![b'x'; 2048]).await;
    let err = s.select_resume(big).await.unwrap_err();
    assert!(matches!(
        err,
        UploadError::Store(StoreError::QuotaExceeded { .. })
    ));
    assert!(!s.resume().has_resume());

    // Nothing half-written survives a reopen either.
    let s = open(config, Arc::new(RecordingNotifier::new()));
    assert!(!s.resume().has_resume());
}

#[tokio::test]
async fn clear_starts_over() {
    let dir = TempDir::new().unwrap();
    let notifier = Arc::new(RecordingNotifier::new());
    let mut s = open(config(dir.path()), notifier.clone());
    fill_basic_info(&mut s);
    s.skills_mut().add(SkillForm::new("Go", "Expert")).unwrap();
    s.clear().unwrap();
    drop(s);

    let s = open(config(dir.path()), notifier);
    assert!(s.skills().is_empty());
    assert!(s.basic_info().get(BasicInfoField::FirstName).is_none());
}
