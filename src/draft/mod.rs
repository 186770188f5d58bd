//! The application draft — everything the candidate has entered so far.

pub mod basic_info;
pub mod model;

pub use basic_info::BasicInfoForm;
pub use model::{
    ApplicationDraft, BasicInfo, BasicInfoField, EducationEntry, ResumeFile, Skill, SkillLevel,
    storage_keys,
};
