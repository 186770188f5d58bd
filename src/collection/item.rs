//! `CollectionItem` — what an entity needs to live in a `CollectionEditor`.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::draft::model::{EducationEntry, Skill, SkillLevel, storage_keys};
use crate::error::ValidationErrors;
use crate::validation::{self, ValidationContext};

/// An entity with a unique id, built from a validated add-form.
pub trait CollectionItem: Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + 'static {
    /// Sub-form the candidate fills in to add an entry.
    type Form: Default + Clone + std::fmt::Debug + Send;

    /// Storage key the full ordered list is saved under.
    const STORAGE_KEY: &'static str;

    /// Readable prefix for generated ids.
    const ID_PREFIX: &'static str;

    fn id(&self) -> &str;

    /// Validate `form` and build an entity carrying `id`.
    ///
    /// Errors are attached to individual form fields.
    fn build(
        id: String,
        form: &Self::Form,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors>;
}

/// Add-skill form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillForm {
    pub name: String,
    /// One of the experience levels, as selected; empty until chosen.
    pub level: String,
}

impl SkillForm {
    pub fn new(name: impl Into<String>, level: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: level.into(),
        }
    }
}

impl CollectionItem for Skill {
    type Form = SkillForm;
    const STORAGE_KEY: &'static str = storage_keys::SKILLS;
    const ID_PREFIX: &'static str = "skill";

    fn id(&self) -> &str {
        &self.id
    }

    fn build(id: String, form: &SkillForm, _ctx: &ValidationContext) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check("name", validation::min_len("Skill name", &form.name, 2));

        match form.level.parse::<SkillLevel>() {
            Ok(level) => {
                errors.into_result()?;
                Ok(Skill {
                    id,
                    name: form.name.trim().to_string(),
                    level,
                })
            }
            Err(_) => {
                errors.push("level", "Please select an experience level");
                Err(errors)
            }
        }
    }
}

/// Add-education form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EducationForm {
    pub degree_name: String,
    pub institution: String,
    pub year_of_completion: String,
}

impl EducationForm {
    pub fn new(
        degree_name: impl Into<String>,
        institution: impl Into<String>,
        year_of_completion: impl Into<String>,
    ) -> Self {
        Self {
            degree_name: degree_name.into(),
            institution: institution.into(),
            year_of_completion: year_of_completion.into(),
        }
    }
}

impl CollectionItem for EducationEntry {
    type Form = EducationForm;
    const STORAGE_KEY: &'static str = storage_keys::EDUCATION;
    const ID_PREFIX: &'static str = "education";

    fn id(&self) -> &str {
        &self.id
    }

    fn build(
        id: String,
        form: &EducationForm,
        ctx: &ValidationContext,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(
            "degreeName",
            validation::min_len("Degree name", &form.degree_name, 2),
        );
        errors.check(
            "institution",
            validation::min_len("Institution name", &form.institution, 2),
        );
        errors.check(
            "yearOfCompletion",
            validation::completion_year(&form.year_of_completion, ctx),
        );

        errors.into_result()?;
        Ok(EducationEntry {
            id,
            degree_name: form.degree_name.trim().to_string(),
            institution: form.institution.trim().to_string(),
            year_of_completion: form.year_of_completion.trim().to_string(),
        })
    }
}
