//! Basic-information form: contact fields with write-through persistence.

use tracing::warn;

use crate::error::{StoreError, ValidationErrors};
use crate::store::LocalPersistence;
use crate::validation::{self, PhoneValidator};

use super::model::{BasicInfo, BasicInfoField};

/// Minimum length for first and last names.
pub const MIN_NAME_LEN: usize = 3;

/// Editable basic-info fields, kept in step with storage.
#[derive(Debug)]
pub struct BasicInfoForm {
    persistence: LocalPersistence,
    values: BasicInfo,
}

impl BasicInfoForm {
    /// Empty form; call [`load`](Self::load) to rehydrate.
    pub fn new(persistence: LocalPersistence) -> Self {
        Self {
            persistence,
            values: BasicInfo::default(),
        }
    }

    /// Replace the in-memory values with whatever is saved.
    pub fn load(&mut self) {
        self.values = BasicInfo::load(&self.persistence);
    }

    pub fn values(&self) -> &BasicInfo {
        &self.values
    }

    pub fn get(&self, field: BasicInfoField) -> Option<&str> {
        self.values.get(field)
    }

    /// Update one field and persist it before returning.
    ///
    /// A blank value clears the field and removes its key. On a failed write
    /// the in-memory value is left as it was.
    pub fn set(&mut self, field: BasicInfoField, value: &str) -> Result<(), StoreError> {
        let written = if value.is_empty() {
            self.persistence.remove(field.key()).map(|_| None)
        } else {
            self.persistence
                .set(field.key(), value)
                .map(|()| Some(value.to_string()))
        };
        match written {
            Ok(next) => {
                *self.values.slot(field) = next;
                Ok(())
            }
            Err(e) => {
                warn!(field = field.key(), "Failed to save field: {e}");
                Err(e)
            }
        }
    }

    /// Validate a single field, as on blur.
    pub fn validate_field(
        &self,
        field: BasicInfoField,
        phone: &dyn PhoneValidator,
    ) -> Result<(), String> {
        check_field(field, self.values.get(field), phone)
    }

    /// Validate every field, collecting one error per failing field.
    pub fn validate(&self, phone: &dyn PhoneValidator) -> Result<(), ValidationErrors> {
        validate_basic_info(&self.values, phone)
    }

    /// Forget in-memory values (storage is cleared separately).
    pub fn reset(&mut self) {
        self.values = BasicInfo::default();
    }
}

/// Field-by-field validation of `info`.
pub fn validate_basic_info(
    info: &BasicInfo,
    phone: &dyn PhoneValidator,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    for field in BasicInfoField::ALL {
        errors.check(field.key(), check_field(field, info.get(field), phone));
    }
    errors.into_result()
}

fn check_field(
    field: BasicInfoField,
    value: Option<&str>,
    phone: &dyn PhoneValidator,
) -> Result<(), String> {
    match field {
        BasicInfoField::FirstName | BasicInfoField::LastName => {
            validation::required_min_len(field.label(), value, MIN_NAME_LEN)
        }
        BasicInfoField::Email => validation::email(value),
        BasicInfoField::Phone => validation::phone(phone, value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::store::MemoryStore;
    use crate::validation::E164PhoneValidator;

    fn form() -> (LocalPersistence, BasicInfoForm) {
        let persistence = LocalPersistence::with_default_prefix(Arc::new(MemoryStore::new()));
        (persistence.clone(), BasicInfoForm::new(persistence))
    }

    fn fill(form: &mut BasicInfoForm, phone: &str) {
        form.set(BasicInfoField::FirstName, "Ada").unwrap();
        form.set(BasicInfoField::LastName, "Lovelace").unwrap();
        form.set(BasicInfoField::Email, "ada@example.com").unwrap();
        form.set(BasicInfoField::Phone, phone).unwrap();
    }

    #[test]
    fn set_writes_through() {
        let (persistence, mut form) = form();
        form.set(BasicInfoField::Email, "ada@example.com").unwrap();
        assert_eq!(
            persistence.get("email").unwrap().as_deref(),
            Some("ada@example.com")
        );

        form.set(BasicInfoField::Email, "").unwrap();
        assert!(persistence.get("email").unwrap().is_none());
        assert!(form.get(BasicInfoField::Email).is_none());
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let persistence =
            LocalPersistence::with_default_prefix(Arc::new(MemoryStore::with_capacity(40)));
        let mut form = BasicInfoForm::new(persistence.clone());
        form.set(BasicInfoField::FirstName, "Ada").unwrap();

        let long = "x".repeat(100);
        assert!(matches!(
            form.set(BasicInfoField::FirstName, &long),
            Err(StoreError::QuotaExceeded { .. })
        ));
        assert_eq!(form.get(BasicInfoField::FirstName), Some("Ada"));
        assert_eq!(
            persistence.get("firstName").unwrap().as_deref(),
            Some("Ada")
        );
    }

    #[test]
    fn load_rehydrates() {
        let (persistence, mut form) = form();
        persistence.set("firstName", "Grace").unwrap();
        form.load();
        assert_eq!(form.get(BasicInfoField::FirstName), Some("Grace"));
        assert!(form.get(BasicInfoField::Phone).is_none());
    }

    #[test]
    fn malformed_phone_fails_only_phone() {
        let (_, mut form) = form();
        fill(&mut form, "123");

        let errors = form.validate(&E164PhoneValidator).unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.field("phone"), Some("Invalid phone number format"));
    }

    #[test]
    fn well_formed_info_passes() {
        let (_, mut form) = form();
        fill(&mut form, "+14155552671");
        assert!(form.validate(&E164PhoneValidator).is_ok());
    }

    #[test]
    fn empty_form_reports_every_field() {
        let (_, form) = form();
        let errors = form.validate(&E164PhoneValidator).unwrap_err();
        assert_eq!(errors.errors.len(), 4);
        assert_eq!(errors.field("firstName"), Some("First name is required"));
        assert_eq!(
            form.validate_field(BasicInfoField::LastName, &E164PhoneValidator)
                .unwrap_err(),
            "Last name is required"
        );
    }
}
