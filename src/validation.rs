//! Field validators shared by the basic-info form and the collection editors.
//!
//! Each validator returns `Err(message)` with the text shown next to the field.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

/// Earliest accepted year of completion.
pub const MIN_COMPLETION_YEAR: i32 = 1900;

/// How far past the current year a completion year may be.
pub const MAX_YEARS_AHEAD: i32 = 10;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

static E164: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+[1-9]\d{7,14}$").unwrap());

/// Ambient facts validators depend on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationContext {
    pub current_year: i32,
}

impl ValidationContext {
    /// Context for the current UTC date.
    pub fn now() -> Self {
        Self {
            current_year: chrono::Utc::now().year(),
        }
    }

    /// Context pinned to `year`.
    pub fn for_year(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn max_completion_year(&self) -> i32 {
        self.current_year + MAX_YEARS_AHEAD
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::now()
    }
}

/// Phone number check, supplied by the host (e.g. a libphonenumber binding).
pub trait PhoneValidator: Send + Sync {
    fn is_valid(&self, phone: &str) -> bool;
}

/// Accepts international numbers in E.164 shape: `+`, country code, 8–15 digits total.
///
/// Spaces, dashes, dots, and parentheses are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct E164PhoneValidator;

impl PhoneValidator for E164PhoneValidator {
    fn is_valid(&self, phone: &str) -> bool {
        let compact: String = phone
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();
        E164.is_match(&compact)
    }
}

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Required text with a minimum length, e.g. first and last names.
pub fn required_min_len(label: &str, value: Option<&str>, min: usize) -> Result<(), String> {
    let value = value.unwrap_or("");
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    if char_len(value) < min {
        return Err(format!("{label} must be at least {min} characters"));
    }
    Ok(())
}

/// Minimum length only; an empty value fails the same way a short one does.
pub fn min_len(label: &str, value: &str, min: usize) -> Result<(), String> {
    if char_len(value) < min {
        return Err(format!("{label} must be at least {min} characters"));
    }
    Ok(())
}

pub fn email(value: Option<&str>) -> Result<(), String> {
    match value.map(str::trim) {
        None | Some("") => Err("Email is required".to_string()),
        Some(v) if !EMAIL.is_match(v) => Err("Invalid email format".to_string()),
        Some(_) => Ok(()),
    }
}

pub fn phone(validator: &dyn PhoneValidator, value: Option<&str>) -> Result<(), String> {
    match value.map(str::trim) {
        None | Some("") => Err("Phone number is required".to_string()),
        Some(v) if !validator.is_valid(v) => Err("Invalid phone number format".to_string()),
        Some(_) => Ok(()),
    }
}

/// Four-digit year within `[1900, current_year + 10]`.
pub fn completion_year(value: &str, ctx: &ValidationContext) -> Result<(), String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("Year of completion is required".to_string());
    }
    let max = ctx.max_completion_year();
    let four_digits = value.len() == 4 && value.bytes().all(|b| b.is_ascii_digit());
    match value.parse::<i32>() {
        Ok(year) if four_digits && (MIN_COMPLETION_YEAR..=max).contains(&year) => Ok(()),
        _ => Err(format!(
            "Please enter a valid year between {MIN_COMPLETION_YEAR} and {max}"
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_need_three_characters() {
        assert!(required_min_len("First name", Some("Ada"), 3).is_ok());
        assert_eq!(
            required_min_len("First name", Some("Al"), 3).unwrap_err(),
            "First name must be at least 3 characters"
        );
        assert_eq!(
            required_min_len("Last name", None, 3).unwrap_err(),
            "Last name is required"
        );
        assert!(required_min_len("Last name", Some("   "), 3).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(email(Some("ada@example.com")).is_ok());
        assert!(email(Some("ada@example")).is_err());
        assert!(email(Some("ada example@x.io")).is_err());
        assert_eq!(email(None).unwrap_err(), "Email is required");
    }

    #[test]
    fn e164_phone_numbers() {
        let v = E164PhoneValidator;
        assert!(v.is_valid("+14155552671"));
        assert!(v.is_valid("+91 98765 43210"));
        assert!(v.is_valid("+44 (20) 7946-0958"));
        assert!(!v.is_valid("123"));
        assert!(!v.is_valid("4155552671"));
        assert!(!v.is_valid("+0123456789"));
        assert!(!v.is_valid("+1415555267112345"));
    }

    #[test]
    fn phone_messages() {
        let v = E164PhoneValidator;
        assert_eq!(phone(&v, Some("")).unwrap_err(), "Phone number is required");
        assert_eq!(phone(&v, Some("123")).unwrap_err(), "Invalid phone number format");
        assert!(phone(&v, Some("+14155552671")).is_ok());
    }

    #[test]
    fn completion_year_bounds() {
        let ctx = ValidationContext::for_year(2025);
        assert!(completion_year("1900", &ctx).is_ok());
        assert!(completion_year("2026", &ctx).is_ok());
        assert!(completion_year("2035", &ctx).is_ok());
        assert!(completion_year("1899", &ctx).is_err());
        assert_eq!(
            completion_year("2036", &ctx).unwrap_err(),
            "Please enter a valid year between 1900 and 2035"
        );
        assert!(completion_year("twenty", &ctx).is_err());
        assert!(completion_year("+2020", &ctx).is_err());
        assert!(completion_year("02020", &ctx).is_err());
        assert_eq!(
            completion_year("", &ctx).unwrap_err(),
            "Year of completion is required"
        );
    }
}
