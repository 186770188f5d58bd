//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default namespace for every persisted key.
pub const DEFAULT_STORAGE_PREFIX: &str = "job_application_";

/// How `jump_to` gates a direct step jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JumpPolicy {
    /// Only the step immediately before the target must pass.
    #[default]
    PreviousStep,
    /// Every step before the target must pass.
    AllPrior,
}

impl std::str::FromStr for JumpPolicy {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "previous" | "previous_step" => Ok(Self::PreviousStep),
            "all" | "all_prior" => Ok(Self::AllPrior),
            other => Err(format!("Unknown jump policy: {other}")),
        }
    }
}

/// Wizard configuration.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    /// Namespace prepended to every storage key.
    pub storage_prefix: String,
    /// Where the on-disk draft lives.
    pub storage_path: PathBuf,
    /// Byte ceiling for the store (keys + values). `None` means unbounded.
    pub storage_capacity: Option<usize>,
    /// Largest accepted resume, in bytes.
    pub max_resume_bytes: u64,
    /// Number of increments the simulated upload takes to finish.
    pub upload_steps: u32,
    /// Delay between simulated upload increments.
    pub upload_tick: Duration,
    /// Jump gate policy.
    pub jump_policy: JumpPolicy,
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            storage_prefix: DEFAULT_STORAGE_PREFIX.to_string(),
            storage_path: PathBuf::from("./data/application-draft.json"),
            storage_capacity: Some(10 * 1024 * 1024), // roughly a browser's local storage
            max_resume_bytes: 5 * 1024 * 1024,
            upload_steps: 20,
            upload_tick: Duration::from_millis(150),
            jump_policy: JumpPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl WizardConfig {
    /// Build from `APPLY_WIZARD_*` environment variables, defaulting anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(prefix) = lookup("APPLY_WIZARD_STORAGE_PREFIX") {
            config.storage_prefix = prefix;
        }
        if let Some(path) = lookup("APPLY_WIZARD_STORAGE_PATH") {
            config.storage_path = PathBuf::from(path);
        }
        if let Some(raw) = lookup("APPLY_WIZARD_STORAGE_CAPACITY") {
            config.storage_capacity = match raw.trim() {
                "" | "0" | "unbounded" => None,
                value => Some(parse("APPLY_WIZARD_STORAGE_CAPACITY", value)?),
            };
        }
        if let Some(raw) = lookup("APPLY_WIZARD_MAX_RESUME_BYTES") {
            config.max_resume_bytes = parse("APPLY_WIZARD_MAX_RESUME_BYTES", &raw)?;
        }
        if let Some(raw) = lookup("APPLY_WIZARD_UPLOAD_STEPS") {
            let steps: u32 = parse("APPLY_WIZARD_UPLOAD_STEPS", &raw)?;
            if steps == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "APPLY_WIZARD_UPLOAD_STEPS".into(),
                    message: "must be at least 1".into(),
                });
            }
            config.upload_steps = steps;
        }
        if let Some(raw) = lookup("APPLY_WIZARD_UPLOAD_TICK_MS") {
            config.upload_tick =
                Duration::from_millis(parse("APPLY_WIZARD_UPLOAD_TICK_MS", &raw)?);
        }
        if let Some(raw) = lookup("APPLY_WIZARD_JUMP_POLICY") {
            config.jump_policy = raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "APPLY_WIZARD_JUMP_POLICY".into(),
                message,
            })?;
        }
        if let Some(level) = lookup("APPLY_WIZARD_LOG_LEVEL") {
            config.log_level = level;
        }

        Ok(config)
    }
}

fn parse<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}
