//! Runtime configuration for embedding the core.
//!
//! # Responsibility
//! - Resolve storage location, slot key and logging settings.
//! - Read overrides from `ITASK_*` environment variables.
//!
//! # Invariants
//! - Blank environment values fall back to defaults.
//! - A returned `CoreConfig` always carries a valid slot key and log level.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "ITASK_DB_PATH";
pub const ENV_SLOT_KEY: &str = "ITASK_SLOT_KEY";
pub const ENV_LOG_LEVEL: &str = "ITASK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "ITASK_LOG_DIR";

pub const DEFAULT_DB_FILE_NAME: &str = "itask.sqlite3";
pub const DEFAULT_SLOT_KEY: &str = "todos";
const MAX_SLOT_KEY_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidSlotKey(String),
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSlotKey(value) => write!(
                f,
                "invalid slot key `{value}`; expected 1-{MAX_SLOT_KEY_CHARS} chars of [A-Za-z0-9_.:-]"
            ),
            Self::InvalidLogLevel(message) => write!(f, "{message}"),
        }
    }
}

impl Error for ConfigError {}

/// Settings needed to open a task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file holding the storage slots.
    pub db_path: PathBuf,
    /// Slot name the task snapshot is stored under.
    pub slot_key: String,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: &'static str,
    /// Absolute directory for rolling log files; `None` disables file logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            slot_key: DEFAULT_SLOT_KEY.to_string(),
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    /// Builds a config from `ITASK_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = read(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(key) = read(ENV_SLOT_KEY) {
            config.slot_key = validate_slot_key(&key)?;
        }
        if let Some(level) = read(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?;
        }
        config.log_dir = read(ENV_LOG_DIR).map(PathBuf::from);
        Ok(config)
    }
}

fn validate_slot_key(raw: &str) -> Result<String, ConfigError> {
    let key = raw.trim();
    let valid = !key.is_empty()
        && key.chars().count() <= MAX_SLOT_KEY_CHARS
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.' | ':'));
    if !valid {
        return Err(ConfigError::InvalidSlotKey(key.to_string()));
    }
    Ok(key.to_string())
}
