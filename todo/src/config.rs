//! Configuration management for the todo store.
//!
//! Loads configuration from environment variables (and a `.env` file, if
//! present) with sensible defaults.

use crate::ids::{IdStrategy, UnknownIdStrategy};
use crate::persistence::DEFAULT_STORAGE_KEY;
use std::path::PathBuf;
use thiserror::Error;

/// Directory for file-backed slots unless `TASKLIST_STORAGE_DIR` is set
pub const DEFAULT_STORAGE_DIR: &str = ".tasklist";

/// Invalid configuration values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `TASKLIST_ID_STRATEGY` is not a known strategy
    #[error("TASKLIST_ID_STRATEGY: {0}")]
    IdStrategy(#[from] UnknownIdStrategy),

    /// `TASKLIST_STORAGE_QUOTA_BYTES` is not a non-negative integer
    #[error("TASKLIST_STORAGE_QUOTA_BYTES must be a byte count, got {0:?}")]
    Quota(String),

    /// `TASKLIST_STORAGE_KEY` is empty
    #[error("TASKLIST_STORAGE_KEY must not be empty")]
    EmptyKey,
}

/// Todo store configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoConfig {
    /// Directory holding the storage slots (`TASKLIST_STORAGE_DIR`)
    pub storage_dir: PathBuf,
    /// Slot the list is stored under (`TASKLIST_STORAGE_KEY`)
    pub storage_key: String,
    /// How new ids are generated (`TASKLIST_ID_STRATEGY`)
    pub id_strategy: IdStrategy,
    /// Largest value the store will write (`TASKLIST_STORAGE_QUOTA_BYTES`)
    pub storage_quota_bytes: Option<usize>,
}

impl Default for TodoConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            id_strategy: IdStrategy::default(),
            storage_quota_bytes: None,
        }
    }
}

impl TodoConfig {
    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory is read first; variables
    /// already set in the environment win.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_dir = lookup("TASKLIST_STORAGE_DIR")
            .map_or(defaults.storage_dir, PathBuf::from);

        let storage_key = match lookup("TASKLIST_STORAGE_KEY") {
            Some(key) if key.trim().is_empty() => return Err(ConfigError::EmptyKey),
            Some(key) => key.trim().to_string(),
            None => defaults.storage_key,
        };

        let id_strategy = match lookup("TASKLIST_ID_STRATEGY") {
            Some(raw) => raw.parse()?,
            None => defaults.id_strategy,
        };

        let storage_quota_bytes = lookup("TASKLIST_STORAGE_QUOTA_BYTES")
            .map(|raw| raw.trim().parse::<usize>().map_err(|_| ConfigError::Quota(raw)))
            .transpose()?;

        Ok(Self {
            storage_dir,
            storage_key,
            id_strategy,
            storage_quota_bytes,
        })
    }
}
