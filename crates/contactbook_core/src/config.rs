//! Runtime configuration for the contact book.
//!
//! # Invariants
//! - `storage_key` is non-empty after trimming.
//! - Page size is not configurable; see `pagination::PAGE_SIZE`.

use crate::logging::default_log_level;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_STORAGE_KEY: &str = "contacts";
pub const DEFAULT_DB_FILE_NAME: &str = "contactbook.sqlite3";
const DEFAULT_DATA_DIR_NAME: &str = "contactbook";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyStorageKey,
    EmptyDbFileName,
    ZeroQuota,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyStorageKey => write!(f, "storage key must not be blank"),
            Self::EmptyDbFileName => write!(f, "database file name must not be blank"),
            Self::ZeroQuota => write!(f, "storage quota must be at least one page"),
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactBookConfig {
    /// Directory holding the SQLite storage file.
    pub data_dir: PathBuf,
    /// Key the contact collection is stored under.
    pub storage_key: String,
    pub db_file_name: String,
    /// Optional `max_page_count` cap for the SQLite medium.
    pub storage_quota_pages: Option<u32>,
    /// Skip the SQLite medium entirely.
    pub force_memory: bool,
    pub log_level: String,
    /// Absolute directory for rolling log files; logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for ContactBookConfig {
    fn default() -> Self {
        Self {
            data_dir: std::env::temp_dir().join(DEFAULT_DATA_DIR_NAME),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            db_file_name: DEFAULT_DB_FILE_NAME.to_string(),
            storage_quota_pages: None,
            force_memory: false,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ContactBookConfig {
    /// Full path of the SQLite storage file.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(&self.db_file_name)
    }

    /// Checks field-level constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::EmptyStorageKey);
        }
        if self.db_file_name.trim().is_empty() {
            return Err(ConfigError::EmptyDbFileName);
        }
        if self.storage_quota_pages == Some(0) {
            return Err(ConfigError::ZeroQuota);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, ContactBookConfig, DEFAULT_DB_FILE_NAME, DEFAULT_STORAGE_KEY};

    #[test]
    fn defaults_are_valid() {
        let config = ContactBookConfig::default();
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
        assert!(config.db_path().ends_with(DEFAULT_DB_FILE_NAME));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn blank_storage_key_is_rejected() {
        let config = ContactBookConfig {
            storage_key: "  ".to_string(),
            ..ContactBookConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyStorageKey));
    }

    #[test]
    fn zero_quota_is_rejected() {
        let config = ContactBookConfig {
            storage_quota_pages: Some(0),
            ..ContactBookConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroQuota));
    }
}
