//! Key/value storage media backing contact persistence.
//!
//! # Responsibility
//! - Define the string key/value contract the persistence adapter writes
//!   through (`KeyValueStore`).
//! - Provide a SQLite-backed primary medium and an in-memory fallback.
//! - Pick a working medium once at startup (`probe_store`).
//!
//! # Invariants
//! - Quota exhaustion is always reported as `StorageError::QuotaExceeded`,
//!   whatever the medium, so callers can tell it apart from other failures.
//! - Callers never need to know which medium is active.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod probe;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use probe::{probe_store, ProbedStore};
pub use sqlite::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Which medium backs a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMedium {
    Sqlite,
    Memory,
}

impl Display for StorageMedium {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite => write!(f, "sqlite"),
            Self::Memory => write!(f, "memory"),
        }
    }
}

/// Failure reported by a storage medium.
#[derive(Debug)]
pub enum StorageError {
    /// The write does not fit in the medium's quota.
    QuotaExceeded,
    /// The medium cannot be used at all.
    Unavailable(String),
    /// The SQLite file was written by a newer build.
    UnsupportedLayout {
        file_version: u32,
        latest_supported: u32,
    },
    /// SQLite statement failure other than quota exhaustion.
    Sqlite(rusqlite::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded => write!(f, "storage quota exceeded"),
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::UnsupportedLayout {
                file_version,
                latest_supported,
            } => write!(
                f,
                "storage file version {file_version} is newer than supported {latest_supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::QuotaExceeded | Self::Unavailable(_) | Self::UnsupportedLayout { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        match &value {
            rusqlite::Error::SqliteFailure(inner, _)
                if inner.code == rusqlite::ErrorCode::DiskFull =>
            {
                Self::QuotaExceeded
            }
            _ => Self::Sqlite(value),
        }
    }
}

/// String key/value store with `localStorage`-like semantics.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key is absent.
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;
    /// Inserts or replaces the value under `key`.
    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Removes `key`; removing an absent key is not an error.
    fn remove_item(&mut self, key: &str) -> StorageResult<()>;
    fn medium(&self) -> StorageMedium;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn medium(&self) -> StorageMedium {
        (**self).medium()
    }
}
