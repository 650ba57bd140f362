//! Contact collection persistence over a single storage key.
//!
//! # Responsibility
//! - `load`: read the JSON snapshot, migrate and validate each element.
//! - `save`: write the persisted projection of the collection.
//!
//! # Invariants
//! - `load` never returns an error. Missing, unreadable or malformed
//!   snapshots degrade to an empty collection; a bad element only drops
//!   itself.
//! - Only persisted fields are written; view state never reaches storage.
//! - Quota exhaustion is reported separately from every other write failure.

use crate::clock::Clock;
use crate::migration::migrate;
use crate::model::contact::Contact;
use crate::storage::{KeyValueStore, StorageError, StorageMedium};
use log::{error, info, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Collection-level result of a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Snapshot parsed; individual records may still have been dropped.
    Loaded,
    /// Nothing stored under the key yet.
    Missing,
    /// Stored text is not JSON.
    InvalidJson,
    /// Stored JSON is not an array.
    NotAnArray,
    /// The medium failed to read.
    ReadFailed,
}

/// Loaded collection plus diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub contacts: Vec<Contact>,
    pub outcome: LoadOutcome,
    /// Elements dropped for failing validation or repeating an id.
    pub dropped: usize,
}

impl LoadReport {
    fn empty(outcome: LoadOutcome) -> Self {
        Self {
            contacts: Vec::new(),
            outcome,
            dropped: 0,
        }
    }
}

/// Write failure, split by what the user can do about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// The medium is full; deleting entries frees space.
    QuotaExceeded,
    /// Any other failure; retrying later may succeed.
    WriteFailed(String),
}

impl SaveError {
    /// Message suitable for showing to the user.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::QuotaExceeded => "Storage is full. Delete some contacts to free space.",
            Self::WriteFailed(_) => "Changes may not persist. Try again.",
        }
    }
}

impl Display for SaveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded => write!(f, "storage quota exceeded"),
            Self::WriteFailed(reason) => write!(f, "failed to save contacts: {reason}"),
        }
    }
}

impl Error for SaveError {}

impl From<StorageError> for SaveError {
    fn from(value: StorageError) -> Self {
        match value {
            StorageError::QuotaExceeded => Self::QuotaExceeded,
            other => Self::WriteFailed(other.to_string()),
        }
    }
}

/// Reads and writes the contact collection under one key.
pub struct ContactStore<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> ContactStore<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn medium(&self) -> StorageMedium {
        self.store.medium()
    }

    /// Underlying medium, e.g. to inspect raw stored text.
    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Loads the collection; see [`ContactStore::load_with_report`].
    pub fn load(&self, clock: &dyn Clock) -> Vec<Contact> {
        self.load_with_report(clock).contacts
    }

    /// Loads the collection and reports what was skipped.
    ///
    /// Each element is migrated, then validated. Failing elements and
    /// repeated ids are dropped with a warning.
    pub fn load_with_report(&self, clock: &dyn Clock) -> LoadReport {
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!(
                    "event=contacts_load module=repo status=ok reason=missing_key key={}",
                    self.key
                );
                return LoadReport::empty(LoadOutcome::Missing);
            }
            Err(err) => {
                error!(
                    "event=contacts_load module=repo status=error reason=read_failed key={} error={err}",
                    self.key
                );
                return LoadReport::empty(LoadOutcome::ReadFailed);
            }
        };

        let parsed: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=contacts_load module=repo status=warn reason=invalid_json key={} error={err}",
                    self.key
                );
                return LoadReport::empty(LoadOutcome::InvalidJson);
            }
        };

        let Value::Array(elements) = parsed else {
            warn!(
                "event=contacts_load module=repo status=warn reason=not_an_array key={}",
                self.key
            );
            return LoadReport::empty(LoadOutcome::NotAnArray);
        };

        let now = clock.now();
        let mut seen_ids = HashSet::new();
        let mut contacts = Vec::with_capacity(elements.len());
        let mut dropped = 0;

        for (index, element) in elements.iter().enumerate() {
            let migrated = migrate(element, now);
            match migrated.draft.into_contact(now) {
                Ok(contact) => {
                    if !seen_ids.insert(contact.id().to_string()) {
                        warn!(
                            "event=contact_drop module=repo status=warn reason=duplicate_id index={index} id={}",
                            contact.id()
                        );
                        dropped += 1;
                        continue;
                    }
                    contacts.push(contact);
                }
                Err(errors) => {
                    let reasons = errors
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; ");
                    warn!(
                        "event=contact_drop module=repo status=warn reason=invalid_record index={index} errors=\"{reasons}\""
                    );
                    dropped += 1;
                }
            }
        }

        info!(
            "event=contacts_load module=repo status=ok medium={} loaded={} dropped={dropped}",
            self.store.medium(),
            contacts.len()
        );

        LoadReport {
            contacts,
            outcome: LoadOutcome::Loaded,
            dropped,
        }
    }

    /// Writes the persisted projection of `contacts`.
    ///
    /// # Errors
    /// - `SaveError::QuotaExceeded` when the medium is full.
    /// - `SaveError::WriteFailed` for serialization or any other medium
    ///   failure.
    pub fn save(&mut self, contacts: &[Contact]) -> Result<(), SaveError> {
        let payload = serde_json::to_string(contacts)
            .map_err(|err| SaveError::WriteFailed(err.to_string()))?;

        match self.store.set_item(&self.key, &payload) {
            Ok(()) => {
                info!(
                    "event=contacts_save module=repo status=ok medium={} count={} bytes={}",
                    self.store.medium(),
                    contacts.len(),
                    payload.len()
                );
                Ok(())
            }
            Err(err) => {
                let save_error = SaveError::from(err);
                error!(
                    "event=contacts_save module=repo status=error medium={} count={} error={save_error}",
                    self.store.medium(),
                    contacts.len()
                );
                Err(save_error)
            }
        }
    }
}
