//! Contact domain model.
//!
//! # Responsibility
//! - Define the canonical contact record and its persisted shape.
//! - Provide the create/update contract used by the controller.
//! - Provide the untrusted candidate shape (`ContactDraft`) read back from
//!   storage, and the only path from it to a `Contact`.
//!
//! # Invariants
//! - `id` and `created_at` never change after creation.
//! - `updated_at >= created_at`, and every update strictly increases it.
//! - A `Contact` value always satisfies the validation rules; there is no
//!   public constructor that skips them.

use crate::model::timestamp::{
    format_timestamp, next_update_stamp, parse_timestamp, serialize_timestamp,
    to_storage_precision,
};
use crate::model::validation::{validate_form, validate_record_fields, ValidationError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Schema version stamped on every record written by this build.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Opaque contact identifier. Generated as UUID v4 text.
pub type ContactId = String;

/// One name/email entry with metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    id: ContactId,
    name: String,
    email: String,
    #[serde(serialize_with = "serialize_timestamp")]
    created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_timestamp")]
    updated_at: DateTime<Utc>,
    schema_version: u32,
}

impl Contact {
    /// Creates a new contact with a generated id.
    ///
    /// Name and email are stored trimmed. `created_at == updated_at == now`.
    ///
    /// # Errors
    /// Returns every violated form rule when name/email are invalid.
    pub fn create(
        name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<Self, Vec<ValidationError>> {
        let errors = validate_form(Some(name), Some(email));
        if !errors.is_empty() {
            return Err(errors);
        }

        let stamp = to_storage_precision(now);
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            created_at: stamp,
            updated_at: stamp,
            schema_version: CURRENT_SCHEMA_VERSION,
        })
    }

    /// Replaces name and email and refreshes `updated_at`.
    ///
    /// # Errors
    /// Returns every violated form rule; the record is left untouched.
    pub fn update(
        &mut self,
        name: &str,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<(), Vec<ValidationError>> {
        let errors = validate_form(Some(name), Some(email));
        if !errors.is_empty() {
            return Err(errors);
        }

        self.name = name.trim().to_string();
        self.email = email.trim().to_string();
        self.updated_at = next_update_stamp(self.updated_at, now);
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn schema_version(&self) -> u32 {
        self.schema_version
    }

    /// Returns the record as an untrusted draft, e.g. to feed it back
    /// through migration.
    pub fn to_draft(&self) -> ContactDraft {
        ContactDraft {
            id: Some(self.id.clone()),
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            created_at: Some(format_timestamp(&self.created_at)),
            updated_at: Some(format_timestamp(&self.updated_at)),
        }
    }
}

/// Candidate record of unknown quality, as recovered from storage.
///
/// Every field is optional and timestamps are still raw text. Non-string
/// values found in storage are represented as `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ContactDraft {
    /// Runs the full stored-record rule set.
    pub fn validate(&self) -> Vec<ValidationError> {
        validate_record_fields(
            self.id.as_deref(),
            self.name.as_deref(),
            self.email.as_deref(),
            self.created_at.as_deref(),
            self.updated_at.as_deref(),
        )
    }

    /// Converts a validated draft into a current-version `Contact`.
    ///
    /// `id`, `name` and `email` are kept exactly as stored. Timestamps are
    /// normalized to UTC at millisecond precision, the only form `Contact`
    /// persists, so a value written by this build round-trips unchanged.
    /// Absent timestamps take `now`; an absent `updated_at` takes the
    /// (possibly defaulted) `created_at` instead.
    ///
    /// # Errors
    /// Returns every violated rule when the draft is not a valid record.
    pub fn into_contact(self, now: DateTime<Utc>) -> Result<Contact, Vec<ValidationError>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let created_at = self
            .created_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(|| to_storage_precision(now));
        let updated_at = self
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or(created_at);

        Ok(Contact {
            id: self.id.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            created_at,
            updated_at,
            schema_version: CURRENT_SCHEMA_VERSION,
        })
    }
}
