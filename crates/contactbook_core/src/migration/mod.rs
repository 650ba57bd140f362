//! Schema migration for records read back from storage.
//!
//! # Responsibility
//! - Recognize the schema version of an untrusted stored value.
//! - Upgrade older shapes into a current-version `ContactDraft`.
//!
//! # Invariants
//! - The raw input is never mutated; migration works on borrowed JSON.
//! - Migration never fails. Drafts still go through full validation
//!   before they become contacts.
//! - New schema versions add a `SchemaVersion` variant and a branch in
//!   `migrate`; existing branches stay untouched.

use crate::model::contact::{ContactDraft, CURRENT_SCHEMA_VERSION};
use crate::model::timestamp::{format_timestamp, parse_timestamp};
use chrono::{DateTime, Utc};
use log::warn;
use serde_json::{Map, Value};

const SCHEMA_VERSION_FIELD: &str = "schemaVersion";

/// Schema version tag found on a stored record.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaVersion {
    /// No `schemaVersion` field; written before versioning existed.
    Unversioned,
    /// Current layout.
    V1,
    /// Any other value, kept verbatim for diagnostics.
    Unknown(Value),
}

impl SchemaVersion {
    /// Reads the version tag of a stored value.
    pub fn detect(raw: &Value) -> Self {
        match raw.get(SCHEMA_VERSION_FIELD) {
            None | Some(Value::Null) => Self::Unversioned,
            Some(value) if value.as_u64() == Some(u64::from(CURRENT_SCHEMA_VERSION)) => {
                Self::V1
            }
            Some(other) => Self::Unknown(other.clone()),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

/// Result of migrating one stored value.
#[derive(Debug, Clone, PartialEq)]
pub struct MigratedContact {
    /// Version tag the value was stored with.
    pub source_version: SchemaVersion,
    /// Current-shape candidate, not yet validated.
    pub draft: ContactDraft,
}

/// Upgrades one stored value to the current record shape.
///
/// - `Unversioned` and `V1`: missing timestamps are filled. `createdAt`
///   takes the earlier of `now` and a readable `updatedAt`; `updatedAt`
///   takes `createdAt`.
/// - `Unknown`: a best-effort draft is built from whatever fields exist and
///   a warning is logged.
/// - Non-object values produce an empty draft.
pub fn migrate(raw: &Value, now: DateTime<Utc>) -> MigratedContact {
    let source_version = SchemaVersion::detect(raw);
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let draft = match &source_version {
        SchemaVersion::Unversioned | SchemaVersion::V1 => {
            fill_timestamps(read_fields(fields), now)
        }
        SchemaVersion::Unknown(version) => {
            warn!(
                "event=contact_migrate module=migration status=warn reason=unknown_schema_version version={}",
                version
            );
            fill_timestamps(read_fields(fields), now)
        }
    };

    MigratedContact {
        source_version,
        draft,
    }
}

fn read_fields(fields: &Map<String, Value>) -> ContactDraft {
    ContactDraft {
        id: string_field(fields, "id"),
        name: string_field(fields, "name"),
        email: string_field(fields, "email"),
        created_at: string_field(fields, "createdAt"),
        updated_at: string_field(fields, "updatedAt"),
    }
}

fn fill_timestamps(mut draft: ContactDraft, now: DateTime<Utc>) -> ContactDraft {
    if draft.created_at.is_none() {
        let created = draft
            .updated_at
            .as_deref()
            .and_then(parse_timestamp)
            .map_or(now, |updated| updated.min(now));
        draft.created_at = Some(format_timestamp(&created));
    }
    if draft.updated_at.is_none() {
        draft.updated_at = draft.created_at.clone();
    }
    draft
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(Value::as_str)
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::{migrate, SchemaVersion};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn detect_distinguishes_absent_current_and_unknown_versions() {
        assert_eq!(SchemaVersion::detect(&json!({})), SchemaVersion::Unversioned);
        assert_eq!(
            SchemaVersion::detect(&json!({ "schemaVersion": 1 })),
            SchemaVersion::V1
        );
        assert_eq!(
            SchemaVersion::detect(&json!({ "schemaVersion": "1" })),
            SchemaVersion::Unknown(json!("1"))
        );
        assert!(!SchemaVersion::detect(&json!({ "schemaVersion": 7 })).is_known());
    }

    #[test]
    fn unversioned_record_gets_timestamps_from_now() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let raw = json!({ "id": "c-1", "name": "Ada", "email": "ada@example.com" });

        let migrated = migrate(&raw, now);
        assert_eq!(migrated.source_version, SchemaVersion::Unversioned);
        assert_eq!(
            migrated.draft.created_at.as_deref(),
            Some("2026-10-19T12:00:00.000Z")
        );
        assert_eq!(migrated.draft.updated_at, migrated.draft.created_at);
        assert_eq!(raw, json!({ "id": "c-1", "name": "Ada", "email": "ada@example.com" }));
    }

    #[test]
    fn missing_created_at_never_lands_after_updated_at() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();

        let past = migrate(&json!({ "updatedAt": "2024-05-01T10:00:00Z" }), now);
        assert_eq!(
            past.draft.created_at.as_deref(),
            Some("2024-05-01T10:00:00.000Z")
        );

        let future = migrate(&json!({ "updatedAt": "2030-01-01T00:00:00Z" }), now);
        assert_eq!(
            future.draft.created_at.as_deref(),
            Some("2026-10-19T12:00:00.000Z")
        );

        let garbled = migrate(&json!({ "updatedAt": "soon" }), now);
        assert_eq!(
            garbled.draft.created_at.as_deref(),
            Some("2026-10-19T12:00:00.000Z")
        );
    }

    #[test]
    fn non_string_fields_are_treated_as_missing() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let migrated = migrate(&json!({ "id": 42, "name": ["Ada"], "email": null }), now);
        assert_eq!(migrated.draft.id, None);
        assert_eq!(migrated.draft.name, None);
        assert_eq!(migrated.draft.email, None);
    }

    #[test]
    fn non_object_value_yields_empty_draft_that_fails_validation() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap();
        let migrated = migrate(&json!("just a string"), now);
        assert!(!migrated.draft.validate().is_empty());
    }
}
