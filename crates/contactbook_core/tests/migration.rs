mod support;

use chrono::{TimeZone, Utc};
use contactbook_core::{
    migrate, Contact, ContactStore, LoadOutcome, ManualClock, SchemaVersion, ValidationError,
};
use serde_json::json;
use support::{memory_with_raw, t0, STORAGE_KEY};

#[test]
fn migrating_current_record_is_identity_on_persisted_fields() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let mut contact = Contact::create("Ada Lovelace", "ada@example.com", now).unwrap();
    contact
        .update("Ada King", "ada.king@example.com", now + chrono::Duration::days(3))
        .unwrap();

    let stored = serde_json::to_value(&contact).unwrap();
    let later = now + chrono::Duration::days(30);
    let migrated = migrate(&stored, later);

    assert_eq!(migrated.source_version, SchemaVersion::V1);
    assert_eq!(migrated.draft, contact.to_draft());
    let restored = migrated.draft.into_contact(later).unwrap();
    assert_eq!(restored, contact);
    assert_eq!(serde_json::to_value(&restored).unwrap(), stored);
}

#[test]
fn legacy_record_keeps_existing_created_at() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let raw = json!({
        "id": "legacy-1",
        "name": "Grace",
        "email": "grace@example.com",
        "createdAt": "2024-05-01T10:00:00.000Z"
    });

    let migrated = migrate(&raw, now);
    assert_eq!(migrated.source_version, SchemaVersion::Unversioned);
    let contact = migrated.draft.into_contact(now).unwrap();
    assert_eq!(contact.created_at(), contact.updated_at());
    assert_eq!(
        contact.created_at(),
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    );
}

#[test]
fn unknown_version_record_still_goes_through_validation() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let raw = json!({
        "id": "future-1",
        "name": "   ",
        "email": "future@example.com",
        "schemaVersion": 3
    });

    let migrated = migrate(&raw, now);
    assert_eq!(migrated.source_version, SchemaVersion::Unknown(json!(3)));
    assert_eq!(
        migrated.draft.into_contact(now).unwrap_err(),
        vec![
            ValidationError::NameRequired,
            ValidationError::WhitespaceOnlyName
        ]
    );
}

#[test]
fn unparseable_timestamps_are_not_replaced() {
    let now = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
    let raw = json!({
        "id": "c-1",
        "name": "Ada",
        "email": "ada@example.com",
        "createdAt": "last tuesday",
        "updatedAt": "2026-01-01T00:00:00Z",
        "schemaVersion": 1
    });

    let errors = migrate(&raw, now).draft.validate();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "invalid createdAt timestamp");
}

#[test]
fn legacy_record_with_only_updated_at_is_recovered() {
    let clock = ManualClock::new(t0());
    let raw = json!([{
        "id": "legacy-1",
        "name": "Grace",
        "email": "grace@example.com",
        "updatedAt": "2024-05-01T10:00:00.000Z"
    }]);
    let store = ContactStore::new(memory_with_raw(&raw.to_string()), STORAGE_KEY);

    let report = store.load_with_report(&clock);
    assert_eq!(report.outcome, LoadOutcome::Loaded);
    assert_eq!(report.dropped, 0);
    let contact = &report.contacts[0];
    let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
    assert_eq!(contact.created_at(), stamp);
    assert_eq!(contact.updated_at(), stamp);
}

#[test]
fn legacy_iso_8601_stamps_without_offset_are_read_as_utc() {
    let clock = ManualClock::new(t0());
    let raw = json!([
        {
            "id": "legacy-1",
            "name": "Grace",
            "email": "grace@example.com",
            "createdAt": "2024-05-01T10:00:00"
        },
        {
            "id": "legacy-2",
            "name": "Alan",
            "email": "alan@example.com",
            "createdAt": "2024-05-01",
            "updatedAt": "2024-05-02"
        }
    ]);
    let store = ContactStore::new(memory_with_raw(&raw.to_string()), STORAGE_KEY);

    let report = store.load_with_report(&clock);
    assert_eq!(report.dropped, 0);
    assert_eq!(report.contacts.len(), 2);
    assert_eq!(
        report.contacts[0].created_at(),
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    );
    assert_eq!(
        report.contacts[1].created_at(),
        Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(
        report.contacts[1].updated_at(),
        Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap()
    );
}
