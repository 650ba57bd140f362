//! Core domain logic for ContactBook.
//! This crate is the single source of truth for contact invariants; the
//! presentation layer only renders frames and answers confirmation prompts.

pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod migration;
pub mod model;
pub mod pagination;
pub mod repo;
pub mod service;
pub mod storage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, ContactBookConfig};
pub use logging::{default_log_level, init_logging, logging_status};
pub use migration::{migrate, MigratedContact, SchemaVersion};
pub use model::contact::{Contact, ContactDraft, ContactId, CURRENT_SCHEMA_VERSION};
pub use model::validation::{
    validate_email, validate_email_realtime, validate_field, validate_form, validate_name,
    validate_name_realtime, ContactField, ValidationError, ValidationMode,
};
pub use pagination::{paginate, PageRange, PageState, PageView, PAGE_SIZE};
pub use repo::contact_store::{ContactStore, LoadOutcome, LoadReport, SaveError};
pub use service::contact_book::{
    ConfirmPrompt, ContactBook, ContactBookError, DeleteOutcome, FormMode, RenderFrame,
    RenderSink, StatusKind, StatusMessage, SubmitOutcome,
};
pub use storage::{
    probe_store, KeyValueStore, MemoryKeyValueStore, ProbedStore, SqliteKeyValueStore,
    StorageError, StorageMedium, StorageResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
