//! Startup capability probe and medium fallback.

use super::{
    KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError, StorageMedium,
    StorageResult,
};
use crate::config::ContactBookConfig;
use log::{info, warn};

const PROBE_KEY: &str = "__contactbook_probe__";
const PROBE_VALUE: &str = "probe";

/// Medium selected at startup.
pub struct ProbedStore {
    pub store: Box<dyn KeyValueStore>,
    pub medium: StorageMedium,
    /// Why the primary medium was skipped, when it was.
    pub fallback_reason: Option<String>,
}

/// Selects the storage medium once per process start.
///
/// Opens the SQLite file under the configured data directory and checks
/// that a probe key can be written, read back and removed. Any failure
/// falls back to `MemoryKeyValueStore` with a warning; this never fails.
pub fn probe_store(config: &ContactBookConfig) -> ProbedStore {
    if config.force_memory {
        info!("event=storage_probe module=storage status=ok medium=memory reason=forced");
        return memory_fallback(None);
    }

    match open_primary(config) {
        Ok(store) => {
            info!(
                "event=storage_probe module=storage status=ok medium=sqlite path={}",
                config.db_path().display()
            );
            ProbedStore {
                store: Box::new(store),
                medium: StorageMedium::Sqlite,
                fallback_reason: None,
            }
        }
        Err(err) => {
            warn!(
                "event=storage_probe module=storage status=fallback medium=memory path={} error={err}",
                config.db_path().display()
            );
            memory_fallback(Some(err.to_string()))
        }
    }
}

fn open_primary(config: &ContactBookConfig) -> StorageResult<SqliteKeyValueStore> {
    std::fs::create_dir_all(&config.data_dir).map_err(|err| {
        StorageError::Unavailable(format!(
            "cannot create data directory `{}`: {err}",
            config.data_dir.display()
        ))
    })?;

    let mut store = SqliteKeyValueStore::open(config.db_path(), config.storage_quota_pages)?;
    check_roundtrip(&mut store)?;
    Ok(store)
}

fn check_roundtrip(store: &mut dyn KeyValueStore) -> StorageResult<()> {
    store.set_item(PROBE_KEY, PROBE_VALUE)?;
    let read_back = store.get_item(PROBE_KEY)?;
    store.remove_item(PROBE_KEY)?;
    if read_back.as_deref() != Some(PROBE_VALUE) {
        return Err(StorageError::Unavailable(
            "probe value did not read back".to_string(),
        ));
    }
    Ok(())
}

fn memory_fallback(reason: Option<String>) -> ProbedStore {
    ProbedStore {
        store: Box::new(MemoryKeyValueStore::new()),
        medium: StorageMedium::Memory,
        fallback_reason: reason,
    }
}
