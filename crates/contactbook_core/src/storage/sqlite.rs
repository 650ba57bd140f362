//! SQLite-backed key/value medium.
//!
//! # Invariants
//! - One row per key in `kv_store`; writes are upserts.
//! - `SQLITE_FULL` (including a configured `max_page_count` being hit) is
//!   surfaced as `StorageError::QuotaExceeded`.

use super::{KeyValueStore, StorageMedium, StorageResult};
use crate::db::{open_db, open_db_in_memory};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) the store file, optionally capping its size.
    pub fn open(path: impl AsRef<Path>, quota_pages: Option<u32>) -> StorageResult<Self> {
        let store = Self::new(open_db(path)?);
        if let Some(pages) = quota_pages {
            store.set_quota_pages(pages)?;
        }
        Ok(store)
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    /// Caps the database at `pages` pages and returns the effective cap.
    ///
    /// SQLite never lowers the cap below the current page count, so the
    /// returned value may be larger than requested.
    pub fn set_quota_pages(&self, pages: u32) -> StorageResult<u32> {
        let effective = self.conn.query_row(
            &format!("PRAGMA max_page_count = {pages};"),
            [],
            |row| row.get::<_, u32>(0),
        )?;
        debug!(
            "event=kv_quota module=storage status=ok requested_pages={pages} effective_pages={effective}"
        );
        Ok(effective)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn medium(&self) -> StorageMedium {
        StorageMedium::Sqlite
    }
}
