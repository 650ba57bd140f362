//! SQLite bootstrap for the key/value storage medium.
//!
//! # Responsibility
//! - Open the file (or in-memory database) behind `SqliteKeyValueStore`.
//! - Bring its `kv_store` table up to the latest layout.
//!
//! # Invariants
//! - The file layout version lives in `PRAGMA user_version`.
//! - No key/value reads or writes happen before migrations succeed.
//! - Every failure surfaces as `StorageError`, so a full disk during
//!   bootstrap is still reported as `QuotaExceeded`.

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
