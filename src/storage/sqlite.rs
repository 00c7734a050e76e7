//! Durable slot backed by the `key_value_store` SQLite table.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, OptionalExtension};

use super::KeyValueSlot;
use crate::database::Database;
use crate::types::errors::StorageError;

/// Key-value slot persisted in a SQLite file.
///
/// The connection sits behind a mutex so the slot is `Sync` and can be shared
/// through an `Arc` like any other backend.
pub struct SqliteSlot {
    db: Mutex<Database>,
}

impl SqliteSlot {
    /// Opens (or creates) the slot database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let db = Database::open(path).map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self::from_database(db))
    }

    /// Opens a throwaway in-memory slot database.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let db = Database::open_in_memory().map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self::from_database(db))
    }

    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }
}

impl KeyValueSlot for SqliteSlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        db.connection()
            .query_row(
                "SELECT value FROM key_value_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .map_err(|e| StorageError::ReadFailed(e.to_string()))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        db.connection()
            .execute(
                "INSERT INTO key_value_store (key, value, updated_at) VALUES (?1, ?2, ?3) \
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, chrono::Utc::now().timestamp()],
            )
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        db.connection()
            .execute("DELETE FROM key_value_store WHERE key = ?1", params![key])
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}
