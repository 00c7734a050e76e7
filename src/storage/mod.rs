//! Persistent key-value slots.
//!
//! A slot is a named text cell that survives restarts: the reading history
//! lives in exactly one of them. Backends take `&self` so a single slot can be
//! shared (via `Arc`) between the history manager and anything else that
//! needs to inspect or overwrite it.

use std::sync::Arc;

use crate::types::errors::StorageError;

pub mod memory;
pub mod sqlite;

pub use memory::MemorySlot;
pub use sqlite::SqliteSlot;

/// Text storage addressed by string keys.
pub trait KeyValueSlot {
    /// Returns the stored value, or `None` when the key was never set or was removed.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Deletes the key. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueSlot + ?Sized> KeyValueSlot for Arc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueSlot + ?Sized> KeyValueSlot for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
