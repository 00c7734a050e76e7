//! History Manager for Readshelf.
//!
//! Keeps the per-device reading history: a most-recent-first list of viewed
//! books, unique by id and capped at [`MAX_HISTORY_ITEMS`], stored as one JSON
//! array in a single [`KeyValueSlot`] entry.
//!
//! Reading history is a convenience. The `try_*` methods report storage and
//! parse failures as [`HistoryError`]; the plain methods used by the UI log
//! those failures and fall back to an empty (or unchanged) list, so a broken
//! slot never stops anyone from reading.

use chrono::{SecondsFormat, Utc};
use tracing::{debug, warn};

use crate::storage::KeyValueSlot;
use crate::types::errors::HistoryError;
use crate::types::history::{BookId, HistoryEntry, ViewedBook};

/// Slot key the history list is stored under.
pub const HISTORY_KEY: &str = "thuvien_reading_history";

/// Default bound on the number of remembered books.
pub const MAX_HISTORY_ITEMS: usize = 50;

/// Trait defining reading-history operations.
pub trait HistoryManagerTrait {
    fn try_add(&mut self, book: ViewedBook) -> Result<Vec<HistoryEntry>, HistoryError>;
    fn try_get(&self) -> Result<Vec<HistoryEntry>, HistoryError>;
    fn try_remove(&mut self, id: &BookId) -> Result<Vec<HistoryEntry>, HistoryError>;
    fn try_clear(&mut self) -> Result<Vec<HistoryEntry>, HistoryError>;

    fn add(&mut self, book: ViewedBook) -> Vec<HistoryEntry>;
    fn get(&self) -> Vec<HistoryEntry>;
    fn remove(&mut self, id: &BookId) -> Vec<HistoryEntry>;
    fn clear(&mut self) -> Vec<HistoryEntry>;
    fn contains(&self, id: &BookId) -> bool;
}

/// Reading history persisted in a key-value slot.
pub struct HistoryManager<S: KeyValueSlot> {
    slot: S,
    capacity: usize,
}

impl<S: KeyValueSlot> HistoryManager<S> {
    /// Creates a manager over `slot` with the default capacity.
    pub fn new(slot: S) -> Self {
        Self::with_capacity(slot, MAX_HISTORY_ITEMS)
    }

    /// Creates a manager keeping at most `capacity` entries, clamped into
    /// `1..=MAX_HISTORY_ITEMS`.
    pub fn with_capacity(slot: S, capacity: usize) -> Self {
        Self {
            slot,
            capacity: capacity.clamp(1, MAX_HISTORY_ITEMS),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Changes the bound (clamped like `with_capacity`). A stored list longer
    /// than the new bound is trimmed and persisted right away.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.clamp(1, MAX_HISTORY_ITEMS);

        let mut entries = match self.load() {
            Ok(entries) if entries.len() > self.capacity => entries,
            Ok(_) => return,
            Err(e) => {
                warn!(error = %e, "cannot trim reading history to new capacity");
                return;
            }
        };
        entries.truncate(self.capacity);
        if let Err(e) = self.persist(&entries) {
            warn!(error = %e, "failed to persist trimmed reading history");
        }
    }

    /// Returns the stored entry for `id`, if any.
    pub fn find(&self, id: &BookId) -> Option<HistoryEntry> {
        self.get().into_iter().find(|entry| &entry.id == id)
    }

    /// Current instant in the `toISOString` shape: UTC, milliseconds, `Z`.
    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    fn entry_from(book: ViewedBook) -> HistoryEntry {
        HistoryEntry {
            id: book.id,
            name: book.name,
            author: book.author,
            category: book.category,
            thumbnail_path: book.thumbnail_path,
            views: book.views.unwrap_or(0),
            timestamp: Self::now(),
        }
    }

    /// Reads and decodes the slot. An absent key is an empty history.
    fn load(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        let raw = match self.slot.get(HISTORY_KEY)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        serde_json::from_str(&raw).map_err(|e| HistoryError::MalformedPersistedData(e.to_string()))
    }

    /// Like `load`, but any failure reads as an empty history so a write can
    /// still replace a broken value.
    fn load_lenient(&self) -> Vec<HistoryEntry> {
        self.load().unwrap_or_else(|e| {
            warn!(error = %e, "discarding unreadable reading history");
            Vec::new()
        })
    }

    fn persist(&self, entries: &[HistoryEntry]) -> Result<(), HistoryError> {
        let json = serde_json::to_string(entries)
            .map_err(|e| HistoryError::StorageUnavailable(format!("serialization failed: {}", e)))?;
        self.slot.set(HISTORY_KEY, &json)?;
        Ok(())
    }
}

impl<S: KeyValueSlot> HistoryManagerTrait for HistoryManager<S> {
    /// Records a view: drops any entry with the same id, puts the new entry
    /// first, trims to capacity and persists. Returns the stored list.
    fn try_add(&mut self, book: ViewedBook) -> Result<Vec<HistoryEntry>, HistoryError> {
        let entry = Self::entry_from(book);
        let mut entries = self.load_lenient();
        entries.retain(|existing| existing.id != entry.id);
        entries.insert(0, entry);
        entries.truncate(self.capacity);
        self.persist(&entries)?;
        debug!(id = %entries[0].id, len = entries.len(), "recorded book view");
        Ok(entries)
    }

    /// Returns the persisted list as stored, most recent first.
    fn try_get(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.load()
    }

    /// Drops every entry with `id` and persists the result, even when nothing matched.
    fn try_remove(&mut self, id: &BookId) -> Result<Vec<HistoryEntry>, HistoryError> {
        let mut entries = self.load()?;
        entries.retain(|entry| &entry.id != id);
        self.persist(&entries)?;
        Ok(entries)
    }

    /// Deletes the slot entry entirely.
    fn try_clear(&mut self) -> Result<Vec<HistoryEntry>, HistoryError> {
        self.slot.remove(HISTORY_KEY)?;
        Ok(Vec::new())
    }

    fn add(&mut self, book: ViewedBook) -> Vec<HistoryEntry> {
        self.try_add(book).unwrap_or_else(|e| {
            warn!(error = %e, "failed to add book to reading history");
            Vec::new()
        })
    }

    fn get(&self) -> Vec<HistoryEntry> {
        self.try_get().unwrap_or_else(|e| {
            warn!(error = %e, "failed to read reading history");
            Vec::new()
        })
    }

    /// On failure returns whatever history is still readable.
    fn remove(&mut self, id: &BookId) -> Vec<HistoryEntry> {
        match self.try_remove(id) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, %id, "failed to remove book from reading history");
                self.get()
            }
        }
    }

    fn clear(&mut self) -> Vec<HistoryEntry> {
        self.try_clear().unwrap_or_else(|e| {
            warn!(error = %e, "failed to clear reading history");
            Vec::new()
        })
    }

    /// Checks the persisted list at call time; nothing is cached.
    fn contains(&self, id: &BookId) -> bool {
        self.get().iter().any(|entry| &entry.id == id)
    }
}
