//! Unit tests for the HistoryManager public API.
//!
//! Exercises recording, listing, removal, clearing and the degraded paths
//! through `HistoryManagerTrait`, using in-memory and SQLite slots plus
//! slots that fail on purpose.

use std::sync::Arc;

use readshelf::managers::history_manager::{
    HistoryManager, HistoryManagerTrait, HISTORY_KEY, MAX_HISTORY_ITEMS,
};
use readshelf::storage::{KeyValueSlot, MemorySlot, SqliteSlot};
use readshelf::types::book::Book;
use readshelf::types::errors::{HistoryError, StorageError};
use readshelf::types::history::{BookId, ViewedBook};
use rstest::rstest;
use tempfile::TempDir;

/// Helper: a manager plus a handle on the slot it writes to.
fn setup() -> (HistoryManager<Arc<MemorySlot>>, Arc<MemorySlot>) {
    let slot = Arc::new(MemorySlot::new());
    (HistoryManager::new(slot.clone()), slot)
}

fn ids(mgr: &HistoryManager<Arc<MemorySlot>>) -> Vec<BookId> {
    mgr.get().into_iter().map(|e| e.id).collect()
}

/// Slot whose writes always fail (quota exceeded, storage disabled).
struct ReadOnlySlot {
    inner: MemorySlot,
}

impl KeyValueSlot for ReadOnlySlot {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::WriteFailed("quota exceeded".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::WriteFailed("storage disabled".to_string()))
    }
}

/// Slot that cannot even be read.
struct BrokenSlot;

impl KeyValueSlot for BrokenSlot {
    fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable("storage disabled".to_string()))
    }
}

#[test]
fn test_empty_history_by_default() {
    let (mgr, _) = setup();
    assert!(mgr.get().is_empty());
    assert!(!mgr.contains(&BookId::Number(1)));
}

/// add(A), add(B), add(A') leaves [A', B] with A's fields refreshed.
#[test]
fn test_readd_moves_to_front_with_new_fields() {
    let (mut mgr, _) = setup();

    mgr.add(ViewedBook::new(1).name("A"));
    mgr.add(ViewedBook::new(2).name("B"));
    let list = mgr.add(ViewedBook::new(1).name("A2"));

    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, BookId::Number(1));
    assert_eq!(list[0].name.as_deref(), Some("A2"));
    assert_eq!(list[1].id, BookId::Number(2));
    assert_eq!(list[1].name.as_deref(), Some("B"));
    assert_eq!(mgr.get(), list, "returned list must equal the persisted one");
}

/// Given [A, B, C], re-adding B yields [B', A, C].
#[test]
fn test_middle_entry_moves_without_reordering_rest() {
    let (mut mgr, _) = setup();
    mgr.add(ViewedBook::new(3).name("C"));
    mgr.add(ViewedBook::new(2).name("B"));
    mgr.add(ViewedBook::new(1).name("A"));

    mgr.add(ViewedBook::new(2).name("B'").views(9));

    assert_eq!(
        ids(&mgr),
        vec![BookId::Number(2), BookId::Number(1), BookId::Number(3)]
    );
    let front = &mgr.get()[0];
    assert_eq!(front.name.as_deref(), Some("B'"));
    assert_eq!(front.views, 9);
}

#[test]
fn test_readd_refreshes_timestamp() {
    let (mut mgr, _) = setup();
    let first = mgr.add(ViewedBook::new(1))[0].timestamp.clone();
    std::thread::sleep(std::time::Duration::from_millis(5));
    let second = mgr.add(ViewedBook::new(1))[0].timestamp.clone();

    let parse = |ts: &str| chrono::DateTime::parse_from_rfc3339(ts).unwrap();
    assert!(parse(&second) > parse(&first));
}

#[test]
fn test_round_trip_copies_fields_and_defaults_views() {
    let (mut mgr, _) = setup();
    mgr.add(
        ViewedBook::new(42)
            .name("Số đỏ")
            .author("Vũ Trọng Phụng")
            .category("Tiểu thuyết, Hài hước")
            .thumbnail_path("covers/42.jpg"),
    );

    let entry = &mgr.get()[0];
    assert_eq!(entry.id, BookId::Number(42));
    assert_eq!(entry.name.as_deref(), Some("Số đỏ"));
    assert_eq!(entry.author.as_deref(), Some("Vũ Trọng Phụng"));
    assert_eq!(entry.category.as_deref(), Some("Tiểu thuyết, Hài hước"));
    assert_eq!(entry.thumbnail_path.as_deref(), Some("covers/42.jpg"));
    assert_eq!(entry.views, 0);
    assert!(chrono::DateTime::parse_from_rfc3339(&entry.timestamp).is_ok());
}

#[test]
fn test_add_from_catalog_book() {
    let (mut mgr, _) = setup();
    let book = Book {
        id: 5,
        name: Some("Dế Mèn phiêu lưu ký".to_string()),
        author: Some("Tô Hoài".to_string()),
        category: None,
        thumbnail_path: Some("NULL".to_string()),
        book_path: Some("/books/5.pdf".to_string()),
        views: Some(120),
        updated_at: None,
    };

    mgr.add(ViewedBook::from(&book));

    let entry = mgr.find(&BookId::Number(5)).expect("entry recorded");
    assert_eq!(entry.views, 120);
    assert_eq!(entry.thumbnail_path.as_deref(), Some("NULL"));
}

#[test]
fn test_fifty_first_add_evicts_oldest() {
    let (mut mgr, _) = setup();
    for i in 1..=51 {
        mgr.add(ViewedBook::new(i));
    }

    let list = mgr.get();
    assert_eq!(list.len(), MAX_HISTORY_ITEMS);
    assert_eq!(list[0].id, BookId::Number(51));
    assert_eq!(list[49].id, BookId::Number(2));
    assert!(!mgr.contains(&BookId::Number(1)));
}

#[test]
fn test_custom_capacity() {
    let slot = Arc::new(MemorySlot::new());
    let mut mgr = HistoryManager::with_capacity(slot, 3);
    for i in 1..=5 {
        mgr.add(ViewedBook::new(i));
    }
    let list = mgr.get();
    assert_eq!(list.len(), 3);
    assert_eq!(list[2].id, BookId::Number(3));
}

#[test]
fn test_capacity_above_bound_is_clamped() {
    let mut mgr = HistoryManager::with_capacity(MemorySlot::new(), 500);
    for i in 0..200 {
        mgr.add(ViewedBook::new(i));
    }
    assert_eq!(mgr.capacity(), MAX_HISTORY_ITEMS);
    assert_eq!(mgr.get().len(), MAX_HISTORY_ITEMS);
    assert_eq!(mgr.get()[0].id, BookId::Number(199));
}

#[test]
fn test_lowering_capacity_trims_stored_list() {
    let (mut mgr, slot) = setup();
    for i in 1..=10 {
        mgr.add(ViewedBook::new(i));
    }

    mgr.set_capacity(4);
    let list = mgr.get();
    assert!(list.len() <= mgr.capacity());
    assert_eq!(
        list.iter().map(|e| e.id.clone()).collect::<Vec<_>>(),
        (7..=10).rev().map(BookId::Number).collect::<Vec<_>>()
    );

    // A second manager over the same slot sees the trimmed list.
    let other = HistoryManager::new(slot);
    assert_eq!(other.get().len(), 4);
}

#[test]
fn test_raising_capacity_keeps_stored_list() {
    let (mut mgr, _) = setup();
    mgr.set_capacity(2);
    for i in 1..=3 {
        mgr.add(ViewedBook::new(i));
    }
    mgr.set_capacity(10);
    assert_eq!(ids(&mgr), vec![BookId::Number(3), BookId::Number(2)]);
}

#[test]
fn test_remove_present_and_absent() {
    let (mut mgr, _) = setup();
    mgr.add(ViewedBook::new(1));
    mgr.add(ViewedBook::new(2));
    let before = mgr.get();

    let unchanged = mgr.remove(&BookId::Number(99));
    assert_eq!(unchanged, before);

    let after = mgr.remove(&BookId::Number(1));
    assert_eq!(after.len(), before.len() - 1);
    assert!(after.iter().all(|e| e.id != BookId::Number(1)));
    assert!(!mgr.contains(&BookId::Number(1)));
}

#[test]
fn test_ids_compare_strictly() {
    let (mut mgr, _) = setup();
    mgr.add(ViewedBook::new(1));
    mgr.add(ViewedBook::new("1"));

    assert_eq!(mgr.get().len(), 2);
    mgr.remove(&BookId::Text("1".to_string()));
    assert!(mgr.contains(&BookId::Number(1)));
    assert!(!mgr.contains(&BookId::Text("1".to_string())));
}

#[test]
fn test_clear_deletes_slot_entry() {
    let (mut mgr, slot) = setup();
    mgr.add(ViewedBook::new(1));
    mgr.add(ViewedBook::new(2));

    assert!(mgr.clear().is_empty());
    assert!(mgr.get().is_empty());
    assert!(!mgr.contains(&BookId::Number(1)));
    assert_eq!(slot.get(HISTORY_KEY).unwrap(), None);
}

#[test]
fn test_contains_sees_out_of_band_writes() {
    let (mgr, slot) = setup();
    assert!(!mgr.contains(&BookId::Number(8)));

    slot.set(
        HISTORY_KEY,
        r#"[{"id":8,"name":"Written elsewhere","views":1,"timestamp":"2024-01-01T00:00:00.000Z"}]"#,
    )
    .unwrap();

    assert!(mgr.contains(&BookId::Number(8)));
}

#[test]
fn test_persisted_shape_is_flat_camel_case() {
    let (mut mgr, slot) = setup();
    mgr.add(ViewedBook::new(3).name("N").thumbnail_path("t.jpg"));

    let raw = slot.get(HISTORY_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let obj = value[0].as_object().unwrap();

    assert_eq!(obj["id"], 3);
    assert_eq!(obj["name"], "N");
    assert_eq!(obj["thumbnailPath"], "t.jpg");
    assert_eq!(obj["views"], 0);
    assert!(obj["timestamp"].is_string());
    assert!(!obj.contains_key("author"), "absent fields are omitted");
}

#[test]
fn test_lenient_entry_fields() {
    let (mgr, slot) = setup();
    slot.set(HISTORY_KEY, r#"[{"id":"abc","views":null},{"id":4}]"#)
        .unwrap();

    let list = mgr.get();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].id, BookId::Text("abc".to_string()));
    assert_eq!(list[0].views, 0);
    assert_eq!(list[1].timestamp, "");
}

#[rstest]
#[case::plain_text("not json at all")]
#[case::object(r#"{"id":1,"name":"A"}"#)]
#[case::null("null")]
#[case::number("42")]
#[case::list_of_strings(r#"["a","b"]"#)]
#[case::entry_without_id(r#"[{"name":"A"}]"#)]
#[case::truncated(r#"[{"id":1,"name":"A""#)]
fn test_corrupt_slot_reads_as_empty(#[case] raw: &str) {
    let (mut mgr, slot) = setup();
    slot.set(HISTORY_KEY, raw).unwrap();

    assert!(mgr.get().is_empty());
    assert!(!mgr.contains(&BookId::Number(1)));
    assert!(matches!(
        mgr.try_get(),
        Err(HistoryError::MalformedPersistedData(_))
    ));

    // The next view replaces the broken value.
    let list = mgr.add(ViewedBook::new(1).name("A"));
    assert_eq!(list.len(), 1);
    assert!(mgr.try_get().is_ok());
}

#[test]
fn test_write_failures_degrade_silently() {
    let inner = MemorySlot::new();
    inner
        .set(
            HISTORY_KEY,
            r#"[{"id":1,"name":"A","views":0,"timestamp":"2024-01-01T00:00:00.000Z"}]"#,
        )
        .unwrap();
    let mut mgr = HistoryManager::new(ReadOnlySlot { inner });

    assert!(matches!(
        mgr.try_add(ViewedBook::new(2)),
        Err(HistoryError::StorageUnavailable(_))
    ));
    assert!(mgr.add(ViewedBook::new(2)).is_empty());

    // remove falls back to what is still readable
    let remaining = mgr.remove(&BookId::Number(1));
    assert_eq!(remaining.len(), 1);
    assert!(mgr.try_remove(&BookId::Number(1)).is_err());

    assert!(mgr.try_clear().is_err());
    assert!(mgr.clear().is_empty());
    assert!(mgr.contains(&BookId::Number(1)));
}

#[test]
fn test_unreadable_slot_never_panics() {
    let mut mgr = HistoryManager::new(BrokenSlot);

    assert!(matches!(
        mgr.try_get(),
        Err(HistoryError::StorageUnavailable(_))
    ));
    assert!(mgr.get().is_empty());
    assert!(mgr.add(ViewedBook::new(1)).is_empty());
    assert!(mgr.remove(&BookId::Number(1)).is_empty());
    assert!(mgr.clear().is_empty());
    assert!(!mgr.contains(&BookId::Number(1)));
}

#[test]
fn test_history_survives_restart_on_sqlite() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.db");

    {
        let mut mgr = HistoryManager::new(SqliteSlot::open(&path).unwrap());
        mgr.add(ViewedBook::new(1).name("A"));
        mgr.add(ViewedBook::new(2).name("B"));
    }

    let mgr = HistoryManager::new(SqliteSlot::open(&path).unwrap());
    let list = mgr.get();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].name.as_deref(), Some("B"));
    assert!(mgr.contains(&BookId::Number(1)));
}
