//! Property-based tests for History Manager operations.
//!
//! Random sequences of adds and removes over a small id space (so repeats are
//! common) must keep the list bounded, unique by id and ordered by recency.

use std::collections::HashSet;

use proptest::prelude::*;
use readshelf::managers::history_manager::{HistoryManager, HistoryManagerTrait};
use readshelf::storage::MemorySlot;
use readshelf::types::history::{BookId, ViewedBook};

#[derive(Debug, Clone)]
enum Op {
    Add(i64, String),
    Remove(i64),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0i64..80, "[a-zA-Z ]{1,12}").prop_map(|(id, name)| Op::Add(id, name)),
        1 => (0i64..80).prop_map(Op::Remove),
    ]
}

/// Reference model: most-recent-first ids, capped at `cap`.
fn model_apply(model: &mut Vec<i64>, op: &Op, cap: usize) {
    match op {
        Op::Add(id, _) => {
            model.retain(|x| x != id);
            model.insert(0, *id);
            model.truncate(cap);
        }
        Op::Remove(id) => model.retain(|x| x != id),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn history_matches_recency_model(ops in prop::collection::vec(arb_op(), 1..120)) {
        let mut mgr = HistoryManager::new(MemorySlot::new());
        let mut model: Vec<i64> = Vec::new();

        for op in &ops {
            match op {
                Op::Add(id, name) => {
                    mgr.add(ViewedBook::new(*id).name(name.clone()));
                }
                Op::Remove(id) => {
                    mgr.remove(&BookId::Number(*id));
                }
            }
            model_apply(&mut model, op, mgr.capacity());

            let list = mgr.get();
            prop_assert!(list.len() <= mgr.capacity());

            let unique: HashSet<_> = list.iter().map(|e| e.id.clone()).collect();
            prop_assert_eq!(unique.len(), list.len(), "duplicate ids in history");

            let actual: Vec<BookId> = list.iter().map(|e| e.id.clone()).collect();
            let expected: Vec<BookId> = model.iter().map(|id| BookId::Number(*id)).collect();
            prop_assert_eq!(actual, expected);
        }
    }

    #[test]
    fn front_entry_carries_latest_fields(
        id in 0i64..10,
        first in "[a-z]{1,10}",
        second in "[A-Z]{1,10}",
        views in proptest::option::of(0u64..10_000),
    ) {
        let mut mgr = HistoryManager::new(MemorySlot::new());
        mgr.add(ViewedBook::new(id).name(first));

        let mut again = ViewedBook::new(id).name(second.clone());
        again.views = views;
        mgr.add(again);

        let list = mgr.get();
        prop_assert_eq!(list.len(), 1);
        prop_assert_eq!(list[0].name.as_deref(), Some(second.as_str()));
        prop_assert_eq!(list[0].views, views.unwrap_or(0));
    }

    #[test]
    fn removing_unknown_id_changes_nothing(
        present in prop::collection::hash_set(0i64..50, 0..20),
        missing in 50i64..100,
    ) {
        let mut mgr = HistoryManager::new(MemorySlot::new());
        for id in &present {
            mgr.add(ViewedBook::new(*id));
        }
        let before = mgr.get();
        prop_assert_eq!(mgr.remove(&BookId::Number(missing)), before.clone());
        prop_assert_eq!(mgr.get(), before);
    }
}

#[test]
fn thousand_distinct_adds_stay_bounded() {
    let mut mgr = HistoryManager::new(MemorySlot::new());
    for id in 0..1000 {
        let list = mgr.add(ViewedBook::new(id));
        assert!(list.len() <= mgr.capacity());
    }
    let list = mgr.get();
    assert_eq!(list.len(), mgr.capacity());
    assert_eq!(list[0].id, BookId::Number(999));
    assert_eq!(list.last().unwrap().id, BookId::Number(950));
}
