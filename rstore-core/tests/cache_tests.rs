//! Local cache operations and their properties.
//!
//! Covers the key-based upsert and removal primitives, the pure lookups, and
//! copy-on-write snapshots.

mod common;

use common::{Item, ids, item, mock_store};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstore_model::EntityKey;
use std::collections::HashMap;

// ── replace_or_add / remove ──────────────────────────────────────

#[test]
fn replace_or_add_appends_new_keys_in_order() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(3, "c"));
    store.replace_or_add(item(1, "a"));
    store.replace_or_add(item(2, "b"));
    assert_eq!(ids(&store), vec![3, 1, 2]);
}

#[test]
fn replace_or_add_replaces_whole_entity_in_place() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(1, "a"));
    store.replace_or_add(item(2, "b"));
    store.replace_or_add(item(3, "c"));

    store.replace_or_add(item(2, "B"));

    assert_eq!(
        store.snapshot().as_slice(),
        &[item(1, "a"), item(2, "B"), item(3, "c")]
    );
}

#[test]
fn remove_drops_by_key_regardless_of_fields() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(1, "a"));
    store.replace_or_add(item(2, "b"));

    store.remove(&item(1, "something else"));

    assert_eq!(ids(&store), vec![2]);
}

#[test]
fn remove_missing_key_is_noop() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(1, "a"));
    store.remove(&item(5, "e"));
    assert_eq!(ids(&store), vec![1]);
}

// ── Lookups ──────────────────────────────────────────────────────

#[test]
fn get_cached_finds_by_key() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(1, "a"));
    store.replace_or_add(item(2, "b"));

    assert_eq!(store.get_cached(&EntityKey::Int(2)), Some(item(2, "b")));
    assert_eq!(store.get_cached(&EntityKey::Int(3)), None);
    assert_eq!(store.get_cached(&EntityKey::from("2")), None);
}

#[test]
fn find_cached_returns_first_match() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(1, "apple"));
    store.replace_or_add(item(2, "avocado"));
    store.replace_or_add(item(3, "banana"));

    assert_eq!(
        store.find_cached(|i| i.text.starts_with('a')),
        Some(item(1, "apple"))
    );
    assert_eq!(store.find_cached(|i| i.text.starts_with('z')), None);
}

#[test]
fn clear_cached_empties() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(1, "a"));
    store.clear_cached();
    assert!(store.is_empty());
}

// ── Selection ────────────────────────────────────────────────────

#[test]
fn select_does_not_touch_cache() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(1, "a"));

    store.select(Some(item(9, "not cached")));
    assert_eq!(store.selection(), Some(item(9, "not cached")));
    assert_eq!(ids(&store), vec![1]);

    store.select(None);
    assert!(store.selection().is_none());
    assert_eq!(ids(&store), vec![1]);
}

// ── Snapshots ────────────────────────────────────────────────────

#[test]
fn old_snapshots_are_not_mutated() {
    let (store, _mock) = mock_store();
    store.replace_or_add(item(1, "a"));
    let before = store.snapshot();

    store.replace_or_add(item(1, "a2"));
    store.replace_or_add(item(2, "b"));
    store.remove(&item(1, "a2"));
    store.clear_cached();

    assert_eq!(before.as_slice(), &[item(1, "a")]);
    assert!(store.is_empty());
}

// ── Properties ───────────────────────────────────────────────────

fn op_strategy() -> impl Strategy<Value = Item> {
    (0i64..8, "[a-z]{1,6}").prop_map(|(id, text)| Item { id, text })
}

proptest! {
    /// After any sequence of upserts the cache holds one entry per key seen,
    /// in first-seen order, each carrying the last value applied for it.
    #[test]
    fn upserts_keep_one_entry_per_key(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let (store, _mock) = mock_store();
        let mut last: HashMap<i64, Item> = HashMap::new();
        let mut order: Vec<i64> = Vec::new();

        for op in &ops {
            store.replace_or_add(op.clone());
            if !order.contains(&op.id) {
                order.push(op.id);
            }
            last.insert(op.id, op.clone());
        }

        let expected: Vec<Item> = order.iter().map(|id| last[id].clone()).collect();
        let snapshot = store.snapshot();
        prop_assert_eq!(snapshot.as_slice(), expected.as_slice());
    }

    /// Removing any cached value makes its key unresolvable.
    #[test]
    fn remove_then_lookup_is_none(
        ops in prop::collection::vec(op_strategy(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let (store, _mock) = mock_store();
        for op in &ops {
            store.replace_or_add(op.clone());
        }
        let victim = pick.get(&ops).clone();

        store.remove(&victim);

        prop_assert_eq!(store.get_cached(&EntityKey::Int(victim.id)), None);
        prop_assert_eq!(store.len(), ops.iter().map(|o| o.id).collect::<std::collections::HashSet<_>>().len() - 1);
    }
}
