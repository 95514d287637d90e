#![cfg(feature = "dictionary")]
//! Property-based tests for AvlTreeMap.
//!
//! These tests verify that AvlTreeMap keeps its ordering, height, balance and
//! count invariants under arbitrary insertion sequences, using proptest.

use avlmap::dictionary::{AvlTreeMap, NodeRef};
use proptest::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Helpers
// =============================================================================

/// Height computed by walking the subtree, with an empty subtree at -1.
fn recomputed_height<K, V>(node: Option<NodeRef<'_, K, V>>) -> isize {
    node.map_or(-1, |node| {
        1 + recomputed_height(node.left()).max(recomputed_height(node.right()))
    })
}

/// Visits every node, pre-order.
fn for_each_node<'a, K, V>(
    node: Option<NodeRef<'a, K, V>>,
    visit: &mut impl FnMut(NodeRef<'a, K, V>),
) {
    if let Some(node) = node {
        visit(node);
        for_each_node(node.left(), visit);
        for_each_node(node.right(), visit);
    }
}

/// Upper bound on the height of an AVL tree with `length` entries.
fn height_bound(length: usize) -> f64 {
    1.44 * ((length + 2) as f64).log2()
}

// =============================================================================
// Structural Invariant Laws
// =============================================================================

proptest! {
    /// Law: an in-order traversal yields strictly ascending keys.
    #[test]
    fn prop_iteration_strictly_ascending(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..200)
    ) {
        let map: AvlTreeMap<i32, i32> = entries.into_iter().collect();
        let keys: Vec<i32> = map.keys().copied().collect();
        prop_assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));
    }

    /// Law: every node's children differ in height by at most one.
    #[test]
    fn prop_every_node_balanced(
        keys in prop::collection::vec(any::<i16>(), 0..300)
    ) {
        let map: AvlTreeMap<i16, ()> = keys.into_iter().map(|key| (key, ())).collect();
        let mut worst: isize = 0;
        for_each_node(map.root(), &mut |node| worst = worst.max(node.balance_factor().abs()));
        prop_assert!(worst <= 1);
    }

    /// Law: every cached height equals the recomputed height.
    #[test]
    fn prop_cached_heights_correct(
        keys in prop::collection::vec(0u16..512, 0..300)
    ) {
        let map: AvlTreeMap<u16, u16> = keys.into_iter().map(|key| (key, key)).collect();
        let mut mismatches = 0;
        for_each_node(map.root(), &mut |node| {
            if node.height() != recomputed_height(Some(node)) {
                mismatches += 1;
            }
        });
        prop_assert_eq!(mismatches, 0);
        prop_assert_eq!(map.height(), recomputed_height(map.root()));
    }

    /// Law: the built-in audit agrees with the tree being well formed.
    #[test]
    fn prop_check_invariants_passes(
        entries in prop::collection::vec((any::<u8>(), any::<i64>()), 0..300)
    ) {
        let map: AvlTreeMap<u8, i64> = entries.into_iter().collect();
        prop_assert_eq!(map.check_invariants(), Ok(()));
    }
}

// =============================================================================
// Insert-or-Update Laws
// =============================================================================

proptest! {
    /// Law: after inserting N distinct keys, len == N.
    #[test]
    fn prop_length_counts_distinct_keys(
        keys in prop::collection::hash_set(any::<i32>(), 0..200)
    ) {
        let expected = keys.len();
        let map: AvlTreeMap<i32, ()> = keys.into_iter().map(|key| (key, ())).collect();
        prop_assert_eq!(map.len(), expected);
        prop_assert_eq!(map.iter().count(), expected);
    }

    /// Law: reinserting one key M times grows len by exactly one, and find
    /// returns the latest value.
    #[test]
    fn prop_repeated_key_counts_once(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..50),
        key: i32,
        values in prop::collection::vec(any::<i32>(), 1..10)
    ) {
        let mut map: AvlTreeMap<i32, i32> = entries.into_iter().collect();
        let had_key = map.contains_key(&key);
        let before = map.len();
        for value in &values {
            map.insert(key, *value);
        }
        prop_assert_eq!(map.len(), before + usize::from(!had_key));
        prop_assert_eq!(map.find(&key), values.last());
    }

    /// Law: insert returns the value held immediately before the call.
    #[test]
    fn prop_insert_returns_previous_value(
        entries in prop::collection::vec((0i32..64, any::<i32>()), 0..200)
    ) {
        let mut map = AvlTreeMap::new();
        let mut model = BTreeMap::new();
        for (key, value) in entries {
            prop_assert_eq!(map.insert(key, value), model.insert(key, value));
        }
        prop_assert!(map.iter().eq(model.iter()));
    }

    /// Law: insert does not affect other keys.
    #[test]
    fn prop_insert_leaves_other_keys(
        entries in prop::collection::vec((any::<i32>(), any::<i32>()), 0..50),
        key1: i32,
        key2: i32,
        value: i32
    ) {
        prop_assume!(key1 != key2);
        let mut map: AvlTreeMap<i32, i32> = entries.into_iter().collect();
        let before = map.find(&key2).copied();
        map.insert(key1, value);
        prop_assert_eq!(map.find(&key2).copied(), before);
    }
}

// =============================================================================
// Lookup Laws
// =============================================================================

proptest! {
    /// Law: find never changes the tree.
    #[test]
    fn prop_find_is_non_mutating(
        entries in prop::collection::vec((any::<i16>(), any::<i16>()), 0..100),
        probes in prop::collection::vec(any::<i16>(), 0..50)
    ) {
        let map: AvlTreeMap<i16, i16> = entries.into_iter().collect();
        let snapshot = map.clone();
        let lookup = |probe: &i16| map.find(probe).copied();
        let first: Vec<Option<i16>> = probes.iter().map(lookup).collect();
        let second: Vec<Option<i16>> = probes.iter().map(lookup).collect();
        prop_assert_eq!(first, second);
        prop_assert_eq!(&map, &snapshot);
        prop_assert_eq!(map.height(), snapshot.height());
    }
}

// =============================================================================
// Large Random Insertion
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(4))]

    /// Law: 10,000 shuffled keys keep every invariant and stay within the
    /// AVL height bound.
    #[test]
    fn prop_ten_thousand_shuffled_keys(
        keys in Just((0u32..10_000).collect::<Vec<u32>>()).prop_shuffle()
    ) {
        let mut map = AvlTreeMap::new();
        for key in &keys {
            prop_assert_eq!(map.insert(*key, key.wrapping_mul(7)), None);
        }
        prop_assert_eq!(map.len(), 10_000);
        prop_assert_eq!(map.check_invariants(), Ok(()));
        prop_assert!((map.height() as f64) <= height_bound(map.len()));
        prop_assert!(map.keys().copied().eq(0u32..10_000));
        for key in (0u32..10_000).step_by(97) {
            prop_assert_eq!(map.find(&key), Some(&key.wrapping_mul(7)));
        }
    }
}
