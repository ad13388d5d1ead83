//! Property-based tests for deep merge identities and disjoint unions.

use std::cell::Cell;

use hamster_merge::{deep_merge, resolve_with, BaseWins, ConfigTree, OverlayWins, ResolveError};
use proptest::prelude::*;
use serde_json::Value;

fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z0-9 ]{0,8}".prop_map(Value::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    leaf_strategy().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..5)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

fn tree_strategy() -> impl Strategy<Value = ConfigTree> {
    prop::collection::btree_map("[a-z]{1,6}", value_strategy(), 0..6)
        .prop_map(|m| m.into_iter().collect())
}

fn prefixed(tree: ConfigTree, prefix: &str) -> ConfigTree {
    tree.into_iter()
        .map(|(k, v)| (format!("{}{}", prefix, k), v))
        .collect()
}

/// Property: merging an empty overlay returns the base unchanged.
#[test]
fn prop_empty_overlay_is_right_identity() {
    proptest!(|(t in tree_strategy())| {
        let merged = deep_merge(&t, &ConfigTree::new(), &OverlayWins).unwrap();
        prop_assert_eq!(merged, t);
    });
}

/// Property: merging onto an empty base returns the overlay unchanged.
#[test]
fn prop_empty_base_is_left_identity() {
    proptest!(|(t in tree_strategy())| {
        let merged = deep_merge(&ConfigTree::new(), &t, &BaseWins).unwrap();
        prop_assert_eq!(merged, t);
    });
}

/// Property: disjoint trees merge to their union and never consult the resolver.
#[test]
fn prop_disjoint_union_never_resolves() {
    proptest!(|(a in tree_strategy(), b in tree_strategy())| {
        let a = prefixed(a, "a_");
        let b = prefixed(b, "b_");
        let calls = Cell::new(0usize);
        let resolver = resolve_with(|_, _| {
            calls.set(calls.get() + 1);
            Err(ResolveError::new("unexpected conflict"))
        });

        let merged = deep_merge(&a, &b, &resolver).unwrap();

        prop_assert_eq!(calls.get(), 0);
        prop_assert_eq!(merged.len(), a.len() + b.len());
        for (k, v) in a.iter().chain(b.iter()) {
            prop_assert_eq!(merged.get(k), Some(v));
        }
    });
}

/// Property: every key of either input survives the merge.
#[test]
fn prop_no_key_dropped() {
    proptest!(|(a in tree_strategy(), b in tree_strategy())| {
        let merged = deep_merge(&a, &b, &OverlayWins).unwrap();
        for k in a.keys().chain(b.keys()) {
            prop_assert!(merged.contains_key(k), "missing key {}", k);
        }
    });
}

/// Property: merging a tree with itself is idempotent for either policy.
#[test]
fn prop_self_merge_is_idempotent() {
    proptest!(|(t in tree_strategy())| {
        prop_assert_eq!(deep_merge(&t, &t, &OverlayWins).unwrap(), t.clone());
        prop_assert_eq!(deep_merge(&t, &t, &BaseWins).unwrap(), t);
    });
}

/// Property: the same inputs always give the same result.
#[test]
fn prop_merge_is_deterministic() {
    proptest!(|(a in tree_strategy(), b in tree_strategy())| {
        let first = deep_merge(&a, &b, &OverlayWins).unwrap();
        let second = deep_merge(&a, &b, &OverlayWins).unwrap();
        prop_assert_eq!(first, second);
    });
}
