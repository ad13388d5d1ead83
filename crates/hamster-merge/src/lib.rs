//! Recursive deep merge for keyed configuration trees.
//!
//! Merge semantics:
//! - Keys only in the overlay are adopted as-is (no resolver call)
//! - Keys only in the base are kept unchanged
//! - Both sides mappings: merged recursively with the same resolver
//! - Anything else (scalars, sequences, type mismatch): the caller's
//!   [`ConflictResolver`] decides
//!
//! Merges are immutable and atomic: inputs are borrowed, and a resolver
//! failure anywhere in the tree fails the whole merge without returning a
//! partial result.

mod error;
mod resolver;

pub use error::{MergeError, ResolveError};
pub use resolver::{
    resolve_with, BaseWins, ConflictResolver, FnResolver, OverlayWins, RejectConflicts,
};

use serde_json::{Map, Value};

/// A keyed configuration tree.
pub type ConfigTree = Map<String, Value>;

/// Deep merge `overlay` onto `base`.
///
/// Keys are visited in the overlay's key order, so a given
/// `(base, overlay, resolver)` triple always yields the same tree as long as
/// the resolver is pure.
pub fn deep_merge<R>(
    base: &ConfigTree,
    overlay: &ConfigTree,
    resolver: &R,
) -> Result<ConfigTree, MergeError>
where
    R: ConflictResolver + ?Sized,
{
    let mut path = Vec::new();
    merge_level(base, overlay, resolver, &mut path)
}

fn merge_level<R>(
    base: &ConfigTree,
    overlay: &ConfigTree,
    resolver: &R,
    path: &mut Vec<String>,
) -> Result<ConfigTree, MergeError>
where
    R: ConflictResolver + ?Sized,
{
    let mut merged = base.clone();

    for (key, overlay_value) in overlay {
        let value = match (base.get(key), overlay_value) {
            (None, _) => overlay_value.clone(),

            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                path.push(key.clone());
                let nested = merge_level(base_map, overlay_map, resolver, path);
                path.pop();
                Value::Object(nested?)
            }

            (Some(base_value), _) => resolver
                .resolve(base_value, overlay_value)
                .map_err(|source| MergeError::Conflict {
                    path: key_path(path, key),
                    source,
                })?,
        };
        merged.insert(key.clone(), value);
    }

    Ok(merged)
}

fn key_path(parents: &[String], key: &str) -> String {
    if parents.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parents.join("."), key)
    }
}

/// Merge multiple layers in order (first is base, last has highest precedence).
pub fn merge_layers<I, R>(layers: I, resolver: &R) -> Result<ConfigTree, MergeError>
where
    I: IntoIterator<Item = ConfigTree>,
    R: ConflictResolver + ?Sized,
{
    layers
        .into_iter()
        .try_fold(ConfigTree::new(), |acc, layer| deep_merge(&acc, &layer, resolver))
}
