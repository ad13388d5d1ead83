//! Conflict resolution policies.
//!
//! A resolver decides the merged value when base and overlay both hold a
//! value at the same key and the two are not both mappings.

use serde_json::Value;

use crate::error::ResolveError;

/// Decides the merged value for a leaf collision.
///
/// Implementations must be pure: the same pair of inputs must always
/// produce the same outcome, otherwise merges are not reproducible.
pub trait ConflictResolver {
    /// Resolve a collision between `base` and `overlay`.
    fn resolve(&self, base: &Value, overlay: &Value) -> Result<Value, ResolveError>;
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for &R {
    fn resolve(&self, base: &Value, overlay: &Value) -> Result<Value, ResolveError> {
        (**self).resolve(base, overlay)
    }
}

impl<R: ConflictResolver + ?Sized> ConflictResolver for Box<R> {
    fn resolve(&self, base: &Value, overlay: &Value) -> Result<Value, ResolveError> {
        (**self).resolve(base, overlay)
    }
}

/// The overlay's value replaces the base value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlayWins;

impl ConflictResolver for OverlayWins {
    fn resolve(&self, _base: &Value, overlay: &Value) -> Result<Value, ResolveError> {
        Ok(overlay.clone())
    }
}

/// The base value is kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BaseWins;

impl ConflictResolver for BaseWins {
    fn resolve(&self, base: &Value, _overlay: &Value) -> Result<Value, ResolveError> {
        Ok(base.clone())
    }
}

/// Equal leaves merge; any differing leaf is an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RejectConflicts;

impl ConflictResolver for RejectConflicts {
    fn resolve(&self, base: &Value, overlay: &Value) -> Result<Value, ResolveError> {
        if base == overlay {
            Ok(base.clone())
        } else {
            Err(ResolveError::new(format!(
                "base value {} conflicts with overlay value {}",
                base, overlay
            )))
        }
    }
}

/// Resolver backed by a closure. Build one with [`resolve_with`].
#[derive(Clone, Copy)]
pub struct FnResolver<F> {
    f: F,
}

impl<F> ConflictResolver for FnResolver<F>
where
    F: Fn(&Value, &Value) -> Result<Value, ResolveError>,
{
    fn resolve(&self, base: &Value, overlay: &Value) -> Result<Value, ResolveError> {
        (self.f)(base, overlay)
    }
}

impl<F> std::fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnResolver").finish_non_exhaustive()
    }
}

/// Wrap a closure as a [`ConflictResolver`].
///
/// ```
/// use hamster_merge::{resolve_with, ConflictResolver};
/// use serde_json::json;
///
/// let sum = resolve_with(|a, b| {
///     Ok(json!(a.as_i64().unwrap_or(0) + b.as_i64().unwrap_or(0)))
/// });
/// assert_eq!(sum.resolve(&json!(1), &json!(2)).unwrap(), json!(3));
/// ```
pub fn resolve_with<F>(f: F) -> FnResolver<F>
where
    F: Fn(&Value, &Value) -> Result<Value, ResolveError>,
{
    FnResolver { f }
}
