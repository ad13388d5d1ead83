//! Typed configuration merge
//!
//! Both sides are encoded to keyed trees, merged with
//! [`hamster_merge::deep_merge`], and the result decoded back into the model.

use hamster_merge::{deep_merge, ConfigTree, ConflictResolver};
use serde_json::Value;

use super::error::ConfigError;
use super::model::HamsterConfiguration;

impl HamsterConfiguration {
    /// Encode as a keyed tree. Unset fields are absent from the tree.
    pub fn to_tree(&self) -> Result<ConfigTree, ConfigError> {
        self.ensure_representable()?;
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(ConfigError::Serialization(format!(
                "configuration encoded as {} instead of a mapping",
                other
            ))),
            Err(e) => Err(ConfigError::Serialization(e.to_string())),
        }
    }

    /// Decode a keyed tree.
    pub fn from_tree(tree: ConfigTree) -> Result<Self, ConfigError> {
        serde_json::from_value(Value::Object(tree))
            .map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// Merge `overlay` onto this configuration.
    ///
    /// Fails with [`ConfigError::Merge`] if the resolver fails (nothing is
    /// merged), or [`ConfigError::Malformed`] if the resolver produced a
    /// value of the wrong type for a known field.
    pub fn merge<R>(
        &self,
        overlay: &HamsterConfiguration,
        resolver: &R,
    ) -> Result<Self, ConfigError>
    where
        R: ConflictResolver + ?Sized,
    {
        let base = self.to_tree()?;
        let overlay = overlay.to_tree()?;
        let merged = deep_merge(&base, &overlay, resolver).map_err(|e| {
            tracing::debug!(path = %e.path(), error = %e, "merge conflict not resolved");
            e
        })?;
        Self::from_tree(merged)
    }
}
