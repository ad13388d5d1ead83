//! Error types for merge operations.

/// Failure reported by a conflict resolver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ResolveError {
    message: String,
}

impl ResolveError {
    /// Create a new resolver error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Human-readable reason.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Errors produced by [`deep_merge`](crate::deep_merge).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MergeError {
    /// The conflict resolver failed for the leaf at `path`.
    ///
    /// The whole merge is abandoned; no partial tree is returned.
    #[error("conflict at `{path}` could not be resolved: {source}")]
    Conflict {
        /// Dot-separated key path of the conflicting leaf.
        path: String,
        #[source]
        source: ResolveError,
    },
}

impl MergeError {
    /// Key path where the merge failed.
    pub fn path(&self) -> &str {
        match self {
            MergeError::Conflict { path, .. } => path,
        }
    }
}
