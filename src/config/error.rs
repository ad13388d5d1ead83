//! Configuration errors

use hamster_merge::MergeError;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Input text is not well-formed, or a known key holds the wrong type.
    #[error("Malformed configuration: {0}")]
    Malformed(String),

    /// The tree cannot be encoded in the requested format.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The conflict resolver failed during a merge.
    #[error("Merge error: {0}")]
    Merge(#[from] MergeError),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Migration error: {0}")]
    Migration(String),
}

impl ConfigError {
    /// Process exit code used by the CLI for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::Merge(_) => 2,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hamster_merge::ResolveError;

    #[test]
    fn test_exit_codes() {
        let merge = ConfigError::from(MergeError::Conflict {
            path: "rime".to_string(),
            source: ResolveError::new("differs"),
        });
        assert_eq!(merge.exit_code(), 2);
        assert_eq!(ConfigError::Malformed("bad".to_string()).exit_code(), 1);
    }
}
