//! # Error Types
//!
//! Errors shared by every themepack crate. Crate-specific failures
//! (schema conversion, registration) live in their own crates and wrap
//! [`ThemepackError`] where they touch core types.

use thiserror::Error;

/// Top-level error type for core operations.
#[derive(Error, Debug)]
pub enum ThemepackError {
    /// A timestamp string could not be parsed or was not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A path did not satisfy the requirements of the working-directory context.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The offending path.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_path_display_names_path_and_reason() {
        let err = ThemepackError::InvalidPath {
            path: "relative/root".to_string(),
            reason: "must be absolute".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("relative/root"));
        assert!(msg.contains("must be absolute"));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ThemepackError = io.into();
        assert!(matches!(err, ThemepackError::Io(_)));
    }
}
