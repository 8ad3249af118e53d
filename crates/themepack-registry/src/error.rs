//! # Error Types
//!
//! [`RegistryError`] covers every way a registration pass or manifest build
//! can fail. Problems with individual loader files are not errors: they are
//! reported as [`ReconcileOutcome::Overwritten`](crate::ReconcileOutcome)
//! and the pass continues.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use themepack_schema::{ConsistencyError, SchemaError};

/// Error from the registration pass or manifest assembly.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A relation field disagrees with its UI metadata. Nothing was written.
    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    /// A registered schema cannot be turned into a validator. Nothing was
    /// written when raised before output.
    #[error("schema '{schema_name}' is unusable: {source}")]
    Schema {
        /// Registration name.
        schema_name: String,
        /// Underlying build failure.
        #[source]
        source: SchemaError,
    },

    /// A registration name cannot be used as a file stem.
    #[error("invalid registration name '{name}': {reason}")]
    InvalidName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Filesystem failure that aborts the pass.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// JSON encoding or decoding failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RegistryError {
    /// Attach `path` to an I/O error.
    pub(crate) fn io(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use themepack_schema::Cardinality;

    #[test]
    fn io_error_names_path() {
        let err = RegistryError::io(Path::new("/tmp/x/schemas"))(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let msg = err.to_string();
        assert!(msg.contains("/tmp/x/schemas"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn schema_error_names_registration() {
        let err = RegistryError::Schema {
            schema_name: "dish".to_string(),
            source: SchemaError::ValidatorBuild {
                schema_name: "object".to_string(),
                reason: "null is not of type \"number\"".to_string(),
            },
        };
        assert!(err.to_string().starts_with("schema 'dish' is unusable"));
    }

    #[test]
    fn consistency_error_is_transparent() {
        let inner = ConsistencyError::CardinalityMismatch {
            schema_name: "dish".to_string(),
            field: "chef".to_string(),
            expected: Cardinality::Many,
        };
        let expected = inner.to_string();
        assert_eq!(RegistryError::from(inner).to_string(), expected);
    }
}
