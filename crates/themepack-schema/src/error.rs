//! # Error Types
//!
//! - [`SchemaError`]: compiling or validating against a descriptor.
//! - [`ShapeDeclError`]: a declarative shape (YAML/JSON) could not be
//!   turned into a [`Shape`](crate::Shape).
//! - [`ConsistencyError`]: a relation field disagrees with its UI metadata.
//!   Always fatal for the whole registration batch.

use thiserror::Error;

use crate::validate::ValidationViolations;

/// Error compiling or validating against a schema.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The value did not conform to the schema.
    #[error("validation failed:\n{0}")]
    ValidationFailed(ValidationViolations),

    /// The rendered JSON Schema could not be compiled.
    #[error("validator build error for schema '{schema_name}': {reason}")]
    ValidatorBuild {
        /// Schema identifier.
        schema_name: String,
        /// Reason the validator could not be built.
        reason: String,
    },
}

/// Error converting a shape declaration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid shape declaration at '{path}': {reason}")]
pub struct ShapeDeclError {
    /// Dotted path of the offending declaration (e.g. `$.items.name`).
    pub path: String,
    /// What was wrong with it.
    pub reason: String,
}

/// Expected cardinality of a relation field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The UI declares `isMultiple: true`.
    Many,
    /// The UI declares `isMultiple` false or leaves it out.
    One,
}

impl std::fmt::Display for Cardinality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cardinality::Many => {
                f.write_str("must be an array (ui metadata declares isMultiple: true)")
            }
            Cardinality::One => {
                f.write_str("must not be an array (ui metadata does not declare isMultiple)")
            }
        }
    }
}

/// Relation cardinality disagreement between a schema and its UI metadata.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConsistencyError {
    /// A relation field's schema type disagrees with `isMultiple`.
    #[error("schema '{schema_name}': field '{field}' {expected}")]
    CardinalityMismatch {
        /// Registration name.
        schema_name: String,
        /// Field name.
        field: String,
        /// What the UI metadata requires.
        expected: Cardinality,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinality_many_message() {
        let err = ConsistencyError::CardinalityMismatch {
            schema_name: "menuItem".to_string(),
            field: "categories".to_string(),
            expected: Cardinality::Many,
        };
        let msg = err.to_string();
        assert!(msg.contains("menuItem"));
        assert!(msg.contains("categories"));
        assert!(msg.contains("must be an array"));
    }

    #[test]
    fn cardinality_one_message() {
        let err = ConsistencyError::CardinalityMismatch {
            schema_name: "menuItem".to_string(),
            field: "category".to_string(),
            expected: Cardinality::One,
        };
        assert!(err.to_string().contains("must not be an array"));
    }

    #[test]
    fn shape_decl_error_display() {
        let err = ShapeDeclError {
            path: "$.tags".to_string(),
            reason: "array declaration needs 'items'".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid shape declaration at '$.tags': array declaration needs 'items'"
        );
    }
}
