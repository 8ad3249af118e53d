//! # Schema Validation
//!
//! Runtime validation of JSON values against the JSON Schema rendered by a
//! descriptor, backed by the `jsonschema` crate (Draft 2020-12 with format
//! assertion enabled, so `uuid`, `email`, `uri` and `date-time` are checked
//! rather than treated as annotations).
//!
//! Failures are reported as structured [`Violation`]s carrying the instance
//! path, the schema path, and a human-readable message.

use std::fmt;

use jsonschema::{Draft, Validator};
use serde_json::Value;

use crate::error::SchemaError;

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer path to the violating value in the instance.
    pub instance_path: String,
    /// JSON Pointer path within the schema that triggered the error.
    pub schema_path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instance_path.is_empty() {
            write!(f, "  (root): {}", self.message)
        } else {
            write!(f, "  {}: {}", self.instance_path, self.message)
        }
    }
}

/// Collection of validation violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolations {
    violations: Vec<Violation>,
}

impl ValidationViolations {
    /// Wrap a list of violations.
    pub fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Prefix every instance path with `/<index>`, used when an array
    /// element of a loader file is validated on its own.
    pub fn at_index(mut self, index: usize) -> Self {
        for v in &mut self.violations {
            v.instance_path = format!("/{index}{}", v.instance_path);
        }
        self
    }
}

impl fmt::Display for ValidationViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

/// A compiled JSON Schema ready to validate instances.
pub struct CompiledSchema {
    validator: Validator,
}

impl CompiledSchema {
    /// Compile `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidatorBuild`] if the schema is not a valid
    /// JSON Schema document.
    pub fn compile(schema_name: &str, schema: &Value) -> Result<Self, SchemaError> {
        let mut opts = jsonschema::options();
        opts.with_draft(Draft::Draft202012);
        opts.should_validate_formats(true);

        let validator = opts.build(schema).map_err(|e| SchemaError::ValidatorBuild {
            schema_name: schema_name.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { validator })
    }

    /// Validate `instance`, collecting every violation.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidationFailed`] with all violations if the
    /// instance does not conform.
    pub fn validate(&self, instance: &Value) -> Result<(), SchemaError> {
        let violations: Vec<Violation> = self
            .validator
            .iter_errors(instance)
            .map(|e| Violation {
                instance_path: e.instance_path.to_string(),
                schema_path: e.schema_path.to_string(),
                message: e.to_string(),
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::ValidationFailed(ValidationViolations::new(violations)))
        }
    }

    /// Fast boolean check without collecting violations.
    pub fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

impl fmt::Debug for CompiledSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledSchema").finish_non_exhaustive()
    }
}
