//! # Schema Descriptors
//!
//! The narrow interface the packager needs from a schema: enumerate fields,
//! inspect a field's optionality and arrayness, render a portable JSON
//! Schema, and validate a value. [`ObjectSchema`] implements it; other
//! schema front-ends can plug in by implementing the two traits.

use std::fmt;

use serde_json::Value;

use crate::error::SchemaError;
use crate::shape::{ObjectSchema, Shape};

/// A single field of a schema.
pub trait FieldDescriptor {
    /// True when the field may be absent.
    fn is_optional(&self) -> bool;

    /// The field with every optional/default wrapper removed.
    fn unwrap_optional(&self) -> &dyn FieldDescriptor;

    /// True when the field (as-is, without unwrapping) is an array.
    fn is_array(&self) -> bool;
}

/// An object schema a content type is registered with.
pub trait SchemaDescriptor: fmt::Debug {
    /// Field names in declaration order.
    fn field_names(&self) -> Vec<&str>;

    /// Look up a field by name.
    fn field(&self, name: &str) -> Option<&dyn FieldDescriptor>;

    /// Render the object definition as JSON Schema (no relation rewriting).
    fn to_portable(&self) -> Value;

    /// Validate a value against the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidationFailed`] when the value does not
    /// conform.
    fn validate(&self, value: &Value) -> Result<(), SchemaError>;

    /// Build the validator without checking any value.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidatorBuild`] when the rendered schema is
    /// not a usable JSON Schema.
    fn check(&self) -> Result<(), SchemaError>;
}

impl FieldDescriptor for Shape {
    fn is_optional(&self) -> bool {
        !self.is_required()
    }

    fn unwrap_optional(&self) -> &dyn FieldDescriptor {
        match self {
            Shape::Optional(inner) | Shape::Default(inner, _) => inner.unwrap_optional(),
            other => other,
        }
    }

    fn is_array(&self) -> bool {
        matches!(self, Shape::Array(_))
    }
}

impl SchemaDescriptor for ObjectSchema {
    fn field_names(&self) -> Vec<&str> {
        self.iter().map(|(name, _)| name).collect()
    }

    fn field(&self, name: &str) -> Option<&dyn FieldDescriptor> {
        self.get(name).map(|shape| shape as &dyn FieldDescriptor)
    }

    fn to_portable(&self) -> Value {
        self.to_json_schema()
    }

    fn validate(&self, value: &Value) -> Result<(), SchemaError> {
        self.compiled()?.validate(value)
    }

    fn check(&self) -> Result<(), SchemaError> {
        self.compiled().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::NumberRules;
    use serde_json::json;

    fn schema() -> ObjectSchema {
        ObjectSchema::new()
            .with_field("id", Shape::string().uuid())
            .with_field("tags", Shape::array(Shape::string()).optional())
            .with_field("owner", Shape::string().default("nobody"))
    }

    #[test]
    fn field_names_keep_declaration_order() {
        assert_eq!(schema().field_names(), vec!["id", "tags", "owner"]);
    }

    #[test]
    fn optional_array_is_array_only_after_unwrap() {
        let s = schema();
        let tags = s.field("tags").unwrap();
        assert!(tags.is_optional());
        assert!(!tags.is_array());
        assert!(tags.unwrap_optional().is_array());
    }

    #[test]
    fn default_counts_as_optional() {
        let s = schema();
        let owner = s.field("owner").unwrap();
        assert!(owner.is_optional());
        assert!(!owner.unwrap_optional().is_optional());
    }

    #[test]
    fn nested_wrappers_unwrap_fully() {
        let shape = Shape::array(Shape::string()).optional().default(json!([]));
        assert!(shape.unwrap_optional().is_array());
    }

    #[test]
    fn unknown_field_is_none() {
        assert!(schema().field("missing").is_none());
    }

    #[test]
    fn validate_uses_rendered_schema() {
        let s = schema();
        s.validate(&json!({ "id": "1f0e4c2a-3b5d-4e6f-8a9b-0c1d2e3f4a5b" }))
            .unwrap();
        assert!(s.validate(&json!({ "id": "nope" })).is_err());
        assert!(s.validate(&json!({})).is_err());
    }

    #[test]
    fn check_reports_unbuildable_schema() {
        schema().check().unwrap();

        let broken = ObjectSchema::new().with_field(
            "rating",
            Shape::Number(NumberRules {
                integer: false,
                minimum: Some(f64::NAN),
                maximum: None,
                positive: false,
            }),
        );
        assert!(matches!(broken.check(), Err(SchemaError::ValidatorBuild { .. })));
    }
}
