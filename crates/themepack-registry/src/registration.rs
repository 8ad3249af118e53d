//! # Schema Registrations
//!
//! One [`SchemaRegistration`] per content type: a name (used as file stem
//! and manifest key), a schema, optional UI metadata, and the location of
//! its loader file. Names must be unique within a batch; duplicates are
//! not detected and the later entry overwrites the earlier one's output.

use std::fmt;

use themepack_schema::{SchemaDescriptor, UiSchema};

use crate::error::RegistryError;

/// A content type to register.
pub struct SchemaRegistration {
    /// Unique name within the batch.
    pub name: String,
    /// Structural schema for the content type.
    pub schema: Box<dyn SchemaDescriptor>,
    /// Presentation metadata, written verbatim.
    pub ui_schema: Option<UiSchema>,
    /// Loader file location as supplied (relative to the working directory
    /// or absolute). Recorded unchanged in the location index.
    pub loader_location: String,
}

impl SchemaRegistration {
    /// A registration without UI metadata.
    pub fn new(
        name: impl Into<String>,
        schema: impl SchemaDescriptor + 'static,
        loader_location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schema: Box::new(schema),
            ui_schema: None,
            loader_location: loader_location.into(),
        }
    }

    /// Attach UI metadata.
    pub fn with_ui_schema(mut self, ui_schema: UiSchema) -> Self {
        self.ui_schema = Some(ui_schema);
        self
    }

    /// The schema as a trait object.
    pub fn schema(&self) -> &dyn SchemaDescriptor {
        self.schema.as_ref()
    }

    /// Reject names that cannot be used as a file stem.
    pub(crate) fn check_name(&self) -> Result<(), RegistryError> {
        let reason = if self.name.is_empty() {
            "name must not be empty"
        } else if self.name.contains(['/', '\\']) {
            "name must not contain path separators"
        } else if self.name == "." || self.name == ".." {
            "name must not be a relative path component"
        } else {
            return Ok(());
        };
        Err(RegistryError::InvalidName {
            name: self.name.clone(),
            reason: reason.to_string(),
        })
    }
}

impl fmt::Debug for SchemaRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistration")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("ui_schema", &self.ui_schema.is_some())
            .field("loader_location", &self.loader_location)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use themepack_schema::{ObjectSchema, Shape};

    fn named(name: &str) -> SchemaRegistration {
        SchemaRegistration::new(
            name,
            ObjectSchema::new().with_field("id", Shape::string()),
            "data/x.json",
        )
    }

    #[test]
    fn plain_names_accepted() {
        named("category").check_name().unwrap();
        named("menu-item_2").check_name().unwrap();
    }

    #[test]
    fn path_like_names_rejected() {
        for bad in ["", "a/b", "a\\b", "..", "."] {
            assert!(
                matches!(named(bad).check_name(), Err(RegistryError::InvalidName { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn with_ui_schema_attaches() {
        let r = named("category").with_ui_schema(UiSchema::new());
        assert!(r.ui_schema.is_some());
        assert_eq!(r.schema().field_names(), vec!["id"]);
    }
}
