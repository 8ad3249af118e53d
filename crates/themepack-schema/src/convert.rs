//! # Schema Converter
//!
//! Produces the portable document written to `schemas/<name>.json`:
//!
//! ```json
//! {
//!   "$ref": "#/definitions/<name>",
//!   "definitions": { "<name>": { "type": "object", ... } },
//!   "$schema": "http://json-schema.org/draft-07/schema#"
//! }
//! ```
//!
//! Relation fields are relaxed after conversion: their property becomes an
//! unconstrained `{"type": "array"}` or `{"type": "object"}` and they are
//! dropped from `required`. Relation values are resolved by the authoring
//! tool, not validated structurally.

use serde_json::{json, Map, Value};

use crate::descriptor::SchemaDescriptor;
use crate::ui::UiSchema;

/// `$schema` URI of the portable document.
pub const PORTABLE_SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// A converted, root-referenced schema document for one registration.
#[derive(Debug, Clone, PartialEq)]
pub struct PortableSchema {
    name: String,
    document: Value,
}

impl PortableSchema {
    /// Registration name the document is keyed by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The whole document.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The object definition under `definitions/<name>`.
    pub fn definition(&self) -> Option<&Value> {
        self.document.get("definitions")?.get(&self.name)
    }

    /// Consume into the document.
    pub fn into_document(self) -> Value {
        self.document
    }

    /// Compact JSON text, as written to disk.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.document)
    }
}

/// Convert `schema` into its portable document, relaxing the relation
/// fields declared in `ui`.
pub fn convert(schema: &dyn SchemaDescriptor, ui: Option<&UiSchema>, name: &str) -> PortableSchema {
    let mut definition = schema.to_portable();
    if let Some(ui) = ui {
        relax_relation_fields(&mut definition, ui);
    }

    let mut definitions = Map::new();
    definitions.insert(name.to_string(), definition);

    PortableSchema {
        name: name.to_string(),
        document: json!({
            "$ref": format!("#/definitions/{name}"),
            "definitions": definitions,
            "$schema": PORTABLE_SCHEMA_DIALECT,
        }),
    }
}

/// Rewrite every relation property present in `definition` and remove it
/// from `required`. Returns the number of properties rewritten.
///
/// Idempotent. Relations naming properties the definition does not have
/// are ignored.
pub fn relax_relation_fields(definition: &mut Value, ui: &UiSchema) -> usize {
    let Some(object) = definition.as_object_mut() else {
        return 0;
    };

    let mut rewritten = Vec::new();
    if let Some(Value::Object(properties)) = object.get_mut("properties") {
        for (field, relation) in ui.relations() {
            if let Some(property) = properties.get_mut(field) {
                let ty = if relation.multiple { "array" } else { "object" };
                *property = json!({ "type": ty });
                rewritten.push(field.to_string());
                tracing::debug!(field, relaxed_to = ty, "relaxed relation field");
            }
        }
    }

    let now_empty = match object.get_mut("required") {
        Some(Value::Array(required)) => {
            required.retain(|r| !r.as_str().is_some_and(|r| rewritten.iter().any(|f| f == r)));
            required.is_empty()
        }
        _ => false,
    };
    if now_empty {
        object.remove("required");
    }

    rewritten.len()
}
