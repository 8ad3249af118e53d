//! # UI Schema
//!
//! Opaque per-field presentation metadata. The packager only interprets
//! relation fields: a field whose metadata carries
//! `"ui:field": "relationSelect"` references other content, and
//! `isMultiple` (under `ui:options`, or at the top level of the field
//! metadata) decides whether it holds one reference or many.
//!
//! Keys starting with `ui:` at the top level are form-wide options and are
//! never treated as field names.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

/// Widget identifier marking a relation field.
pub const RELATION_SELECT: &str = "relationSelect";

const RESERVED_PREFIX: &str = "ui:";

/// A UI schema must be a JSON object.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("ui schema must be a JSON object, got {found}")]
pub struct UiSchemaError {
    /// JSON type that was supplied instead.
    pub found: &'static str,
}

/// A relation field and its cardinality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// `isMultiple: true` was declared.
    pub multiple: bool,
}

/// Per-field UI metadata, written verbatim to the UI schema file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct UiSchema(Map<String, Value>);

impl UiSchema {
    /// An empty UI schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`UiSchemaError`] if `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, UiSchemaError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(UiSchemaError {
                found: json_type(&other),
            }),
        }
    }

    /// Set the metadata for one key.
    pub fn with_field(mut self, key: impl Into<String>, metadata: Value) -> Self {
        self.0.insert(key.into(), metadata);
        self
    }

    /// Metadata for a relation field.
    pub fn relation_select(multiple: bool) -> Value {
        json!({
            "ui:field": RELATION_SELECT,
            "ui:options": { "isMultiple": multiple }
        })
    }

    /// The underlying object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Clone into a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// True for form-wide keys such as `ui:order`.
    pub fn is_reserved_key(key: &str) -> bool {
        key.starts_with(RESERVED_PREFIX)
    }

    /// Field entries, skipping reserved keys.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0
            .iter()
            .filter(|(k, _)| !Self::is_reserved_key(k))
            .map(|(k, v)| (k.as_str(), v))
    }

    /// The relation declared for `field`, if any.
    pub fn relation(&self, field: &str) -> Option<Relation> {
        if Self::is_reserved_key(field) {
            return None;
        }
        self.0.get(field).and_then(relation_of)
    }

    /// Every relation field, in key order.
    pub fn relations(&self) -> impl Iterator<Item = (&str, Relation)> {
        self.fields()
            .filter_map(|(field, meta)| relation_of(meta).map(|r| (field, r)))
    }
}

fn relation_of(metadata: &Value) -> Option<Relation> {
    if metadata.get("ui:field").and_then(Value::as_str) != Some(RELATION_SELECT) {
        return None;
    }
    let flag = metadata
        .get("ui:options")
        .and_then(|o| o.get("isMultiple"))
        .or_else(|| metadata.get("isMultiple"));
    Some(Relation {
        multiple: matches!(flag, Some(Value::Bool(true))),
    })
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl TryFrom<Value> for UiSchema {
    type Error = UiSchemaError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<UiSchema> for Value {
    fn from(ui: UiSchema) -> Self {
        Value::Object(ui.0)
    }
}
