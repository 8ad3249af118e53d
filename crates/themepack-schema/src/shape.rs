//! # Shape Language
//!
//! A small typed schema language for describing content types. A [`Shape`]
//! describes one value; an [`ObjectSchema`] is an ordered list of named
//! fields and is what a registration carries.
//!
//! Shapes can be built fluently:
//!
//! ```
//! use themepack_schema::{ObjectSchema, Shape};
//!
//! let category = ObjectSchema::new()
//!     .with_field("id", Shape::string().uuid())
//!     .with_field("name", Shape::string().min_length(1))
//!     .with_field("description", Shape::string().optional())
//!     .with_field("items", Shape::array(Shape::string().uuid()));
//! assert_eq!(category.len(), 4);
//! ```
//!
//! or declared in YAML/JSON, one map entry per field:
//!
//! ```yaml
//! id:    { type: string, format: uuid }
//! price: { type: number, positive: true }
//! tags:  { type: array, items: { type: string } }
//! notes: { type: string, optional: true }
//! ```
//!
//! ## JSON Schema rendering
//!
//! Objects render with `additionalProperties: false` and a `required` list
//! holding every field that is neither optional nor defaulted, in
//! declaration order. Defaulted fields carry a `default` keyword.

use std::fmt;
use std::sync::OnceLock;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Number, Value};

use crate::error::{SchemaError, ShapeDeclError};
use crate::validate::CompiledSchema;

/// String formats asserted during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    /// RFC 4122 UUID.
    Uuid,
    /// Email address.
    Email,
    /// Absolute URI.
    Uri,
    /// RFC 3339 date-time.
    DateTime,
}

impl StringFormat {
    /// The JSON Schema `format` keyword value.
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::Uuid => "uuid",
            StringFormat::Email => "email",
            StringFormat::Uri => "uri",
            StringFormat::DateTime => "date-time",
        }
    }
}

/// Constraints on a string value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringRules {
    /// Minimum length in characters.
    pub min_length: Option<u64>,
    /// Maximum length in characters.
    pub max_length: Option<u64>,
    /// Asserted format.
    pub format: Option<StringFormat>,
}

/// Constraints on a numeric value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberRules {
    /// Restrict to integers.
    pub integer: bool,
    /// Inclusive lower bound.
    pub minimum: Option<f64>,
    /// Inclusive upper bound.
    pub maximum: Option<f64>,
    /// Strictly greater than zero.
    pub positive: bool,
}

/// The shape of a single value.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// A string.
    String(StringRules),
    /// A number or integer.
    Number(NumberRules),
    /// A boolean.
    Boolean,
    /// One of a fixed set of strings.
    Enum(Vec<String>),
    /// A homogeneous array.
    Array(Box<Shape>),
    /// A nested object.
    Object(ObjectSchema),
    /// A field that may be absent.
    Optional(Box<Shape>),
    /// A field that may be absent and has a default value.
    Default(Box<Shape>, Value),
    /// Anything.
    Any,
}

impl Shape {
    /// An unconstrained string.
    pub fn string() -> Self {
        Shape::String(StringRules::default())
    }

    /// An unconstrained number.
    pub fn number() -> Self {
        Shape::Number(NumberRules::default())
    }

    /// An unconstrained integer.
    pub fn integer() -> Self {
        Shape::Number(NumberRules {
            integer: true,
            ..NumberRules::default()
        })
    }

    /// A boolean.
    pub fn boolean() -> Self {
        Shape::Boolean
    }

    /// One of `values`.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Shape::Enum(values.into_iter().map(Into::into).collect())
    }

    /// An array of `item`.
    pub fn array(item: Shape) -> Self {
        Shape::Array(Box::new(item))
    }

    /// A nested object.
    pub fn object(schema: ObjectSchema) -> Self {
        Shape::Object(schema)
    }

    /// Anything.
    pub fn any() -> Self {
        Shape::Any
    }

    /// Mark this field optional.
    pub fn optional(self) -> Self {
        Shape::Optional(Box::new(self))
    }

    /// Give this field a default value (implies optional).
    pub fn default(self, value: impl Into<Value>) -> Self {
        Shape::Default(Box::new(self), value.into())
    }

    /// Require the UUID format. No effect on non-string shapes.
    pub fn uuid(self) -> Self {
        self.with_format(StringFormat::Uuid)
    }

    /// Require the email format. No effect on non-string shapes.
    pub fn email(self) -> Self {
        self.with_format(StringFormat::Email)
    }

    /// Require the URI format. No effect on non-string shapes.
    pub fn uri(self) -> Self {
        self.with_format(StringFormat::Uri)
    }

    /// Require the date-time format. No effect on non-string shapes.
    pub fn date_time(self) -> Self {
        self.with_format(StringFormat::DateTime)
    }

    /// Minimum string length. No effect on non-string shapes.
    pub fn min_length(self, n: u64) -> Self {
        self.map_string(|r| r.min_length = Some(n))
    }

    /// Maximum string length. No effect on non-string shapes.
    pub fn max_length(self, n: u64) -> Self {
        self.map_string(|r| r.max_length = Some(n))
    }

    /// Inclusive lower bound. No effect on non-numeric shapes or when `x`
    /// is NaN or infinite.
    pub fn minimum(self, x: f64) -> Self {
        self.map_number(|r| {
            if x.is_finite() {
                r.minimum = Some(x);
            }
        })
    }

    /// Inclusive upper bound. No effect on non-numeric shapes or when `x`
    /// is NaN or infinite.
    pub fn maximum(self, x: f64) -> Self {
        self.map_number(|r| {
            if x.is_finite() {
                r.maximum = Some(x);
            }
        })
    }

    /// Strictly positive. No effect on non-numeric shapes.
    pub fn positive(self) -> Self {
        self.map_number(|r| r.positive = true)
    }

    fn with_format(self, format: StringFormat) -> Self {
        self.map_string(|r| r.format = Some(format))
    }

    fn map_string(self, f: impl FnOnce(&mut StringRules)) -> Self {
        match self {
            Shape::String(mut rules) => {
                f(&mut rules);
                Shape::String(rules)
            }
            other => other,
        }
    }

    fn map_number(self, f: impl FnOnce(&mut NumberRules)) -> Self {
        match self {
            Shape::Number(mut rules) => {
                f(&mut rules);
                Shape::Number(rules)
            }
            other => other,
        }
    }

    /// Whether an enclosing object lists this field under `required`.
    pub fn is_required(&self) -> bool {
        !matches!(self, Shape::Optional(_) | Shape::Default(..))
    }

    /// Render as a JSON Schema fragment.
    pub fn to_json_schema(&self) -> Value {
        match self {
            Shape::String(rules) => {
                let mut m = typed("string");
                if let Some(n) = rules.min_length {
                    m.insert("minLength".to_string(), Value::from(n));
                }
                if let Some(n) = rules.max_length {
                    m.insert("maxLength".to_string(), Value::from(n));
                }
                if let Some(format) = rules.format {
                    m.insert("format".to_string(), Value::from(format.as_str()));
                }
                Value::Object(m)
            }
            Shape::Number(rules) => {
                let mut m = typed(if rules.integer { "integer" } else { "number" });
                if rules.positive {
                    m.insert("exclusiveMinimum".to_string(), Value::from(0));
                }
                if let Some(x) = rules.minimum {
                    m.insert("minimum".to_string(), number_value(x));
                }
                if let Some(x) = rules.maximum {
                    m.insert("maximum".to_string(), number_value(x));
                }
                Value::Object(m)
            }
            Shape::Boolean => Value::Object(typed("boolean")),
            Shape::Enum(values) => {
                let mut m = typed("string");
                m.insert(
                    "enum".to_string(),
                    Value::Array(values.iter().cloned().map(Value::String).collect()),
                );
                Value::Object(m)
            }
            Shape::Array(item) => {
                let mut m = typed("array");
                m.insert("items".to_string(), item.to_json_schema());
                Value::Object(m)
            }
            Shape::Object(schema) => schema.to_json_schema(),
            Shape::Optional(inner) => inner.to_json_schema(),
            Shape::Default(inner, value) => {
                let mut rendered = inner.to_json_schema();
                if let Value::Object(m) = &mut rendered {
                    m.insert("default".to_string(), value.clone());
                }
                rendered
            }
            Shape::Any => Value::Object(Map::new()),
        }
    }
}

fn typed(ty: &str) -> Map<String, Value> {
    let mut m = Map::new();
    m.insert("type".to_string(), Value::from(ty));
    m
}

/// Whole numbers render without a fractional part.
fn number_value(x: f64) -> Value {
    if x.fract() == 0.0 && x.abs() < 9.0e15 {
        Value::from(x as i64)
    } else {
        Number::from_f64(x).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// An object shape: named fields in declaration order.
///
/// Validation compiles the rendered JSON Schema once and caches it; the
/// builder resets the cache whenever a field is added.
pub struct ObjectSchema {
    fields: Vec<(String, Shape)>,
    compiled: OnceLock<CompiledSchema>,
}

impl ObjectSchema {
    /// An object with no fields.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            compiled: OnceLock::new(),
        }
    }

    /// Add a field, replacing any earlier field with the same name.
    pub fn with_field(mut self, name: impl Into<String>, shape: Shape) -> Self {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = shape,
            None => self.fields.push((name, shape)),
        }
        self.compiled = OnceLock::new();
        self
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&Shape> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, s)| s)
    }

    /// Fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Shape)> {
        self.fields.iter().map(|(n, s)| (n.as_str(), s))
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the object declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render as a JSON Schema object definition.
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for (name, shape) in &self.fields {
            properties.insert(name.clone(), shape.to_json_schema());
            if shape.is_required() {
                required.push(Value::String(name.clone()));
            }
        }

        let mut m = typed("object");
        m.insert("properties".to_string(), Value::Object(properties));
        if !required.is_empty() {
            m.insert("required".to_string(), Value::Array(required));
        }
        m.insert("additionalProperties".to_string(), Value::Bool(false));
        Value::Object(m)
    }

    /// The compiled validator, built on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::ValidatorBuild`] if the rendered schema does
    /// not compile.
    pub fn compiled(&self) -> Result<&CompiledSchema, SchemaError> {
        if let Some(compiled) = self.compiled.get() {
            return Ok(compiled);
        }
        let compiled = CompiledSchema::compile("object", &self.to_json_schema())?;
        Ok(self.compiled.get_or_init(|| compiled))
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ObjectSchema {
    fn clone(&self) -> Self {
        Self {
            fields: self.fields.clone(),
            compiled: OnceLock::new(),
        }
    }
}

impl PartialEq for ObjectSchema {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields
    }
}

impl fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.fields.iter().map(|(n, s)| (n, s)))
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Declarative form
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ShapeDecl {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    default: Option<Value>,
    #[serde(default)]
    format: Option<StringFormat>,
    #[serde(default)]
    min_length: Option<u64>,
    #[serde(default)]
    max_length: Option<u64>,
    #[serde(default)]
    minimum: Option<f64>,
    #[serde(default)]
    maximum: Option<f64>,
    #[serde(default)]
    positive: bool,
    #[serde(default)]
    values: Option<Vec<String>>,
    #[serde(default)]
    items: Option<Box<ShapeDecl>>,
    #[serde(default)]
    fields: Option<FieldDecls>,
}

impl ShapeDecl {
    fn into_shape(self, path: &str) -> Result<Shape, ShapeDeclError> {
        let kind = self.kind.as_str();
        let is_string = kind == "string";
        let is_number = kind == "number" || kind == "integer";

        ensure(is_string || self.format.is_none(), path, "'format' only applies to strings")?;
        ensure(
            is_string || (self.min_length.is_none() && self.max_length.is_none()),
            path,
            "'min_length'/'max_length' only apply to strings",
        )?;
        ensure(
            is_number || (self.minimum.is_none() && self.maximum.is_none() && !self.positive),
            path,
            "'minimum'/'maximum'/'positive' only apply to numbers",
        )?;
        ensure(
            self.minimum.iter().chain(&self.maximum).all(|x| x.is_finite()),
            path,
            "'minimum'/'maximum' must be finite numbers",
        )?;
        ensure(kind == "enum" || self.values.is_none(), path, "'values' only applies to enums")?;
        ensure(kind == "array" || self.items.is_none(), path, "'items' only applies to arrays")?;
        ensure(kind == "object" || self.fields.is_none(), path, "'fields' only applies to objects")?;

        let base = match kind {
            "string" => Shape::String(StringRules {
                min_length: self.min_length,
                max_length: self.max_length,
                format: self.format,
            }),
            "number" | "integer" => Shape::Number(NumberRules {
                integer: kind == "integer",
                minimum: self.minimum,
                maximum: self.maximum,
                positive: self.positive,
            }),
            "boolean" => Shape::Boolean,
            "enum" => match self.values {
                Some(values) if !values.is_empty() => Shape::Enum(values),
                _ => return Err(decl_error(path, "enum declaration needs non-empty 'values'")),
            },
            "array" => match self.items {
                Some(items) => Shape::array(items.into_shape(&format!("{path}.items"))?),
                None => return Err(decl_error(path, "array declaration needs 'items'")),
            },
            "object" => Shape::Object(object_from_decls(self.fields.unwrap_or_default(), path)?),
            "any" => Shape::Any,
            other => return Err(decl_error(path, &format!("unknown type '{other}'"))),
        };

        let shape = if self.optional { base.optional() } else { base };
        Ok(match self.default {
            Some(value) => shape.default(value),
            None => shape,
        })
    }
}

/// Field declarations in document order.
#[derive(Debug, Default)]
struct FieldDecls(Vec<(String, ShapeDecl)>);

impl<'de> Deserialize<'de> for FieldDecls {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldDeclsVisitor;

        impl<'de> Visitor<'de> for FieldDeclsVisitor {
            type Value = FieldDecls;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to shape declarations")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<FieldDecls, A::Error> {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, ShapeDecl>()? {
                    fields.push(entry);
                }
                Ok(FieldDecls(fields))
            }
        }

        deserializer.deserialize_map(FieldDeclsVisitor)
    }
}

fn object_from_decls(decls: FieldDecls, path: &str) -> Result<ObjectSchema, ShapeDeclError> {
    decls.0.into_iter().try_fold(ObjectSchema::new(), |schema, (name, decl)| {
        let shape = decl.into_shape(&format!("{path}.{name}"))?;
        Ok(schema.with_field(name, shape))
    })
}

fn ensure(cond: bool, path: &str, reason: &str) -> Result<(), ShapeDeclError> {
    if cond {
        Ok(())
    } else {
        Err(decl_error(path, reason))
    }
}

fn decl_error(path: &str, reason: &str) -> ShapeDeclError {
    ShapeDeclError {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

impl<'de> Deserialize<'de> for Shape {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ShapeDecl::deserialize(deserializer)?
            .into_shape("$")
            .map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for ObjectSchema {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let decls = FieldDecls::deserialize(deserializer)?;
        object_from_decls(decls, "$").map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn menu_item() -> ObjectSchema {
        ObjectSchema::new()
            .with_field("id", Shape::string().uuid())
            .with_field("name", Shape::string().min_length(1).max_length(100))
            .with_field("description", Shape::string().optional())
            .with_field("price", Shape::number().positive())
            .with_field("categories", Shape::array(Shape::string()))
            .with_field("available", Shape::boolean().default(true))
    }

    #[test]
    fn renders_object_definition() {
        let schema = menu_item().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["additionalProperties"], false);
        assert_eq!(
            schema["required"],
            json!(["id", "name", "price", "categories"])
        );
        assert_eq!(schema["properties"]["id"], json!({ "type": "string", "format": "uuid" }));
        assert_eq!(
            schema["properties"]["name"],
            json!({ "type": "string", "minLength": 1, "maxLength": 100 })
        );
        assert_eq!(
            schema["properties"]["price"],
            json!({ "type": "number", "exclusiveMinimum": 0 })
        );
        assert_eq!(
            schema["properties"]["categories"],
            json!({ "type": "array", "items": { "type": "string" } })
        );
        assert_eq!(
            schema["properties"]["available"],
            json!({ "type": "boolean", "default": true })
        );
    }

    #[test]
    fn empty_object_omits_required() {
        let schema = ObjectSchema::new().to_json_schema();
        assert!(schema.get("required").is_none());
        assert_eq!(schema["properties"], json!({}));
    }

    #[test]
    fn with_field_replaces_existing() {
        let schema = ObjectSchema::new()
            .with_field("a", Shape::string())
            .with_field("a", Shape::boolean());
        assert_eq!(schema.len(), 1);
        assert_eq!(schema.get("a"), Some(&Shape::Boolean));
    }

    #[test]
    fn modifiers_ignore_mismatched_shapes() {
        assert_eq!(Shape::boolean().uuid(), Shape::Boolean);
        assert_eq!(Shape::string().positive(), Shape::string());
    }

    #[test]
    fn whole_number_bounds_render_as_integers() {
        let rendered = Shape::number().minimum(1.0).maximum(2.5).to_json_schema();
        assert_eq!(rendered["minimum"], json!(1));
        assert_eq!(rendered["maximum"], json!(2.5));
    }

    #[test]
    fn integer_and_enum_render() {
        assert_eq!(Shape::integer().to_json_schema(), json!({ "type": "integer" }));
        assert_eq!(
            Shape::enumeration(["draft", "live"]).to_json_schema(),
            json!({ "type": "string", "enum": ["draft", "live"] })
        );
        assert_eq!(Shape::any().to_json_schema(), json!({}));
    }

    #[test]
    fn compiled_validator_is_cached() {
        let schema = menu_item();
        let a = schema.compiled().unwrap() as *const CompiledSchema;
        let b = schema.compiled().unwrap() as *const CompiledSchema;
        assert_eq!(a, b);
    }

    #[test]
    fn clone_compares_equal() {
        let schema = menu_item();
        assert_eq!(schema.clone(), schema);
    }

    #[test]
    fn deserializes_from_yaml() {
        let yaml = r#"
id: { type: string, format: uuid }
name: { type: string, min_length: 1 }
price: { type: number, positive: true }
tags: { type: array, items: { type: string } }
notes: { type: string, optional: true }
available: { type: boolean, default: true }
status: { type: enum, values: [draft, live] }
nutrition:
  type: object
  optional: true
  fields:
    calories: { type: integer, optional: true }
"#;
        let schema: ObjectSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.len(), 8);
        assert_eq!(schema.get("id"), Some(&Shape::string().uuid()));
        assert_eq!(schema.get("price"), Some(&Shape::number().positive()));
        assert_eq!(schema.get("notes"), Some(&Shape::string().optional()));
        assert_eq!(schema.get("available"), Some(&Shape::boolean().default(true)));
        assert_eq!(
            schema.get("nutrition"),
            Some(&Shape::object(ObjectSchema::new().with_field("calories", Shape::integer().optional())).optional())
        );
    }

    #[test]
    fn unknown_type_rejected() {
        let err = serde_yaml::from_str::<ObjectSchema>("a: { type: date }").unwrap_err();
        assert!(err.to_string().contains("unknown type 'date'"));
        assert!(err.to_string().contains("$.a"));
    }

    #[test]
    fn array_without_items_rejected() {
        let err = serde_yaml::from_str::<ObjectSchema>("tags: { type: array }").unwrap_err();
        assert!(err.to_string().contains("needs 'items'"));
    }

    #[test]
    fn misplaced_option_rejected() {
        let err =
            serde_yaml::from_str::<ObjectSchema>("flag: { type: boolean, format: uuid }").unwrap_err();
        assert!(err.to_string().contains("'format' only applies to strings"));
    }

    #[test]
    fn nested_error_path_reported() {
        let err = serde_yaml::from_str::<ObjectSchema>(
            "outer: { type: array, items: { type: object, fields: { x: { type: nope } } } }",
        )
        .unwrap_err();
        assert!(err.to_string().contains("$.outer.items.x"));
    }

    #[test]
    fn declared_field_order_kept() {
        let schema: ObjectSchema =
            serde_yaml::from_str("name: { type: string }\nid: { type: string }").unwrap();
        let names: Vec<&str> = schema.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["name", "id"]);
        assert_eq!(schema.to_json_schema()["required"], json!(["name", "id"]));

        let nested: ObjectSchema = serde_json::from_value(json!({
            "meta": { "type": "object", "fields": { "z": { "type": "string" }, "a": { "type": "string" } } }
        }))
        .unwrap();
        let Some(Shape::Object(meta)) = nested.get("meta") else {
            panic!("expected object shape");
        };
        let names: Vec<&str> = meta.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["z", "a"]);
    }

    #[test]
    fn non_finite_bounds_rejected() {
        let err = serde_yaml::from_str::<ObjectSchema>("rating: { type: number, minimum: .nan }")
            .unwrap_err();
        assert!(err.to_string().contains("must be finite"));
        assert!(serde_yaml::from_str::<ObjectSchema>("rating: { type: number, maximum: .inf }").is_err());
    }

    #[test]
    fn non_finite_builder_bounds_ignored() {
        assert_eq!(Shape::number().minimum(f64::NAN), Shape::number());
        assert_eq!(Shape::number().maximum(f64::INFINITY), Shape::number());
        let schema = ObjectSchema::new().with_field("rating", Shape::number().minimum(f64::NAN).optional());
        assert!(schema.compiled().is_ok());
        assert!(schema.to_json_schema()["properties"]["rating"].get("minimum").is_none());
    }

    #[test]
    fn unknown_key_rejected() {
        assert!(serde_yaml::from_str::<ObjectSchema>("a: { type: string, colour: red }").is_err());
    }
}
