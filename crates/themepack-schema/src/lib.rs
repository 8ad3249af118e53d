//! # themepack-schema: Content Type Schemas
//!
//! Everything the registration pass needs to know about a schema without
//! touching the filesystem.
//!
//! - [`shape`]: the typed shape language ([`Shape`], [`ObjectSchema`]),
//!   buildable in code or deserializable from YAML/JSON.
//! - [`descriptor`]: the [`SchemaDescriptor`] / [`FieldDescriptor`] seam:
//!   enumerate fields, check optionality and arrayness, render, validate.
//! - [`ui`]: [`UiSchema`] presentation metadata and relation detection.
//! - [`consistency`]: relation cardinality must match `isMultiple`.
//! - [`convert`]: the root-referenced [`PortableSchema`] document with
//!   relation fields relaxed.
//! - [`validate`]: compiled JSON Schema validation with structured
//!   [`Violation`]s.
//!
//! ## Crate Policy
//!
//! - Pure: no file I/O.
//! - No `unsafe` code.
//! - No `.unwrap()` outside tests.

pub mod consistency;
pub mod convert;
pub mod descriptor;
pub mod error;
pub mod shape;
pub mod ui;
pub mod validate;

pub use consistency::check_consistency;
pub use convert::{convert, relax_relation_fields, PortableSchema, PORTABLE_SCHEMA_DIALECT};
pub use descriptor::{FieldDescriptor, SchemaDescriptor};
pub use error::{Cardinality, ConsistencyError, SchemaError, ShapeDeclError};
pub use shape::{NumberRules, ObjectSchema, Shape, StringFormat, StringRules};
pub use ui::{Relation, UiSchema, UiSchemaError, RELATION_SELECT};
pub use validate::{CompiledSchema, ValidationViolations, Violation};
