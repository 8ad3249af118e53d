//! # Theme Manifest Types
//!
//! The manifest is the consumer-facing description of a theme archive.
//! It lists every registered content type together with the archive-relative
//! paths of its schema, UI schema, and loader file.
//!
//! ```text
//! ThemeManifest
//! ├── name / version / description / author
//! ├── createdAt (Timestamp, UTC)
//! └── contentTypes[]
//!     └── name / schemaPath / uiSchemaPath / loaderLocationPath
//! ```

use serde::{Deserialize, Serialize};

use crate::temporal::Timestamp;

/// Author-supplied theme metadata, copied verbatim into the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeMetadata {
    /// Theme name.
    pub name: String,
    /// Theme version (free-form, usually semver).
    pub version: String,
    /// Human-readable description.
    pub description: String,
    /// Theme author.
    pub author: String,
}

/// One registered content type as listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentType {
    /// Registration name.
    pub name: String,
    /// Archive-relative path of the portable schema.
    pub schema_path: String,
    /// Archive-relative path of the UI schema.
    pub ui_schema_path: String,
    /// Loader location as recorded in the location index.
    pub loader_location_path: String,
}

/// The `manifest.json` document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeManifest {
    /// Theme name.
    pub name: String,
    /// Theme version.
    pub version: String,
    /// Human-readable description.
    pub description: String,
    /// Theme author.
    pub author: String,
    /// Build time.
    pub created_at: Timestamp,
    /// Content types in name order.
    pub content_types: Vec<ContentType>,
}

impl ThemeManifest {
    /// Assemble a manifest from metadata and content types.
    pub fn new(metadata: ThemeMetadata, created_at: Timestamp, content_types: Vec<ContentType>) -> Self {
        Self {
            name: metadata.name,
            version: metadata.version,
            description: metadata.description,
            author: metadata.author,
            created_at,
            content_types,
        }
    }
}
