//! # Registration File
//!
//! `themepack register` reads its batch from a YAML or JSON file:
//!
//! ```yaml
//! registrations:
//!   - name: category
//!     loader_location: data/categories.json
//!     schema:
//!       id:   { type: string, format: uuid }
//!       name: { type: string, min_length: 1 }
//!   - name: menuItem
//!     loader_location: data/menu-items.json
//!     schema:
//!       id:         { type: string, format: uuid }
//!       categories: { type: array, items: { type: string, format: uuid } }
//!     ui_schema:
//!       categories:
//!         "ui:field": relationSelect
//!         "ui:options": { isMultiple: true }
//! ```
//!
//! Entries are registered in file order.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use themepack_registry::SchemaRegistration;
use themepack_schema::{ObjectSchema, UiSchema};

/// Top-level registration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationFile {
    /// Content types, in registration order.
    pub registrations: Vec<RegistrationEntry>,
}

/// One content type as declared in the registration file.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrationEntry {
    /// Registration name.
    pub name: String,
    /// Field declarations.
    pub schema: ObjectSchema,
    /// Optional presentation metadata.
    #[serde(default)]
    pub ui_schema: Option<UiSchema>,
    /// Loader file location.
    pub loader_location: String,
}

impl RegistrationEntry {
    /// Convert into a registration for the orchestrator.
    pub fn into_registration(self) -> SchemaRegistration {
        let registration = SchemaRegistration::new(self.name, self.schema, self.loader_location);
        match self.ui_schema {
            Some(ui) => registration.with_ui_schema(ui),
            None => registration,
        }
    }
}

/// Parse registration file text. `extension` selects the format.
pub fn parse_registrations(text: &str, extension: &str) -> Result<RegistrationFile> {
    let file: RegistrationFile = match extension {
        "json" => serde_json::from_str(text).context("invalid JSON registration file")?,
        "yaml" | "yml" => serde_yaml::from_str(text).context("invalid YAML registration file")?,
        other => bail!("unsupported registration file extension '{other}' (expected .yaml, .yml or .json)"),
    };
    Ok(file)
}

/// Load the registrations declared in `path`.
pub fn load_registrations(path: &Path) -> Result<Vec<SchemaRegistration>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read registration file: {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let file = parse_registrations(&text, extension)
        .with_context(|| format!("failed to load {}", path.display()))?;

    tracing::debug!(path = %path.display(), count = file.registrations.len(), "loaded registration file");
    Ok(file
        .registrations
        .into_iter()
        .map(RegistrationEntry::into_registration)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
registrations:
  - name: category
    loader_location: data/categories.json
    schema:
      id: { type: string, format: uuid }
      name: { type: string }
  - name: menuItem
    loader_location: data/menu-items.json
    schema:
      categories: { type: array, items: { type: string } }
    ui_schema:
      categories:
        "ui:field": relationSelect
        "ui:options": { isMultiple: true }
"#;

    #[test]
    fn parses_yaml_in_order() {
        let file = parse_registrations(YAML, "yaml").unwrap();
        let names: Vec<&str> = file.registrations.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["category", "menuItem"]);
        assert!(file.registrations[0].ui_schema.is_none());
        let ui = file.registrations[1].ui_schema.as_ref().unwrap();
        assert_eq!(ui.relation("categories").map(|r| r.multiple), Some(true));
    }

    #[test]
    fn parses_json() {
        let json = r#"{"registrations":[{"name":"page","loader_location":"content/page.md","schema":{"title":{"type":"string"}}}]}"#;
        let file = parse_registrations(json, "json").unwrap();
        assert_eq!(file.registrations[0].loader_location, "content/page.md");
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = parse_registrations(YAML, "toml").unwrap_err();
        assert!(err.to_string().contains("unsupported"));
    }

    #[test]
    fn rejects_bad_shape_declaration() {
        let yaml = "registrations:\n  - name: x\n    loader_location: x.json\n    schema:\n      a: { type: date }\n";
        let err = parse_registrations(yaml, "yml").unwrap_err();
        assert!(format!("{err:#}").contains("unknown type 'date'"));
    }

    #[test]
    fn rejects_non_object_ui_schema() {
        let yaml = "registrations:\n  - name: x\n    loader_location: x.json\n    schema: {}\n    ui_schema: [1]\n";
        assert!(parse_registrations(yaml, "yaml").is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("themepack.yaml");
        std::fs::write(&path, YAML).unwrap();
        let registrations = load_registrations(&path).unwrap();
        assert_eq!(registrations.len(), 2);
        assert!(registrations[1].ui_schema.is_some());
    }

    #[test]
    fn load_missing_file_names_path() {
        let err = load_registrations(Path::new("/nonexistent/themepack.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/themepack.yaml"));
    }
}
