//! # Manifest Assembly
//!
//! Builds the [`ThemeManifest`] from what a registration pass left on disk:
//! every `<schemas>/*.json` file (sorted by name), its UI schema path, and
//! its loader location from the index.

use std::fs;
use std::io;

use themepack_core::{ContentType, ThemeManifest, ThemeMetadata, Timestamp, WorkingDirectoryContext};

use crate::error::RegistryError;
use crate::location_index::LoaderLocationIndex;

/// Names of the generated schemas, sorted. Empty when the schema directory
/// does not exist.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the directory exists but cannot be read.
pub fn schema_names(ctx: &WorkingDirectoryContext) -> Result<Vec<String>, RegistryError> {
    let dir = ctx.schemas_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(RegistryError::io(&dir)(e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        let path = entry.map_err(RegistryError::io(&dir))?.path();
        if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
            names.push(stem.to_string());
        }
    }
    names.sort();
    Ok(names)
}

/// Assemble the manifest for the current on-disk state.
///
/// A missing or unreadable index yields empty `loaderLocationPath`s.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the schema directory cannot be listed.
pub fn build_manifest(
    ctx: &WorkingDirectoryContext,
    metadata: ThemeMetadata,
    created_at: Timestamp,
) -> Result<ThemeManifest, RegistryError> {
    let index = LoaderLocationIndex::load_or_empty(&ctx.index_path());
    let content_types = schema_names(ctx)?
        .into_iter()
        .map(|name| ContentType {
            schema_path: format!("{}/{name}.json", ctx.schemas_dir_name()),
            ui_schema_path: format!("{}/{name}.ui.json", ctx.ui_schemas_dir_name()),
            loader_location_path: index.get(&name).unwrap_or_default().to_string(),
            name,
        })
        .collect::<Vec<_>>();

    tracing::debug!(content_types = content_types.len(), "assembled manifest");
    Ok(ThemeManifest::new(metadata, created_at, content_types))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> ThemeMetadata {
        ThemeMetadata {
            name: "bistro".to_string(),
            version: "1.0.0".to_string(),
            description: "Restaurant theme".to_string(),
            author: "Kai".to_string(),
        }
    }

    #[test]
    fn lists_schemas_sorted_with_locations() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = WorkingDirectoryContext::new(dir.path()).unwrap();
        fs::create_dir_all(ctx.schemas_dir()).unwrap();
        fs::write(ctx.schema_file("menuItem"), "{}").unwrap();
        fs::write(ctx.schema_file("category"), "{}").unwrap();
        fs::write(ctx.schemas_dir().join("notes.txt"), "").unwrap();
        let mut index = LoaderLocationIndex::new();
        index.insert("category", "data/categories.json");
        index.save(&ctx.index_path()).unwrap();

        let created = Timestamp::parse("2026-01-15T12:00:00Z").unwrap();
        let manifest = build_manifest(&ctx, metadata(), created).unwrap();

        assert_eq!(manifest.name, "bistro");
        assert_eq!(manifest.created_at, created);
        let names: Vec<&str> = manifest.content_types.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["category", "menuItem"]);
        assert_eq!(manifest.content_types[0].schema_path, "schemas/category.json");
        assert_eq!(manifest.content_types[0].ui_schema_path, "ui_schemas/category.ui.json");
        assert_eq!(manifest.content_types[0].loader_location_path, "data/categories.json");
        assert_eq!(manifest.content_types[1].loader_location_path, "");
    }

    #[test]
    fn missing_schema_dir_gives_empty_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = WorkingDirectoryContext::new(dir.path()).unwrap();
        let manifest = build_manifest(&ctx, metadata(), Timestamp::now()).unwrap();
        assert!(manifest.content_types.is_empty());
    }
}
