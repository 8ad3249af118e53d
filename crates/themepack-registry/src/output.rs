//! Generated schema and UI schema files.

use std::fs;
use std::path::{Path, PathBuf};

use themepack_core::WorkingDirectoryContext;
use themepack_schema::{PortableSchema, UiSchema};

use crate::error::RegistryError;

/// Create `dir` if needed and delete the files directly inside it.
/// Subdirectories are left alone. Returns the number of files deleted.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] on any failure.
pub fn reset_dir(dir: &Path) -> Result<usize, RegistryError> {
    fs::create_dir_all(dir).map_err(RegistryError::io(dir))?;

    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(RegistryError::io(dir))? {
        let entry = entry.map_err(RegistryError::io(dir))?;
        let path = entry.path();
        if entry.file_type().map_err(RegistryError::io(&path))?.is_file() {
            fs::remove_file(&path).map_err(RegistryError::io(&path))?;
            removed += 1;
        }
    }
    tracing::debug!(dir = %dir.display(), removed, "reset output directory");
    Ok(removed)
}

/// Write `schemas/<name>.json`.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the file cannot be written.
pub fn write_portable_schema(
    ctx: &WorkingDirectoryContext,
    portable: &PortableSchema,
) -> Result<PathBuf, RegistryError> {
    let path = ctx.schema_file(portable.name());
    fs::write(&path, portable.to_json_string()?).map_err(RegistryError::io(&path))?;
    tracing::info!(name = portable.name(), path = %path.display(), "generated schema");
    Ok(path)
}

/// Write `ui_schemas/<name>.ui.json`: the UI metadata verbatim, or `{}`.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the file cannot be written.
pub fn write_ui_schema(
    ctx: &WorkingDirectoryContext,
    name: &str,
    ui: Option<&UiSchema>,
) -> Result<PathBuf, RegistryError> {
    let path = ctx.ui_schema_file(name);
    let json = match ui {
        Some(ui) => serde_json::to_string(ui)?,
        None => "{}".to_string(),
    };
    fs::write(&path, json).map_err(RegistryError::io(&path))?;
    tracing::info!(name, path = %path.display(), "generated ui schema");
    Ok(path)
}
