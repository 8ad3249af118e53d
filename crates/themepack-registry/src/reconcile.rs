//! # Loader Reconciliation
//!
//! Keeps each registration's loader file in step with its schema:
//!
//! | On disk                         | Outcome        | Result            |
//! |---------------------------------|----------------|-------------------|
//! | absent                          | `Created`      | default written   |
//! | present, conforms               | `Preserved`    | untouched         |
//! | present, invalid or unreadable  | `Overwritten`  | default written   |
//!
//! A `.json` location holds an array of items (or a single object, checked
//! as-is); any other location holds one raw string value. Defaults are `[]`
//! and the empty string respectively, and content equal to the default is
//! always accepted.
//!
//! Orphan cleanup runs before reconciliation and removes loader files that
//! the new batch no longer references.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use themepack_core::{normalize, WorkingDirectoryContext};
use themepack_schema::{SchemaDescriptor, SchemaError};

use crate::error::RegistryError;
use crate::location_index::LoaderLocationIndex;
use crate::registration::SchemaRegistration;

/// How a loader file's content is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderFormat {
    /// `.json`: an array of items, or a single object.
    Json,
    /// Anything else: the whole file is one string value.
    Raw,
}

impl LoaderFormat {
    /// Format implied by the path's extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => LoaderFormat::Json,
            _ => LoaderFormat::Raw,
        }
    }

    /// Content written for a new or invalid loader file.
    pub fn default_content(&self) -> &'static str {
        match self {
            LoaderFormat::Json => "[]",
            LoaderFormat::Raw => "",
        }
    }
}

/// What reconciliation did to one loader file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileOutcome {
    /// No file existed; the default was written.
    Created,
    /// The existing file conformed and was left untouched.
    Preserved,
    /// The existing file was invalid or unreadable; the default was written.
    Overwritten,
}

impl std::fmt::Display for ReconcileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            ReconcileOutcome::Created => "created",
            ReconcileOutcome::Preserved => "preserved",
            ReconcileOutcome::Overwritten => "overwritten",
        })
    }
}

/// Why existing loader content was rejected.
#[derive(Error, Debug)]
pub enum LoaderContentError {
    /// The file exists but could not be read.
    #[error("unreadable: {0}")]
    Unreadable(#[from] io::Error),

    /// `.json` content did not parse.
    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Content parsed but does not conform to the schema.
    #[error("does not conform to schema:\n{0}")]
    Nonconforming(#[from] SchemaError),
}

/// Per-registration reconciliation result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderReport {
    /// Registration name.
    pub name: String,
    /// Resolved absolute loader path.
    pub path: PathBuf,
    /// What happened.
    pub outcome: ReconcileOutcome,
    /// Why existing content was discarded, for `Overwritten`.
    pub reason: Option<String>,
}

/// Check loader `content` against `schema` under `format`.
///
/// # Errors
///
/// Returns the first problem found. Array items are checked in order and
/// the violations of the first failing item carry its index.
pub fn validate_content(
    schema: &dyn SchemaDescriptor,
    format: LoaderFormat,
    content: &str,
) -> Result<(), LoaderContentError> {
    if content == format.default_content() {
        return Ok(());
    }
    match format {
        LoaderFormat::Json => match serde_json::from_str::<Value>(content)? {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    schema.validate(item).map_err(|e| match e {
                        SchemaError::ValidationFailed(v) => {
                            SchemaError::ValidationFailed(v.at_index(index))
                        }
                        other => other,
                    })?;
                }
                Ok(())
            }
            single => Ok(schema.validate(&single)?),
        },
        LoaderFormat::Raw => Ok(schema.validate(&Value::String(content.to_string()))?),
    }
}

/// Ensure the loader file for `registration` exists and conforms.
///
/// # Errors
///
/// Returns [`RegistryError::Io`] if the parent directory cannot be created
/// or the default content cannot be written, and [`RegistryError::Schema`]
/// if the schema's validator cannot be built; the file is left untouched
/// then. Read failures and invalid content are not errors.
pub fn reconcile(
    ctx: &WorkingDirectoryContext,
    registration: &SchemaRegistration,
) -> Result<LoaderReport, RegistryError> {
    let name = registration.name.as_str();
    let path = ctx.resolve(&registration.loader_location);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(RegistryError::io(parent))?;
    }
    let format = LoaderFormat::from_path(&path);

    let (outcome, reason) = if !path.exists() {
        write_default(&path, format)?;
        tracing::info!(name, path = %path.display(), "created loader file");
        (ReconcileOutcome::Created, None)
    } else {
        let checked = fs::read_to_string(&path)
            .map_err(LoaderContentError::from)
            .and_then(|content| validate_content(registration.schema(), format, &content));
        match checked {
            Ok(()) => {
                tracing::info!(name, path = %path.display(), "preserved loader file");
                (ReconcileOutcome::Preserved, None)
            }
            Err(LoaderContentError::Nonconforming(source @ SchemaError::ValidatorBuild { .. })) => {
                return Err(RegistryError::Schema {
                    schema_name: name.to_string(),
                    source,
                });
            }
            Err(e) => {
                tracing::warn!(name, path = %path.display(), error = %e, "invalid loader file, resetting to default");
                write_default(&path, format)?;
                (ReconcileOutcome::Overwritten, Some(e.to_string()))
            }
        }
    };

    Ok(LoaderReport {
        name: name.to_string(),
        path,
        outcome,
        reason,
    })
}

fn write_default(path: &Path, format: LoaderFormat) -> Result<(), RegistryError> {
    fs::write(path, format.default_content()).map_err(RegistryError::io(path))
}

/// Delete loader files the new batch no longer references, then delete the
/// old index. Returns the paths removed.
///
/// Removed are: every file named by the previous index but not by the
/// batch, and every other file directly inside a directory that holds one
/// of the batch's loader files. The working-directory root and the schema
/// and UI schema output directories are never scanned. Directories are never removed. Failures are logged and
/// skipped.
pub fn remove_orphans(
    ctx: &WorkingDirectoryContext,
    registrations: &[SchemaRegistration],
) -> Vec<PathBuf> {
    let index_path = ctx.index_path();
    let previous = LoaderLocationIndex::load_or_empty(&index_path);
    let referenced: BTreeSet<PathBuf> = registrations
        .iter()
        .map(|r| ctx.resolve(&r.loader_location))
        .collect();

    let mut removed = Vec::new();
    for (name, location) in previous.iter() {
        let path = ctx.resolve(location);
        if !referenced.contains(&path) && remove_file_logged(&path) {
            tracing::debug!(name, "loader no longer registered");
            removed.push(path);
        }
    }

    let unscanned = [ctx.root().to_path_buf(), ctx.schemas_dir(), ctx.ui_schemas_dir()];
    let loader_dirs: BTreeSet<&Path> = referenced.iter().filter_map(|p| p.parent()).collect();
    for dir in loader_dirs {
        if unscanned.iter().any(|skip| skip == dir) {
            tracing::debug!(dir = %dir.display(), "not scanning root or generated directory");
            continue;
        }
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot scan loader directory");
                continue;
            }
        };
        for entry in entries.flatten() {
            let is_file = entry.file_type().map(|t| t.is_file()).unwrap_or(false);
            let path = normalize(&entry.path());
            if is_file && !referenced.contains(&path) && remove_file_logged(&path) {
                removed.push(path);
            }
        }
    }

    match fs::remove_file(&index_path) {
        Ok(()) => tracing::debug!(path = %index_path.display(), "removed previous loader location index"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::warn!(path = %index_path.display(), error = %e, "cannot remove previous loader location index")
        }
    }

    removed
}

fn remove_file_logged(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "removed orphaned loader file");
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "cannot remove orphaned loader file");
            false
        }
    }
}
