//! # Loader Location Index
//!
//! The persisted `name → loader location` map (`.loader_locations.json`).
//! Rebuilt from scratch on every registration pass; the previous version is
//! only read for orphan cleanup and by the manifest builder.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;
use crate::registration::SchemaRegistration;

/// Mapping from registration name to loader location as supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoaderLocationIndex(BTreeMap<String, String>);

impl LoaderLocationIndex {
    /// An empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the index for a batch. Later duplicates win.
    pub fn from_registrations(registrations: &[SchemaRegistration]) -> Self {
        Self(
            registrations
                .iter()
                .map(|r| (r.name.clone(), r.loader_location.clone()))
                .collect(),
        )
    }

    /// Record one entry.
    pub fn insert(&mut self, name: impl Into<String>, location: impl Into<String>) {
        self.0.insert(name.into(), location.into());
    }

    /// Loader location for `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Read the index at `path`. `Ok(None)` when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] on read failure and
    /// [`RegistryError::Serialization`] if the file is not a JSON object of
    /// strings.
    pub fn load(path: &Path) -> Result<Option<Self>, RegistryError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(RegistryError::io(path)(e)),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Read the index at `path`, treating a missing or unreadable file as
    /// empty.
    pub fn load_or_empty(path: &Path) -> Self {
        match Self::load(path) {
            Ok(Some(index)) => index,
            Ok(None) => Self::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable loader location index");
                Self::new()
            }
        }
    }

    /// Write the index as compact JSON, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json).map_err(RegistryError::io(path))?;
        tracing::info!(path = %path.display(), entries = self.len(), "saved loader location index");
        Ok(())
    }
}
