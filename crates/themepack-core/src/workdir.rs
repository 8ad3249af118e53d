//! # Working-Directory Context
//!
//! Every path the registration pass touches is derived from a
//! [`WorkingDirectoryContext`]: the project root plus the names of the
//! schema output directory, the UI schema output directory, and the loader
//! location index file. Library code never consults the process-wide
//! current directory; the binary resolves it once and passes it in.
//!
//! ```text
//! <root>/
//! ├── schemas/<name>.json
//! ├── ui_schemas/<name>.ui.json
//! └── .loader_locations.json
//! ```

use std::path::{Component, Path, PathBuf};

use crate::error::ThemepackError;

/// Default schema output directory name.
pub const DEFAULT_SCHEMAS_DIR: &str = "schemas";
/// Default UI schema output directory name.
pub const DEFAULT_UI_SCHEMAS_DIR: &str = "ui_schemas";
/// Default loader location index file name.
pub const DEFAULT_INDEX_FILE: &str = ".loader_locations.json";

/// Explicit replacement for "the current directory".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDirectoryContext {
    root: PathBuf,
    schemas_dir: String,
    ui_schemas_dir: String,
    index_file: String,
}

impl WorkingDirectoryContext {
    /// Create a context rooted at `root` with the default layout.
    ///
    /// # Errors
    ///
    /// Returns [`ThemepackError::InvalidPath`] if `root` is not absolute.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, ThemepackError> {
        let root = root.into();
        if !root.is_absolute() {
            return Err(ThemepackError::InvalidPath {
                path: root.display().to_string(),
                reason: "working directory root must be absolute".to_string(),
            });
        }
        Ok(Self {
            root: normalize(&root),
            schemas_dir: DEFAULT_SCHEMAS_DIR.to_string(),
            ui_schemas_dir: DEFAULT_UI_SCHEMAS_DIR.to_string(),
            index_file: DEFAULT_INDEX_FILE.to_string(),
        })
    }

    /// Override the schema output directory name.
    pub fn with_schemas_dir(mut self, name: impl Into<String>) -> Self {
        self.schemas_dir = name.into();
        self
    }

    /// Override the UI schema output directory name.
    pub fn with_ui_schemas_dir(mut self, name: impl Into<String>) -> Self {
        self.ui_schemas_dir = name.into();
        self
    }

    /// Override the loader location index file name.
    pub fn with_index_file(mut self, name: impl Into<String>) -> Self {
        self.index_file = name.into();
        self
    }

    /// The project root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Name of the schema output directory, relative to the root.
    pub fn schemas_dir_name(&self) -> &str {
        &self.schemas_dir
    }

    /// Name of the UI schema output directory, relative to the root.
    pub fn ui_schemas_dir_name(&self) -> &str {
        &self.ui_schemas_dir
    }

    /// Absolute schema output directory.
    pub fn schemas_dir(&self) -> PathBuf {
        self.root.join(&self.schemas_dir)
    }

    /// Absolute UI schema output directory.
    pub fn ui_schemas_dir(&self) -> PathBuf {
        self.root.join(&self.ui_schemas_dir)
    }

    /// Path of the portable schema file for `name`.
    pub fn schema_file(&self, name: &str) -> PathBuf {
        self.schemas_dir().join(format!("{name}.json"))
    }

    /// Path of the UI schema file for `name`.
    pub fn ui_schema_file(&self, name: &str) -> PathBuf {
        self.ui_schemas_dir().join(format!("{name}.ui.json"))
    }

    /// Path of the loader location index.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index_file)
    }

    /// Resolve a caller-supplied location to an absolute, lexically
    /// normalized path. Absolute inputs are kept; relative ones are joined
    /// onto the root.
    pub fn resolve(&self, location: impl AsRef<Path>) -> PathBuf {
        let location = location.as_ref();
        if location.is_absolute() {
            normalize(location)
        } else {
            normalize(&self.root.join(location))
        }
    }
}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// `..` at the root stays at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                ) && out.pop();
                if !popped && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> WorkingDirectoryContext {
        let dir = std::env::temp_dir().join("themepack-workdir-test");
        WorkingDirectoryContext::new(dir).unwrap()
    }

    #[test]
    fn relative_root_rejected() {
        let err = WorkingDirectoryContext::new("relative/dir").unwrap_err();
        assert!(matches!(err, ThemepackError::InvalidPath { .. }));
    }

    #[test]
    fn default_layout() {
        let ctx = ctx();
        assert_eq!(ctx.schemas_dir(), ctx.root().join("schemas"));
        assert_eq!(ctx.ui_schemas_dir(), ctx.root().join("ui_schemas"));
        assert_eq!(ctx.index_path(), ctx.root().join(".loader_locations.json"));
        assert_eq!(
            ctx.schema_file("category"),
            ctx.root().join("schemas").join("category.json")
        );
        assert_eq!(
            ctx.ui_schema_file("category"),
            ctx.root().join("ui_schemas").join("category.ui.json")
        );
    }

    #[test]
    fn overridden_layout() {
        let ctx = ctx()
            .with_schemas_dir("out/schemas")
            .with_ui_schemas_dir("out/ui")
            .with_index_file("index.json");
        assert_eq!(ctx.schemas_dir(), ctx.root().join("out/schemas"));
        assert_eq!(ctx.ui_schema_file("a"), ctx.root().join("out/ui/a.ui.json"));
        assert_eq!(ctx.index_path(), ctx.root().join("index.json"));
    }

    #[test]
    fn resolve_relative_joins_root() {
        let ctx = ctx();
        assert_eq!(
            ctx.resolve("data/categories.json"),
            ctx.root().join("data").join("categories.json")
        );
    }

    #[test]
    fn resolve_normalizes_dot_segments() {
        let ctx = ctx();
        assert_eq!(ctx.resolve("./data/../data/a.json"), ctx.resolve("data/a.json"));
    }

    #[test]
    fn resolve_absolute_kept() {
        let ctx = ctx();
        let abs = std::env::temp_dir().join("elsewhere").join("x.json");
        assert_eq!(ctx.resolve(&abs), normalize(&abs));
    }

    #[test]
    fn normalize_parent_at_root_stays_at_root() {
        let root = std::env::temp_dir();
        let anchor: PathBuf = root.components().take(1).collect();
        let p = anchor.join("..").join("a");
        assert_eq!(normalize(&p), anchor.join("a"));
    }

    #[test]
    fn normalize_relative_keeps_leading_parents() {
        assert_eq!(normalize(Path::new("../a/./b/..")), PathBuf::from("../a"));
    }
}
