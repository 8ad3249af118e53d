//! # themepack-cli: Theme Packaging CLI
//!
//! Provides the `themepack` command-line interface.
//!
//! ## Subcommands
//!
//! - `themepack register`: run a registration pass from a registration
//!   file: generate `schemas/` and `ui_schemas/`, reconcile loader files,
//!   write `.loader_locations.json`.
//! - `themepack build-theme`: assemble `manifest.json` and zip the project
//!   into the distributable theme archive.
//!
//! ```bash
//! themepack register --config themepack.yaml
//! themepack build-theme -d "Restaurant theme" -a "Kai" -o bistro
//! themepack -vv --dir ./site register
//! ```

pub mod archive;
pub mod build_theme;
pub mod config;
pub mod register;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use themepack_core::WorkingDirectoryContext;

/// Build the working-directory context from `--dir` (relative to `cwd`)
/// or `cwd` itself.
pub fn resolve_context(dir: Option<&Path>, cwd: &Path) -> Result<WorkingDirectoryContext> {
    let root: PathBuf = match dir {
        Some(dir) if dir.is_absolute() => dir.to_path_buf(),
        Some(dir) => cwd.join(dir),
        None => cwd.to_path_buf(),
    };
    WorkingDirectoryContext::new(&root)
        .with_context(|| format!("invalid working directory: {}", root.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_defaults_to_cwd() {
        let ctx = resolve_context(None, Path::new("/srv/site")).unwrap();
        assert_eq!(ctx.root(), Path::new("/srv/site"));
    }

    #[test]
    fn relative_dir_joined_onto_cwd() {
        let ctx = resolve_context(Some(Path::new("../other")), Path::new("/srv/site")).unwrap();
        assert_eq!(ctx.root(), Path::new("/srv/other"));
    }

    #[test]
    fn absolute_dir_used_as_is() {
        let ctx = resolve_context(Some(Path::new("/opt/theme")), Path::new("/srv/site")).unwrap();
        assert_eq!(ctx.root(), Path::new("/opt/theme"));
    }

    #[test]
    fn relative_cwd_rejected() {
        assert!(resolve_context(None, Path::new("site")).is_err());
    }
}
