//! # Build-Theme Subcommand
//!
//! `themepack build-theme -d <description> -a <author>` assembles the
//! manifest from the last registration pass and writes the theme archive.

use std::path::PathBuf;

use anyhow::{ensure, Result};
use clap::Args;

use themepack_core::{ThemeMetadata, Timestamp, WorkingDirectoryContext};
use themepack_registry::build_manifest;

use crate::archive::{write_theme_archive, ArchiveSummary};

/// Fallback theme name when the working directory has no final component.
const FALLBACK_THEME_NAME: &str = "theme";

/// Arguments for the build-theme subcommand.
#[derive(Args, Debug)]
pub struct BuildThemeArgs {
    /// Output zip file name; `.zip` is appended when missing.
    #[arg(short, long, default_value = "theme.zip")]
    pub output: String,

    /// Theme name for the manifest [default: working directory name].
    #[arg(short, long)]
    pub name: Option<String>,

    /// Theme version for the manifest.
    #[arg(long, default_value = "1.0.0")]
    pub theme_version: String,

    /// Theme description for the manifest.
    #[arg(short, long)]
    pub description: String,

    /// Theme author for the manifest.
    #[arg(short, long)]
    pub author: String,
}

/// Append `.zip` unless already present.
pub fn output_file_name(output: &str) -> String {
    if output.ends_with(".zip") {
        output.to_string()
    } else {
        format!("{output}.zip")
    }
}

impl BuildThemeArgs {
    /// Manifest metadata, defaulting the name to the working directory's.
    pub fn metadata(&self, ctx: &WorkingDirectoryContext) -> Result<ThemeMetadata> {
        ensure!(!self.description.trim().is_empty(), "theme description is required");
        ensure!(!self.author.trim().is_empty(), "theme author is required");

        let name = match &self.name {
            Some(name) => name.clone(),
            None => ctx
                .root()
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| FALLBACK_THEME_NAME.to_string()),
        };
        ensure!(!name.trim().is_empty(), "theme name is required");

        Ok(ThemeMetadata {
            name,
            version: self.theme_version.clone(),
            description: self.description.clone(),
            author: self.author.clone(),
        })
    }

    /// Absolute archive path.
    pub fn output_path(&self, ctx: &WorkingDirectoryContext) -> PathBuf {
        ctx.resolve(output_file_name(&self.output))
    }
}

/// Build the manifest and archive for `ctx`.
pub fn build_theme(args: &BuildThemeArgs, ctx: &WorkingDirectoryContext) -> Result<ArchiveSummary> {
    let metadata = args.metadata(ctx)?;
    let manifest = build_manifest(ctx, metadata, Timestamp::now())?;
    write_theme_archive(ctx, &manifest, &args.output_path(ctx))
}

/// Execute the build-theme subcommand.
pub fn run_build_theme(args: &BuildThemeArgs, ctx: &WorkingDirectoryContext) -> Result<u8> {
    let summary = build_theme(args, ctx)?;
    println!("Theme zip file created: {}", summary.path.display());
    println!("  Entries:    {}", summary.entries);
    println!("  Total size: {:.2} MB", summary.bytes as f64 / 1024.0 / 1024.0);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> BuildThemeArgs {
        BuildThemeArgs {
            output: "theme".to_string(),
            name: None,
            theme_version: "1.0.0".to_string(),
            description: "Restaurant theme".to_string(),
            author: "Kai".to_string(),
        }
    }

    #[test]
    fn zip_suffix_appended_once() {
        assert_eq!(output_file_name("theme"), "theme.zip");
        assert_eq!(output_file_name("theme.zip"), "theme.zip");
        assert_eq!(output_file_name("dist/bistro"), "dist/bistro.zip");
    }

    #[test]
    fn name_defaults_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("bistro-theme");
        std::fs::create_dir(&root).unwrap();
        let ctx = WorkingDirectoryContext::new(&root).unwrap();
        assert_eq!(args().metadata(&ctx).unwrap().name, "bistro-theme");
        assert_eq!(args().output_path(&ctx), root.join("theme.zip"));
    }

    #[test]
    fn explicit_name_wins() {
        let ctx = WorkingDirectoryContext::new("/srv/site").unwrap();
        let mut a = args();
        a.name = Some("bistro".to_string());
        assert_eq!(a.metadata(&ctx).unwrap().name, "bistro");
    }

    #[test]
    fn blank_description_rejected() {
        let ctx = WorkingDirectoryContext::new("/srv/site").unwrap();
        let mut a = args();
        a.description = "  ".to_string();
        assert!(a.metadata(&ctx).unwrap_err().to_string().contains("description"));
    }

    #[test]
    fn blank_author_rejected() {
        let ctx = WorkingDirectoryContext::new("/srv/site").unwrap();
        let mut a = args();
        a.author = String::new();
        assert!(a.metadata(&ctx).is_err());
    }
}
