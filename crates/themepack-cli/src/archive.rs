//! # Theme Archive
//!
//! Writes the distributable zip (Deflate, level 9):
//!
//! ```text
//! theme.zip
//! ├── schemas/<name>.json     (or schemas/.gitkeep when there are none)
//! ├── manifest.json
//! └── <project files>         (everything else not excluded)
//! ```
//!
//! Project files are matched against [`DEFAULT_EXCLUDES`] plus
//! `<schemas dir>/**` using root-relative, `/`-separated paths. As with
//! shell globs, `*` does not cross a `/`, so `*.log` only excludes
//! top-level log files.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use themepack_core::{normalize, ThemeManifest, WorkingDirectoryContext};
use themepack_registry::schema_names;

/// Project paths never copied into the archive.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "node_modules/**",
    "dist/**",
    ".git/**",
    ".gitignore",
    ".vscode/**",
    "*.zip",
    ".DS_Store",
    "*.log",
    "npm-debug.log*",
    "yarn-debug.log*",
    "yarn-error.log*",
    ".env",
    ".env.*",
    "coverage/**",
    ".nyc_output/**",
    ".astro/**",
    "target/**",
];

/// Archive entry name of the manifest.
pub const MANIFEST_ENTRY: &str = "manifest.json";

/// What was written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    /// Archive path.
    pub path: PathBuf,
    /// Entries written, including schemas and the manifest.
    pub entries: usize,
    /// Archive size in bytes.
    pub bytes: u64,
}

/// Compile exclusion globs with `/`-aware `*`.
pub fn compile_excludes<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let glob = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid exclude glob: {pattern:?}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

/// The exclusion set for `ctx`: the defaults plus its schema directory.
pub fn default_excludes(ctx: &WorkingDirectoryContext) -> Result<GlobSet> {
    let mut patterns: Vec<String> = DEFAULT_EXCLUDES.iter().map(|p| p.to_string()).collect();
    patterns.push(format!("{}/**", ctx.schemas_dir_name()));
    compile_excludes(&patterns)
}

/// Root-relative project files to archive, sorted, as
/// `(entry name, absolute path)`.
///
/// Excluded directories are not descended into. `skip` (the archive being
/// written) and a top-level `manifest.json` are left out.
pub fn project_files(root: &Path, excludes: &GlobSet, skip: &Path) -> Result<Vec<(String, PathBuf)>> {
    let skip = normalize(skip);
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            // A directory is pruned when anything inside it would be excluded.
            !excludes.is_match(format!("{}/_", relative_name(root, entry.path())))
        });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("walk project: {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = relative_name(root, entry.path());
        if name == MANIFEST_ENTRY || excludes.is_match(&name) || normalize(entry.path()) == skip {
            tracing::trace!(entry = %name, "excluded");
            continue;
        }
        files.push((name, entry.into_path()));
    }
    Ok(files)
}

fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.to_string_lossy().replace('\\', "/")
}

/// Write the theme archive for `ctx` to `output`.
pub fn write_theme_archive(
    ctx: &WorkingDirectoryContext,
    manifest: &ThemeManifest,
    output: &Path,
) -> Result<ArchiveSummary> {
    let excludes = default_excludes(ctx)?;
    let project = project_files(ctx.root(), &excludes, output)?;

    let file = File::create(output)
        .with_context(|| format!("failed to create archive: {}", output.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(9));
    let mut entries = 0;

    let schemas_dir = ctx.schemas_dir_name();
    if ctx.schemas_dir().is_dir() {
        for name in schema_names(ctx)? {
            let entry = format!("{schemas_dir}/{name}.json");
            let source = ctx.schema_file(&name);
            let bytes = fs::read(&source)
                .with_context(|| format!("failed to read schema: {}", source.display()))?;
            zip.start_file(entry.as_str(), options)?;
            zip.write_all(&bytes)?;
            tracing::info!(entry = %entry, "added schema");
            entries += 1;
        }
    } else {
        tracing::warn!(dir = %ctx.schemas_dir().display(), "schemas directory not found, no schemas will be included");
        zip.start_file(format!("{schemas_dir}/.gitkeep"), options)?;
        entries += 1;
    }

    zip.start_file(MANIFEST_ENTRY, options)?;
    zip.write_all(serde_json::to_string(manifest)?.as_bytes())?;
    entries += 1;

    for (name, source) in &project {
        let bytes = fs::read(source)
            .with_context(|| format!("failed to read project file: {}", source.display()))?;
        zip.start_file(name.as_str(), options)?;
        zip.write_all(&bytes)?;
        tracing::debug!(entry = %name, "added project file");
        entries += 1;
    }

    let file = zip
        .finish()
        .with_context(|| format!("failed to finalize archive: {}", output.display()))?;
    let bytes = file.metadata()?.len();

    tracing::info!(path = %output.display(), entries, bytes, "wrote theme archive");
    Ok(ArchiveSummary {
        path: output.to_path_buf(),
        entries,
        bytes,
    })
}
