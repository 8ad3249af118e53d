//! # themepack CLI entry point
//!
//! Parses command-line arguments, initializes logging, resolves the working
//! directory once, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use themepack_cli::build_theme::{run_build_theme, BuildThemeArgs};
use themepack_cli::register::{run_register, RegisterArgs};
use themepack_cli::resolve_context;

/// themepack: package content-type schemas into a theme archive.
///
/// Registers typed content schemas (generating JSON Schema and UI schema
/// files and reconciling their loader data files), then builds the
/// distributable theme zip with its manifest.
#[derive(Parser, Debug)]
#[command(name = "themepack", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Project directory [default: current directory].
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate schemas and reconcile loader files from a registration file.
    Register(RegisterArgs),

    /// Build a theme zip file with schemas and manifest.
    BuildTheme(BuildThemeArgs),
}

fn log_filter(verbose: u8) -> EnvFilter {
    match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose))
        .with_target(false)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "themepack starting");

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| resolve_context(cli.dir.as_deref(), &cwd))
        .and_then(|ctx| {
            tracing::debug!(root = %ctx.root().display(), "resolved working directory");
            match &cli.command {
                Commands::Register(args) => run_register(args, &ctx),
                Commands::BuildTheme(args) => run_build_theme(args, &ctx),
            }
        });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
