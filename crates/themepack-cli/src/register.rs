//! # Register Subcommand
//!
//! `themepack register [--config themepack.yaml]` runs one registration
//! pass for the batch declared in the registration file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use themepack_core::WorkingDirectoryContext;
use themepack_registry::{register, RegistrationResult};

use crate::config::load_registrations;

/// Arguments for the register subcommand.
#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Registration file (YAML or JSON), relative to the working directory.
    #[arg(short, long, default_value = "themepack.yaml")]
    pub config: PathBuf,
}

/// Execute the register subcommand.
pub fn run_register(args: &RegisterArgs, ctx: &WorkingDirectoryContext) -> Result<u8> {
    let config = ctx.resolve(&args.config);
    let registrations = load_registrations(&config)?;
    let result = register(ctx, &registrations)
        .with_context(|| format!("registration failed for {}", config.display()))?;
    print_summary(&result);
    Ok(0)
}

fn print_summary(result: &RegistrationResult) {
    println!("Generated {} schema(s)", result.generated);
    for loader in &result.loaders {
        println!("  {:<12} {} ({})", loader.outcome, loader.name, loader.path.display());
        if let Some(reason) = &loader.reason {
            for line in reason.lines() {
                println!("               {line}");
            }
        }
    }
    for path in &result.removed_orphans {
        println!("  {:<12} {}", "removed", path.display());
    }
}
