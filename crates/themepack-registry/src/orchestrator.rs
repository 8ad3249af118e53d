//! # Registration Pass
//!
//! [`register`] runs one complete pass over a batch:
//!
//! 1. name, validator and relation consistency checks (nothing written on
//!    failure)
//! 2. reset of the schema and UI schema output directories
//! 3. conversion and writing of each schema and UI schema
//! 4. orphan cleanup, then loader reconciliation per registration
//! 5. persistence of the rebuilt loader location index
//!
//! There is no rollback: if step 4 or 5 fails, the files from step 3 stay.

use std::path::PathBuf;

use themepack_core::WorkingDirectoryContext;
use themepack_schema::{check_consistency, convert};

use crate::error::RegistryError;
use crate::location_index::LoaderLocationIndex;
use crate::output;
use crate::reconcile::{reconcile, remove_orphans, LoaderReport};
use crate::registration::SchemaRegistration;

/// Summary of a registration pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationResult {
    /// Number of portable schemas generated.
    pub generated: usize,
    /// One report per registration, in batch order.
    pub loaders: Vec<LoaderReport>,
    /// Orphaned loader files deleted.
    pub removed_orphans: Vec<PathBuf>,
}

/// Register `registrations` against the working directory `ctx`.
///
/// # Errors
///
/// - [`RegistryError::InvalidName`], [`RegistryError::Schema`] or
///   [`RegistryError::Consistency`] before anything is written.
/// - [`RegistryError::Io`] / [`RegistryError::Serialization`] from output,
///   reconciliation writes, or index persistence.
pub fn register(
    ctx: &WorkingDirectoryContext,
    registrations: &[SchemaRegistration],
) -> Result<RegistrationResult, RegistryError> {
    for registration in registrations {
        registration.check_name()?;
        registration
            .schema()
            .check()
            .map_err(|source| RegistryError::Schema {
                schema_name: registration.name.clone(),
                source,
            })?;
        check_consistency(
            registration.schema(),
            registration.ui_schema.as_ref(),
            &registration.name,
        )?;
    }

    output::reset_dir(&ctx.schemas_dir())?;
    output::reset_dir(&ctx.ui_schemas_dir())?;

    let mut generated = 0;
    for registration in registrations {
        let portable = convert(
            registration.schema(),
            registration.ui_schema.as_ref(),
            &registration.name,
        );
        output::write_portable_schema(ctx, &portable)?;
        output::write_ui_schema(ctx, &registration.name, registration.ui_schema.as_ref())?;
        generated += 1;
    }

    let removed_orphans = remove_orphans(ctx, registrations);
    let loaders = registrations
        .iter()
        .map(|registration| reconcile(ctx, registration))
        .collect::<Result<Vec<_>, _>>()?;

    LoaderLocationIndex::from_registrations(registrations).save(&ctx.index_path())?;

    tracing::info!(
        generated,
        orphans = removed_orphans.len(),
        root = %ctx.root().display(),
        "registration complete"
    );
    Ok(RegistrationResult {
        generated,
        loaders,
        removed_orphans,
    })
}
