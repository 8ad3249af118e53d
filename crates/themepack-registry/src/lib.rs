//! # themepack-registry: Registration Pass
//!
//! Turns a batch of [`SchemaRegistration`]s into on-disk state under a
//! [`WorkingDirectoryContext`](themepack_core::WorkingDirectoryContext):
//!
//! ```text
//! register(batch)
//!   ├── check_consistency ×N     (fail fast, nothing written)
//!   ├── reset schemas/ ui_schemas/
//!   ├── convert + write ×N
//!   ├── remove_orphans
//!   ├── reconcile ×N             (created / preserved / overwritten)
//!   └── save .loader_locations.json
//! ```
//!
//! [`build_manifest`] reads that state back for the archive step.
//!
//! ## Crate Policy
//!
//! - Single-threaded and synchronous; one pass per working directory at a
//!   time.
//! - Invalid loader content is never an error.
//! - No `.unwrap()` outside tests.

pub mod error;
pub mod location_index;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod reconcile;
pub mod registration;

pub use error::RegistryError;
pub use location_index::LoaderLocationIndex;
pub use manifest::{build_manifest, schema_names};
pub use orchestrator::{register, RegistrationResult};
pub use reconcile::{
    reconcile, remove_orphans, validate_content, LoaderContentError, LoaderFormat, LoaderReport,
    ReconcileOutcome,
};
pub use registration::SchemaRegistration;
