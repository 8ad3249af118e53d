//! # themepack-core: Foundational Types
//!
//! Leaf crate of the themepack workspace. Every other crate depends on it;
//! it depends on nothing internal.
//!
//! - [`WorkingDirectoryContext`]: the explicit project root and output
//!   layout used instead of the process-global current directory.
//! - [`Timestamp`]: UTC-only, seconds-precision timestamps.
//! - [`ThemeManifest`] / [`ContentType`] / [`ThemeMetadata`]: the
//!   `manifest.json` contract.
//! - [`ThemepackError`]: the shared error type.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `themepack-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod manifest;
pub mod temporal;
pub mod workdir;

pub use error::ThemepackError;
pub use manifest::{ContentType, ThemeManifest, ThemeMetadata};
pub use temporal::Timestamp;
pub use workdir::{normalize, WorkingDirectoryContext};
