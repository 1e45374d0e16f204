//! # Tideline
//!
//! Migration discovery for Rust migration runners: finds migration files in a
//! directory, loads the units they declare and orders them by version.
//!
//! See [`migration::MigrationFinder`] for the entry point.

pub mod config;
pub mod migration;

pub use config::FinderConfig;
pub use migration::{
    FileFilter, Loader, Migration, MigrationError, MigrationFinder, SourceLoader, StaticLoader,
    UnitDescriptor, VersionRegistry,
};
