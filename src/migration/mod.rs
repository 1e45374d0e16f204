//! Migration discovery for Tideline
//!
//! This module turns a directory of migration files into an ordered registry:
//! - Migration trait definition
//! - Directory resolution and file discovery
//! - Loaders (source scanning and build-time registration)
//! - Candidate resolution and version registry construction
//!
//! # Example
//!
//! ```rust,no_run
//! use tideline::migration::{FileFilter, MigrationFinder, SourceLoader};
//!
//! let mut finder = MigrationFinder::new(SourceLoader::default());
//! let registry = finder.find("migrations", &FileFilter::new(), Some("crate::migrations"))?;
//!
//! if let Some(latest) = registry.latest_version() {
//!     println!("latest migration: {latest}");
//! }
//! # Ok::<(), tideline::migration::MigrationError>(())
//! ```

pub mod checksum;
pub mod error;
pub mod file;
pub mod finder;
pub mod loader;
pub mod migration;
pub mod path;
pub mod registry;
pub mod resolver;
pub mod source;
pub mod version;

pub use checksum::{calculate_checksum, checksum_bytes};
pub use error::MigrationError;
pub use file::FileFilter;
pub use finder::MigrationFinder;
pub use loader::{Capability, Loader, UnitCatalog, UnitDescriptor};
pub use migration::Migration;
pub use path::resolve_directory;
pub use registry::StaticLoader;
pub use resolver::{resolve_candidates, NAMESPACE_SEPARATOR};
pub use source::SourceLoader;
pub use version::{build_registry, version_from_name, VersionRegistry, RESERVED_VERSION, VERSION_PREFIX_LEN};
