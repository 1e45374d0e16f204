//! Loading migration files into a unit catalog
//!
//! A [`Loader`] turns one migration file into the units it declares. The
//! [`UnitCatalog`] remembers every file it has loaded and every unit those files
//! reported, so a file is never loaded twice and later discovery calls on the
//! same catalog see the same units in the same order.

use crate::migration::{Migration, MigrationError};
use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How a discovered unit satisfies the [`Migration`] contract
#[derive(Clone)]
pub enum Capability {
    /// A compiled instance registered at build time
    Runnable(Arc<dyn Migration>),
    /// The source file declares `impl Migration for <unit>`
    Declared,
    /// No evidence that the unit implements [`Migration`]
    Missing,
}

impl Capability {
    /// Whether the unit implements the migration contract
    pub fn is_migration(&self) -> bool {
        !matches!(self, Capability::Missing)
    }
}

impl fmt::Debug for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Runnable(_) => f.write_str("Runnable"),
            Capability::Declared => f.write_str("Declared"),
            Capability::Missing => f.write_str("Missing"),
        }
    }
}

/// A migration unit reported by a [`Loader`]
#[derive(Debug, Clone)]
pub struct UnitDescriptor {
    qualified_name: String,
    origin: PathBuf,
    capability: Capability,
}

impl UnitDescriptor {
    /// Describe a unit declared in `origin`
    ///
    /// `qualified_name` uses `::` separators, e.g.
    /// `crate::migrations::version20240101::Version20240101`.
    pub fn new(qualified_name: impl Into<String>, origin: impl Into<PathBuf>, capability: Capability) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            origin: origin.into(),
            capability,
        }
    }

    /// Fully-qualified name of the unit
    pub fn qualified_name(&self) -> &str {
        &self.qualified_name
    }

    /// Last path segment of the qualified name
    pub fn short_name(&self) -> &str {
        self.qualified_name
            .rsplit("::")
            .next()
            .unwrap_or(&self.qualified_name)
    }

    /// File the unit was declared in
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// How the unit satisfies the migration contract
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// The compiled migration, when one was registered
    pub fn migration(&self) -> Option<Arc<dyn Migration>> {
        match &self.capability {
            Capability::Runnable(migration) => Some(Arc::clone(migration)),
            _ => None,
        }
    }
}

/// Brings a migration file into the process
///
/// Implementations report exactly the units the file introduces, in
/// declaration order. They may parse source, consult a build-time registry, or
/// anything else that can name the units a file defines.
pub trait Loader {
    /// Load `path` (already canonical) and report the units it declares
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Load` if the file cannot be loaded.
    fn load(&self, path: &Path) -> Result<Vec<UnitDescriptor>, MigrationError>;
}

impl<L: Loader + ?Sized> Loader for &L {
    fn load(&self, path: &Path) -> Result<Vec<UnitDescriptor>, MigrationError> {
        (**self).load(path)
    }
}

impl<L: Loader + ?Sized> Loader for Box<L> {
    fn load(&self, path: &Path) -> Result<Vec<UnitDescriptor>, MigrationError> {
        (**self).load(path)
    }
}

/// Every file loaded so far and the units they declared
#[derive(Debug, Default)]
pub struct UnitCatalog {
    loaded: HashSet<PathBuf>,
    units: Vec<UnitDescriptor>,
}

impl UnitCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load each file once and return their canonical paths
    ///
    /// Files already present in the catalog are skipped without calling the
    /// loader again. The returned list keeps the order of `files`.
    /// Origins reported by the loader are stored in canonical form.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Load` if a path cannot be canonicalized or the
    /// loader fails. Units from files loaded before the failure stay in the
    /// catalog.
    pub fn load_all<L, P>(&mut self, loader: &L, files: &[P]) -> Result<Vec<PathBuf>, MigrationError>
    where
        L: Loader + ?Sized,
        P: AsRef<Path>,
    {
        let mut canonical_files = Vec::with_capacity(files.len());

        for file in files {
            let file = file.as_ref();
            let canonical = file
                .canonicalize()
                .map_err(|e| MigrationError::load(file, e))?;

            if self.loaded.contains(&canonical) {
                log::debug!("Migration file {} already loaded", canonical.display());
            } else {
                let mut units = loader.load(&canonical)?;
                for unit in &mut units {
                    canonicalize_origin(unit);
                }
                log::debug!(
                    "Loaded {} migration unit(s) from {}",
                    units.len(),
                    canonical.display()
                );
                self.units.extend(units);
                self.loaded.insert(canonical.clone());
            }

            canonical_files.push(canonical);
        }

        Ok(canonical_files)
    }

    /// Whether `path` (canonical) has been loaded
    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded.contains(path)
    }

    /// All known units in load order
    pub fn units(&self) -> &[UnitDescriptor] {
        &self.units
    }
}

/// Rewrite a reported origin to its canonical form so it matches discovered files
fn canonicalize_origin(unit: &mut UnitDescriptor) {
    match unit.origin.canonicalize() {
        Ok(canonical) => unit.origin = canonical,
        Err(e) => log::debug!(
            "Keeping origin {} of {} as reported: {}",
            unit.origin.display(),
            unit.qualified_name,
            e
        ),
    }
}
