//! Build-time migration registration
//!
//! Compiled projects register every migration type together with the file it
//! lives in, usually from a module generated by a build script. The
//! [`StaticLoader`] then answers [`Loader::load`] from that table instead of
//! reading source.

use crate::migration::{Capability, Loader, Migration, MigrationError, UnitDescriptor};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One registered migration type
struct StaticUnit {
    origin: PathBuf,
    qualified_name: String,
    migration: Arc<dyn Migration>,
}

/// Loader backed by migrations registered at build time
///
/// # Example
///
/// ```rust
/// use tideline::migration::{Migration, StaticLoader};
///
/// #[derive(Default)]
/// pub struct Version20240120120000;
///
/// impl Migration for Version20240120120000 {
///     fn up(&self) -> Vec<String> {
///         vec!["CREATE TABLE users (id SERIAL PRIMARY KEY)".to_string()]
///     }
/// }
///
/// let mut loader = StaticLoader::new();
/// loader.register::<Version20240120120000>(
///     "migrations/version20240120120000.rs",
///     "app::migrations::Version20240120120000",
/// );
/// assert_eq!(loader.len(), 1);
/// ```
#[derive(Default)]
pub struct StaticLoader {
    units: Vec<StaticUnit>,
}

impl StaticLoader {
    /// Create an empty loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Register migration type `M`, declared in `origin`
    pub fn register<M>(&mut self, origin: impl Into<PathBuf>, qualified_name: impl Into<String>) -> &mut Self
    where
        M: Migration + Default + 'static,
    {
        self.register_instance(origin, qualified_name, Arc::new(M::default()))
    }

    /// Register an already constructed migration
    pub fn register_instance(
        &mut self,
        origin: impl Into<PathBuf>,
        qualified_name: impl Into<String>,
        migration: Arc<dyn Migration>,
    ) -> &mut Self {
        self.units.push(StaticUnit {
            origin: origin.into(),
            qualified_name: qualified_name.into(),
            migration,
        });
        self
    }

    /// Number of registered migrations
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Whether nothing has been registered
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl Loader for StaticLoader {
    /// Report the migrations registered for `path`
    ///
    /// Registered origins are canonicalized before comparison, so relative
    /// registrations match the canonical paths discovery works with. Origins
    /// that no longer exist on disk never match.
    fn load(&self, path: &Path) -> Result<Vec<UnitDescriptor>, MigrationError> {
        let units: Vec<UnitDescriptor> = self
            .units
            .iter()
            .filter(|unit| {
                unit.origin
                    .canonicalize()
                    .is_ok_and(|origin| origin == path)
            })
            .map(|unit| {
                UnitDescriptor::new(
                    unit.qualified_name.clone(),
                    path,
                    Capability::Runnable(Arc::clone(&unit.migration)),
                )
            })
            .collect();

        if units.is_empty() {
            return Err(MigrationError::load(
                path,
                "no migrations registered for this file; rebuild to regenerate the registry",
            ));
        }

        Ok(units)
    }
}
