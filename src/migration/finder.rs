//! Migration discovery
//!
//! Ties the discovery steps together: resolve the directory, list its migration
//! files, load them, pick the candidates and build the version registry.

use crate::config::FinderConfig;
use crate::migration::{
    build_registry, resolve_candidates, resolve_directory, FileFilter, Loader, MigrationError,
    SourceLoader, UnitCatalog, UnitDescriptor, VersionRegistry,
};
use std::path::Path;

/// Discovers migrations through a [`Loader`]
///
/// The finder owns the catalog of files it has loaded, so calling
/// [`find`](MigrationFinder::find) again never reloads a file, and taking
/// `&mut self` keeps discovery calls on one finder sequential.
///
/// # Example
///
/// ```rust,no_run
/// use tideline::migration::{FileFilter, MigrationFinder, SourceLoader};
///
/// let mut finder = MigrationFinder::new(SourceLoader::new("app::migrations"));
/// let registry = finder.find("./migrations", &FileFilter::new(), None)?;
///
/// for (version, name) in registry.names() {
///     println!("{version} -> {name}");
/// }
/// # Ok::<(), tideline::migration::MigrationError>(())
/// ```
#[derive(Debug)]
pub struct MigrationFinder<L> {
    loader: L,
    catalog: UnitCatalog,
    strict_versions: bool,
}

impl MigrationFinder<SourceLoader> {
    /// Build a source-scanning finder and file filter from configuration
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::InvalidPattern` if the configured file pattern
    /// is not a valid regex.
    pub fn from_config(config: &FinderConfig) -> Result<(Self, FileFilter), MigrationError> {
        let mut filter = FileFilter::new()
            .with_extension(config.extension.as_str())
            .recursive(config.recursive);
        if let Some(pattern) = &config.pattern {
            filter = filter.with_pattern(pattern)?;
        }

        let finder = Self::new(SourceLoader::new(config.module_root.as_str()))
            .strict_versions(config.strict_versions);

        Ok((finder, filter))
    }
}

impl<L: Loader> MigrationFinder<L> {
    /// Create a finder with an empty catalog
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            catalog: UnitCatalog::new(),
            strict_versions: false,
        }
    }

    /// Fail on duplicate version identifiers instead of keeping the last one
    pub fn strict_versions(mut self, strict: bool) -> Self {
        self.strict_versions = strict;
        self
    }

    /// The loader used for new files
    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Everything loaded by this finder so far
    pub fn catalog(&self) -> &UnitCatalog {
        &self.catalog
    }

    /// Discover the migrations in `directory`
    ///
    /// Only files selected by `filter` are loaded, and with a `namespace` only
    /// units whose qualified name starts with `namespace::` are kept.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::InvalidDirectory` before any file is loaded when
    /// `directory` is not a directory, `MigrationError::Load` when a file cannot
    /// be loaded, and `MigrationError::NameIsReserved` when a migration claims
    /// version `"0"`. No partial registry is returned.
    pub fn find(
        &mut self,
        directory: impl AsRef<Path>,
        filter: &FileFilter,
        namespace: Option<&str>,
    ) -> Result<VersionRegistry, MigrationError> {
        let directory = directory.as_ref();
        let candidates = self.candidates(directory, filter, namespace)?;
        let registry = build_registry(&candidates, self.strict_versions)?;

        log::info!(
            "Discovered {} migration(s) in {}",
            registry.len(),
            directory.display()
        );

        Ok(registry)
    }

    /// Every unit `find` would consider, in load order
    ///
    /// Unlike the registry, units that lose a version collision are kept. Code
    /// generators use this to register every unit a file declares.
    ///
    /// # Errors
    ///
    /// Same as [`find`](MigrationFinder::find), except that version identifiers
    /// are not checked.
    pub fn candidates(
        &mut self,
        directory: impl AsRef<Path>,
        filter: &FileFilter,
        namespace: Option<&str>,
    ) -> Result<Vec<UnitDescriptor>, MigrationError> {
        let directory = resolve_directory(directory)?;

        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "tideline.find",
            directory = %directory.display(),
            namespace = namespace.unwrap_or("")
        )
        .entered();

        let files = filter.enumerate(&directory)?;
        let loaded = self.catalog.load_all(&self.loader, &files)?;
        let candidates: Vec<UnitDescriptor> =
            resolve_candidates(self.catalog.units(), &loaded, namespace)
                .into_iter()
                .cloned()
                .collect();

        log::debug!(
            "{} candidate unit(s) from {} file(s) in {}",
            candidates.len(),
            loaded.len(),
            directory.display()
        );

        Ok(candidates)
    }
}
