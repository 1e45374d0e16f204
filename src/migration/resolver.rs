//! Candidate resolution
//!
//! Picks the units that belong to the current discovery call out of everything
//! a catalog has loaded.

use crate::migration::UnitDescriptor;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Module path separator used by qualified names
pub const NAMESPACE_SEPARATOR: &str = "::";

/// Select the migration candidates for one discovery call
///
/// A unit survives when its origin is exactly one of `loaded_files` and, if a
/// namespace is given, its qualified name starts with `namespace::`. Survivors
/// keep the order of `units`.
///
/// # Panics
///
/// Panics if a surviving unit does not implement the migration contract. Loaders
/// only report migration units, so this indicates a broken [`Loader`].
///
/// [`Loader`]: crate::migration::Loader
pub fn resolve_candidates<'a>(
    units: &'a [UnitDescriptor],
    loaded_files: &[PathBuf],
    namespace: Option<&str>,
) -> Vec<&'a UnitDescriptor> {
    let loaded: HashSet<&Path> = loaded_files.iter().map(PathBuf::as_path).collect();
    let prefix = namespace.map(|ns| format!("{}{NAMESPACE_SEPARATOR}", ns.trim_end_matches(NAMESPACE_SEPARATOR)));

    units
        .iter()
        .filter(|unit| loaded.contains(unit.origin()))
        .filter(|unit| {
            prefix
                .as_deref()
                .map_or(true, |prefix| unit.qualified_name().starts_with(prefix))
        })
        .inspect(|unit| {
            assert!(
                unit.capability().is_migration(),
                "{} from {} does not implement Migration",
                unit.qualified_name(),
                unit.origin().display()
            );
            log::debug!("Migration candidate {}", unit.qualified_name());
        })
        .collect()
}
