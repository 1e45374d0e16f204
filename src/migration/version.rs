//! Version registry construction

use crate::migration::{MigrationError, UnitDescriptor};
use std::collections::BTreeMap;

/// Length of the conventional prefix (`Version`) stripped from unit names
pub const VERSION_PREFIX_LEN: usize = 7;

/// Version meaning "no migrations applied yet"; never a valid identifier
pub const RESERVED_VERSION: &str = "0";

/// Derive the version identifier from a unit's short name
///
/// Drops the first [`VERSION_PREFIX_LEN`] characters whatever they are, so
/// `Version20240101000000` becomes `20240101000000`.
///
/// # Errors
///
/// Returns `MigrationError::InvalidVersion` if nothing is left after the prefix,
/// or `MigrationError::NameIsReserved` if the identifier is `"0"`.
pub fn version_from_name(short_name: &str) -> Result<String, MigrationError> {
    let version: String = short_name.chars().skip(VERSION_PREFIX_LEN).collect();

    if version.is_empty() {
        return Err(MigrationError::InvalidVersion {
            name: short_name.to_string(),
        });
    }
    if version == RESERVED_VERSION {
        return Err(MigrationError::NameIsReserved { version });
    }

    Ok(version)
}

/// Discovered migrations keyed by version identifier
///
/// Iteration is in ascending lexicographic order of the identifier, which is
/// the order a runner applies migrations in.
#[derive(Debug, Clone, Default)]
pub struct VersionRegistry {
    entries: BTreeMap<String, UnitDescriptor>,
}

impl VersionRegistry {
    /// Unit registered under `version`
    pub fn get(&self, version: &str) -> Option<&UnitDescriptor> {
        self.entries.get(version)
    }

    /// Whether `version` is registered
    pub fn contains(&self, version: &str) -> bool {
        self.entries.contains_key(version)
    }

    /// Number of migrations
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no migrations were found
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Version identifiers in order
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// `(version, unit)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UnitDescriptor)> {
        self.entries.iter().map(|(version, unit)| (version.as_str(), unit))
    }

    /// `(version, qualified name)` pairs in order
    pub fn names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().map(|(version, unit)| (version, unit.qualified_name()))
    }

    /// Owned `version -> qualified name` map
    pub fn to_name_map(&self) -> BTreeMap<String, String> {
        self.names()
            .map(|(version, name)| (version.to_string(), name.to_string()))
            .collect()
    }

    /// Latest version, if any
    pub fn latest_version(&self) -> Option<&str> {
        self.entries.keys().next_back().map(String::as_str)
    }
}

impl<'a> IntoIterator for &'a VersionRegistry {
    type Item = (&'a String, &'a UnitDescriptor);
    type IntoIter = std::collections::btree_map::Iter<'a, String, UnitDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Build the version registry from resolved candidates
///
/// Candidates sharing a version identifier overwrite each other: the one that
/// comes later in `candidates` wins and the collision is logged. With `strict`
/// set, a collision is an error instead.
///
/// # Errors
///
/// Returns `MigrationError::NameIsReserved` or `MigrationError::InvalidVersion`
/// for unusable identifiers, and `MigrationError::DuplicateVersion` for a
/// collision in strict mode.
pub fn build_registry<'a, I>(candidates: I, strict: bool) -> Result<VersionRegistry, MigrationError>
where
    I: IntoIterator<Item = &'a UnitDescriptor>,
{
    let mut entries: BTreeMap<String, UnitDescriptor> = BTreeMap::new();

    for unit in candidates {
        let version = version_from_name(unit.short_name())?;

        if let Some(previous) = entries.get(&version) {
            if strict {
                return Err(MigrationError::DuplicateVersion {
                    version,
                    first: previous.qualified_name().to_string(),
                    second: unit.qualified_name().to_string(),
                });
            }
            log::warn!(
                "Migration version {} declared by both {} and {}; keeping {}",
                version,
                previous.qualified_name(),
                unit.qualified_name(),
                unit.qualified_name()
            );
        }

        entries.insert(version, unit.clone());
    }

    Ok(VersionRegistry { entries })
}
