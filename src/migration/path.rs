//! Migrations directory resolution

use crate::migration::MigrationError;
use std::path::{Path, PathBuf};

/// Canonicalize a migrations directory
///
/// Resolves symlinks and relative segments, then checks that the result is a
/// directory.
///
/// # Errors
///
/// Returns `MigrationError::InvalidDirectory` if the path cannot be
/// canonicalized or does not point at a directory.
pub fn resolve_directory(directory: impl AsRef<Path>) -> Result<PathBuf, MigrationError> {
    let directory = directory.as_ref();
    let invalid = || MigrationError::InvalidDirectory {
        path: directory.to_path_buf(),
    };

    let canonical = directory.canonicalize().map_err(|_| invalid())?;
    if !canonical.is_dir() {
        return Err(invalid());
    }

    Ok(canonical)
}
