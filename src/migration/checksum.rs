//! Checksum calculation for migration files

use crate::migration::MigrationError;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

/// Calculate SHA-256 checksum of a migration file
///
/// Runners store this next to an applied version to notice files edited after
/// deployment.
///
/// # Errors
///
/// Returns `MigrationError::Load` if the file cannot be read
pub fn calculate_checksum(migration_file_path: &Path) -> Result<String, MigrationError> {
    let content = fs::read(migration_file_path).map_err(|e| MigrationError::load(migration_file_path, e))?;
    Ok(checksum_bytes(&content))
}

/// Hex-encoded SHA-256 of `content`
pub fn checksum_bytes(content: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{:x}", hasher.finalize())
}
