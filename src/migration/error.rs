//! Migration-specific error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while discovering migrations
///
/// `InvalidDirectory` and `NameIsReserved` are the caller-facing conditions of a
/// discovery call. `Load` means a migration file could not be brought into the
/// process at all and the whole call is abandoned.
#[derive(Debug, Error)]
pub enum MigrationError {
    /// The migrations path does not resolve to an existing directory
    #[error("Invalid migrations directory: {}", .path.display())]
    InvalidDirectory { path: PathBuf },

    /// A migration's version identifier equals the reserved `"0"` sentinel
    #[error(
        "Migration version '{version}' is reserved.\n\
         Version \"0\" means \"no migrations applied\" and cannot name a migration"
    )]
    NameIsReserved { version: String },

    /// A migration file could not be loaded
    #[error("Failed to load migration file {}: {reason}", .path.display())]
    Load { path: PathBuf, reason: String },

    /// The migrations directory could not be read
    #[error("Failed to read migrations directory {}: {source}", .path.display())]
    ReadDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A migration name does not leave a version identifier after its prefix
    #[error("Migration '{name}' has no version identifier after its 7-character prefix")]
    InvalidVersion { name: String },

    /// Two migrations share a version identifier (strict mode only)
    #[error("Duplicate migration version '{version}': '{first}' and '{second}'")]
    DuplicateVersion {
        version: String,
        first: String,
        second: String,
    },

    /// The file name pattern of a file filter is not a valid regex
    #[error("Invalid migration file pattern: {0}")]
    InvalidPattern(String),
}

impl MigrationError {
    /// Build a load failure for `path`
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        MigrationError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
