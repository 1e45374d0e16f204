//! Migration file discovery

use crate::migration::MigrationError;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// File names that never hold migrations
const SKIPPED_FILES: &[&str] = &["mod.rs", "lib.rs", "main.rs"];

/// Directories skipped during recursive discovery
const SKIPPED_DIRS: &[&str] = &["target", ".git", "node_modules"];

/// Selects candidate migration files inside a migrations directory
///
/// The default filter accepts every `.rs` file at the top level of the
/// directory except module roots (`mod.rs`, `lib.rs`, `main.rs`).
#[derive(Debug, Clone)]
pub struct FileFilter {
    extension: String,
    pattern: Option<Regex>,
    recursive: bool,
}

impl Default for FileFilter {
    fn default() -> Self {
        Self {
            extension: "rs".to_string(),
            pattern: None,
            recursive: false,
        }
    }
}

impl FileFilter {
    /// Create the default filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept files with this extension (without the leading dot)
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into().trim_start_matches('.').to_string();
        self
    }

    /// Only accept files whose name matches `pattern`
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::InvalidPattern` if `pattern` is not a valid regex.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, MigrationError> {
        let re = Regex::new(pattern).map_err(|e| MigrationError::InvalidPattern(e.to_string()))?;
        self.pattern = Some(re);
        Ok(self)
    }

    /// Descend into subdirectories
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Check a single file name against the filter
    pub fn accepts(&self, file_name: &str) -> bool {
        if SKIPPED_FILES.contains(&file_name) {
            return false;
        }

        let has_extension = Path::new(file_name)
            .extension()
            .and_then(|s| s.to_str())
            .is_some_and(|ext| ext == self.extension);
        if !has_extension {
            return false;
        }

        self.pattern
            .as_ref()
            .map_or(true, |re| re.is_match(file_name))
    }

    /// List candidate migration files under `directory`
    ///
    /// Returns the matching paths sorted so that repeated discovery over an
    /// unchanged directory yields the same list.
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::ReadDirectory` if the directory or one of its
    /// entries cannot be read.
    pub fn enumerate(&self, directory: &Path) -> Result<Vec<PathBuf>, MigrationError> {
        let mut files = Vec::new();
        self.enumerate_into(directory, &mut files)?;
        files.sort();
        Ok(files)
    }

    fn enumerate_into(&self, directory: &Path, files: &mut Vec<PathBuf>) -> Result<(), MigrationError> {
        let read_error = |source| MigrationError::ReadDirectory {
            path: directory.to_path_buf(),
            source,
        };

        for entry in fs::read_dir(directory).map_err(read_error)? {
            let entry = entry.map_err(read_error)?;
            let path = entry.path();
            let name = entry.file_name();
            let name = name.to_string_lossy();

            if path.is_dir() {
                if self.recursive && !SKIPPED_DIRS.contains(&name.as_ref()) {
                    self.enumerate_into(&path, files)?;
                }
            } else if path.is_file() && self.accepts(&name) {
                files.push(path);
            }
        }

        Ok(())
    }
}
