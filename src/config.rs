//! Discovery configuration
//!
//! [`FinderConfig`] is read from the `[migrations]` section of
//! `config/config.toml` and from `TIDELINE_MIGRATIONS__*` environment variables,
//! e.g. `TIDELINE_MIGRATIONS__NAMESPACE=app::migrations`.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the configuration file
pub const CONFIG_FILE: &str = "config/config.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct FinderConfig {
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    /// Only keep units under this module path
    #[serde(default)]
    pub namespace: Option<String>,
    /// Module path migration files are mounted under
    #[serde(default = "default_module_root")]
    pub module_root: String,
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Regex migration file names must match
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub recursive: bool,
    /// Reject duplicate version identifiers instead of keeping the last one
    #[serde(default)]
    pub strict_versions: bool,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            namespace: None,
            module_root: default_module_root(),
            extension: default_extension(),
            pattern: None,
            recursive: false,
            strict_versions: false,
        }
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from("migrations")
}

fn default_module_root() -> String {
    "crate::migrations".to_string()
}

fn default_extension() -> String {
    "rs".to_string()
}

impl FinderConfig {
    /// Load the configuration from `config/config.toml`, falling back to env vars.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE)
    }

    /// Load the configuration from `path` (optional) and the environment.
    ///
    /// A missing `[migrations]` section yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let builder = Config::builder()
            .add_source(File::from(path).required(false))
            .add_source(environment());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                // The file exists but could not be parsed; keep going with env only
                log::warn!(
                    "Failed to load config file {}, falling back to env: {}",
                    path.display(),
                    err
                );
                Config::builder().add_source(environment()).build().map_err(|env_err| {
                    ConfigError::Message(format!(
                        "Failed to load configuration from file and env: {}, then env-only error: {}",
                        err, env_err
                    ))
                })?
            }
        };

        match settings.get::<FinderConfig>("migrations") {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Migration configuration could not be loaded from file or environment: {}",
                e
            ))),
        }
    }
}

/// `TIDELINE_<SECTION>__<KEY>`, e.g. `TIDELINE_MIGRATIONS__STRICT_VERSIONS=true`
fn environment() -> Environment {
    Environment::with_prefix("TIDELINE")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = FinderConfig::default();

        assert_eq!(config.directory, PathBuf::from("migrations"));
        assert_eq!(config.module_root, "crate::migrations");
        assert_eq!(config.extension, "rs");
        assert!(config.namespace.is_none());
        assert!(!config.strict_versions);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("config.toml");
        fs::write(
            &file,
            r#"
            [migrations]
            directory = "db/migrations"
            namespace = "app::migrations"
            pattern = '^version\d+\.rs$'
            strict_versions = true
            "#,
        )
        .unwrap();

        let config = FinderConfig::load_from(&file).unwrap();

        assert_eq!(config.directory, PathBuf::from("db/migrations"));
        assert_eq!(config.namespace.as_deref(), Some("app::migrations"));
        assert_eq!(config.pattern.as_deref(), Some(r"^version\d+\.rs$"));
        assert!(config.strict_versions);
        assert_eq!(config.module_root, "crate::migrations");
    }

    #[test]
    fn test_load_without_section_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("config.toml");
        fs::write(&file, "[database]\nurl = \"postgres://localhost\"\n").unwrap();

        let config = FinderConfig::load_from(&file).unwrap();
        assert_eq!(config.directory, PathBuf::from("migrations"));
    }

    // Only touches keys no other test asserts on, since env vars are process-wide
    #[test]
    fn test_environment_overrides_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("config.toml");
        fs::write(&file, "[migrations]\nextension = \"txt\"\nrecursive = false\n").unwrap();

        std::env::set_var("TIDELINE_MIGRATIONS__EXTENSION", "sql");
        std::env::set_var("TIDELINE_MIGRATIONS__RECURSIVE", "true");
        let from_file = FinderConfig::load_from(&file);
        let env_only = FinderConfig::load_from(temp_dir.path().join("missing.toml"));
        std::env::remove_var("TIDELINE_MIGRATIONS__EXTENSION");
        std::env::remove_var("TIDELINE_MIGRATIONS__RECURSIVE");

        let from_file = from_file.unwrap();
        assert_eq!(from_file.extension, "sql");
        assert!(from_file.recursive);

        let env_only = env_only.unwrap();
        assert_eq!(env_only.extension, "sql");
        assert!(env_only.recursive);
        assert_eq!(env_only.directory, PathBuf::from("migrations"));
    }
}
