//! Build script helper for migration registry generation
//!
//! This module provides functions that can be used in a user's build.rs to
//! discover migrations and generate a module that registers every one of them
//! with a [`StaticLoader`](tideline::StaticLoader).
//!
//! ```rust,no_run
//! // build.rs
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let out_dir = std::path::PathBuf::from(std::env::var("OUT_DIR")?);
//!     tideline_migrate::build_script::generate(
//!         "src/migrations",
//!         "crate::migrations",
//!         &out_dir.join("migration_registry.rs"),
//!     )?;
//!     println!("cargo:rerun-if-changed=src/migrations");
//!     Ok(())
//! }
//! ```
//!
//! The generated file is then included inside the `migrations` module:
//!
//! ```rust,ignore
//! // src/migrations.rs
//! include!(concat!(env!("OUT_DIR"), "/migration_registry.rs"));
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tideline::migration::{build_registry, version_from_name};
use tideline::{FileFilter, MigrationFinder, SourceLoader, UnitDescriptor, VersionRegistry};

/// File name of the generated module inside `OUT_DIR`
pub const REGISTRY_FILE: &str = "migration_registry.rs";

/// Discover migrations in `migrations_dir` and write the registry module
///
/// Every unit found is registered, including units whose version is shadowed
/// by a later one, so the static loader accepts every migration file.
///
/// # Errors
///
/// Returns an error if discovery fails (see [`MigrationFinder::find`]) or the
/// output file cannot be written.
pub fn generate(
    migrations_dir: impl AsRef<Path>,
    module_root: &str,
    output_path: &Path,
) -> Result<VersionRegistry, Box<dyn std::error::Error>> {
    let mut finder = MigrationFinder::new(SourceLoader::new(module_root));
    let units = finder.candidates(migrations_dir, &FileFilter::new(), Some(module_root))?;
    let registry = build_registry(&units, false)?;

    generate_registry_module(&units, module_root, output_path)?;
    Ok(registry)
}

/// Generate the registry module for `units`
///
/// Each migration file becomes a `#[path]` module pointing at its canonical
/// location, and `migration_loader()` registers every unit in version
/// order. Units sharing a version keep their relative order, so the static
/// loader resolves collisions the same way discovery did. Migration types must
/// implement `Default`.
///
/// # Errors
///
/// Returns an error if `units` is empty, a unit is not under `module_root` or
/// has no usable version, or the output file cannot be written.
pub fn generate_registry_module(
    units: &[UnitDescriptor],
    module_root: &str,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if units.is_empty() {
        return Err("No migrations found to generate registry".into());
    }

    let root_prefix = format!("{}::", module_root.trim_end_matches("::"));

    // One `#[path]` module per file, keyed by module name
    let mut modules: BTreeMap<String, PathBuf> = BTreeMap::new();
    let mut registrations = Vec::with_capacity(units.len());

    for unit in units {
        let version = version_from_name(unit.short_name())?;
        let relative_name = unit
            .qualified_name()
            .strip_prefix(&root_prefix)
            .ok_or_else(|| format!("Migration {} is not under {}", unit.qualified_name(), module_root))?;
        let module_name = relative_name
            .split("::")
            .next()
            .unwrap_or(relative_name)
            .to_string();

        modules.insert(module_name, unit.origin().to_path_buf());
        registrations.push((version, relative_name, unit));
    }

    // Stable: same-version units keep load order
    registrations.sort_by(|a, b| a.0.cmp(&b.0));

    let mut content = String::from("// Auto-generated migration registry\n");
    content.push_str("// DO NOT EDIT - This file is generated by build script\n\n");

    for (module_name, origin) in &modules {
        // Forward slashes work on all platforms
        let path_str = origin.to_string_lossy().replace('\\', "/");

        content.push_str(&format!("#[path = {:?}]\n", path_str));
        content.push_str(&format!("pub mod {};\n", module_name));
    }

    content.push_str("\n/// Loader for every migration compiled into this crate, in version order\n");
    content.push_str("pub fn migration_loader() -> ::tideline::StaticLoader {\n");
    content.push_str("    let mut loader = ::tideline::StaticLoader::new();\n");
    for (version, relative_name, unit) in &registrations {
        content.push_str(&format!("    // version {}\n", version));
        content.push_str(&format!(
            "    loader.register::<{}>({:?}, {:?});\n",
            relative_name,
            unit.origin().to_string_lossy(),
            unit.qualified_name()
        ));
    }
    content.push_str("    loader\n");
    content.push_str("}\n");

    fs::write(output_path, content)?;
    Ok(())
}
