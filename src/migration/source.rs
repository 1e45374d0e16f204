//! Source-scanning loader
//!
//! Reads migration files as Rust source and reports every struct the file
//! pairs with an `impl Migration for ...` block. Nothing is compiled; the
//! qualified name is derived from the module the file would be mounted as.

use crate::migration::{Capability, Loader, MigrationError, UnitDescriptor};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use syn::{Item, ItemImpl, Type};

/// Name of the trait a unit must implement
const MIGRATION_TRAIT: &str = "Migration";

/// Loader that parses migration files with `syn`
///
/// A struct is a unit when the same file implements `Migration` for it, either
/// next to it or from another inline module through a `self::`, `super::`,
/// `crate::` or relative path.
///
/// A file `migrations/version20240101000000.rs` declaring `Version20240101000000`
/// yields `crate::migrations::version20240101000000::Version20240101000000` with
/// the default module root.
#[derive(Debug, Clone)]
pub struct SourceLoader {
    module_root: String,
}

impl Default for SourceLoader {
    fn default() -> Self {
        Self::new("crate::migrations")
    }
}

impl SourceLoader {
    /// Create a loader mounting migration files under `module_root`
    pub fn new(module_root: impl Into<String>) -> Self {
        let module_root = module_root.into();
        Self {
            module_root: module_root.trim_end_matches("::").to_string(),
        }
    }

    /// Module path migration files are mounted under
    pub fn module_root(&self) -> &str {
        &self.module_root
    }

    /// Parse `content` as the file at `path` and report its units
    ///
    /// # Errors
    ///
    /// Returns `MigrationError::Load` if `content` is not valid Rust.
    pub fn parse_units(&self, path: &Path, content: &str) -> Result<Vec<UnitDescriptor>, MigrationError> {
        let file = syn::parse_file(content).map_err(|e| MigrationError::load(path, e))?;

        let module_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().replace('-', "_"))
            .ok_or_else(|| MigrationError::load(path, "file has no name"))?;

        let mut module = Vec::new();
        if !self.module_root.is_empty() {
            module.push(self.module_root.clone());
        }
        module.push(module_name);

        let file_path: Vec<String> = module
            .iter()
            .flat_map(|segment| segment.split("::"))
            .map(str::to_string)
            .collect();
        let mut implemented = HashSet::new();
        collect_impls(&file.items, &mut Vec::new(), &file_path, &mut implemented);

        let mut units = Vec::new();
        collect_units(&file.items, &mut module, &mut Vec::new(), &implemented, path, &mut units);
        Ok(units)
    }
}

impl Loader for SourceLoader {
    fn load(&self, path: &Path) -> Result<Vec<UnitDescriptor>, MigrationError> {
        let content = fs::read_to_string(path).map_err(|e| MigrationError::load(path, e))?;
        self.parse_units(path, &content)
    }
}

/// Record the file-relative path of every type with a `Migration` impl
fn collect_impls(
    items: &[Item],
    scope: &mut Vec<String>,
    file_path: &[String],
    implemented: &mut HashSet<Vec<String>>,
) {
    for item in items {
        match item {
            Item::Impl(item_impl) => {
                if let Some(target) = implemented_type(item_impl, scope, file_path) {
                    implemented.insert(target);
                }
            }
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    scope.push(item_mod.ident.to_string());
                    collect_impls(nested, scope, file_path, implemented);
                    scope.pop();
                }
            }
            _ => {}
        }
    }
}

/// Walk `items` (and inline modules) collecting structs that implement the trait
fn collect_units(
    items: &[Item],
    module: &mut Vec<String>,
    scope: &mut Vec<String>,
    implemented: &HashSet<Vec<String>>,
    origin: &Path,
    units: &mut Vec<UnitDescriptor>,
) {
    for item in items {
        match item {
            Item::Struct(item_struct) => {
                let name = item_struct.ident.to_string();
                scope.push(name);
                if implemented.contains(scope.as_slice()) {
                    let qualified = format!("{}::{}", module.join("::"), item_struct.ident);
                    units.push(UnitDescriptor::new(qualified, origin, Capability::Declared));
                }
                scope.pop();
            }
            Item::Mod(item_mod) => {
                if let Some((_, nested)) = &item_mod.content {
                    let name = item_mod.ident.to_string();
                    module.push(name.clone());
                    scope.push(name);
                    collect_units(nested, module, scope, implemented, origin, units);
                    scope.pop();
                    module.pop();
                }
            }
            _ => {}
        }
    }
}

/// File-relative path of the self type when `item` is `impl <...>::Migration for T`
///
/// `T` is resolved from `scope` the way the compiler would for `self::`,
/// `super::` and paths into this file via `crate::`. Paths leading elsewhere
/// yield `None`.
fn implemented_type(item: &ItemImpl, scope: &[String], file_path: &[String]) -> Option<Vec<String>> {
    let (_, trait_path, _) = item.trait_.as_ref()?;
    let trait_name = trait_path.segments.last()?.ident.to_string();
    if trait_name != MIGRATION_TRAIT {
        return None;
    }

    let Type::Path(type_path) = item.self_ty.as_ref() else {
        return None;
    };
    if type_path.qself.is_some() || type_path.path.leading_colon.is_some() {
        return None;
    }

    let segments: Vec<String> = type_path
        .path
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    let mut resolved = scope.to_vec();
    let mut rest = segments.as_slice();

    match rest.first().map(String::as_str) {
        Some("crate") => {
            let inner = rest.strip_prefix(file_path)?;
            resolved.clear();
            rest = inner;
        }
        Some("self") => rest = &rest[1..],
        Some("super") => {
            while rest.first().map(String::as_str) == Some("super") {
                resolved.pop()?;
                rest = &rest[1..];
            }
        }
        _ => {}
    }

    if rest.is_empty() {
        return None;
    }
    resolved.extend(rest.iter().cloned());
    Some(resolved)
}
