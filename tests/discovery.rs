//! End-to-end discovery tests

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tideline::migration::{Capability, MigrationError};
use tideline::{FileFilter, Loader, Migration, MigrationFinder, SourceLoader, StaticLoader, UnitDescriptor};

fn fixtures(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn write_migration(dir: &Path, file: &str, unit: &str) {
    fs::write(
        dir.join(file),
        format!("pub struct {unit};\nimpl Migration for {unit} {{ fn up(&self) -> Vec<String> {{ Vec::new() }} }}\n"),
    )
    .unwrap();
}

#[test]
fn test_fixture_directory() {
    let mut finder = MigrationFinder::new(SourceLoader::default());
    let registry = finder.find(fixtures("migrations"), &FileFilter::new(), None).unwrap();

    let names: Vec<_> = registry.names().collect();
    assert_eq!(
        names,
        vec![
            (
                "20240120120000",
                "crate::migrations::version20240120120000::Version20240120120000"
            ),
            (
                "20240121090000",
                "crate::migrations::version20240121090000::Version20240121090000"
            ),
        ]
    );

    let unit = registry.get("20240121090000").unwrap();
    assert_eq!(
        unit.origin(),
        fixtures("migrations").join("version20240121090000.rs").canonicalize().unwrap()
    );
}

#[test]
fn test_one_entry_per_migration_file() {
    let temp_dir = TempDir::new().unwrap();
    for i in 1..=12 {
        write_migration(temp_dir.path(), &format!("version{i}.rs"), &format!("Version{i}"));
    }

    let mut finder = MigrationFinder::new(SourceLoader::default());
    let registry = finder.find(temp_dir.path(), &FileFilter::new(), None).unwrap();

    assert_eq!(registry.len(), 12);
    let versions: Vec<_> = registry.versions().collect();
    let mut sorted = versions.clone();
    sorted.sort_unstable();
    sorted.dedup();
    assert_eq!(versions, sorted);
    assert_eq!(versions[..3], ["1", "10", "11"]);
}

#[test]
fn test_namespace_filter() {
    let mut finder = MigrationFinder::new(SourceLoader::new("app"));

    let all = finder.find(fixtures("namespaced"), &FileFilter::new(), Some("app")).unwrap();
    assert_eq!(
        all.versions().collect::<Vec<_>>(),
        vec!["20240301000000", "20240302000000"]
    );

    let billing = finder
        .find(
            fixtures("namespaced"),
            &FileFilter::new(),
            Some("app::version20240301000000::billing"),
        )
        .unwrap();
    assert_eq!(
        billing.to_name_map().into_iter().collect::<Vec<_>>(),
        vec![(
            "20240302000000".to_string(),
            "app::version20240301000000::billing::Version20240302000000".to_string()
        )]
    );

    let other = finder.find(fixtures("namespaced"), &FileFilter::new(), Some("other")).unwrap();
    assert!(other.is_empty());
}

#[test]
fn test_colliding_versions_keep_later_declaration() {
    let temp_dir = TempDir::new().unwrap();
    write_migration(temp_dir.path(), "a_version5.rs", "Version5");
    write_migration(temp_dir.path(), "b_version5.rs", "Version5");

    let mut finder = MigrationFinder::new(SourceLoader::new("app"));
    let registry = finder.find(temp_dir.path(), &FileFilter::new(), None).unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(
        registry.get("5").map(UnitDescriptor::qualified_name),
        Some("app::b_version5::Version5")
    );

    let mut strict = MigrationFinder::new(SourceLoader::new("app")).strict_versions(true);
    assert!(matches!(
        strict.find(temp_dir.path(), &FileFilter::new(), None),
        Err(MigrationError::DuplicateVersion { .. })
    ));
}

#[test]
fn test_reserved_version_returns_no_registry() {
    let temp_dir = TempDir::new().unwrap();
    write_migration(temp_dir.path(), "version1.rs", "Version1");
    write_migration(temp_dir.path(), "version0.rs", "Version0");

    let mut finder = MigrationFinder::new(SourceLoader::default());
    let error = finder.find(temp_dir.path(), &FileFilter::new(), None).unwrap_err();

    match error {
        MigrationError::NameIsReserved { version } => assert_eq!(version, "0"),
        other => panic!("Expected NameIsReserved, got {other:?}"),
    }
}

/// Counts load calls so tests can check nothing was loaded
#[derive(Default)]
struct CountingLoader {
    calls: Cell<usize>,
}

impl Loader for CountingLoader {
    fn load(&self, path: &Path) -> Result<Vec<UnitDescriptor>, MigrationError> {
        self.calls.set(self.calls.get() + 1);
        SourceLoader::default().load(path)
    }
}

#[test]
fn test_invalid_directory_before_loading() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("version1.rs");
    write_migration(temp_dir.path(), "version1.rs", "Version1");

    let mut finder = MigrationFinder::new(CountingLoader::default());

    assert!(matches!(
        finder.find(&file, &FileFilter::new(), None),
        Err(MigrationError::InvalidDirectory { .. })
    ));
    assert!(matches!(
        finder.find(temp_dir.path().join("missing"), &FileFilter::new(), None),
        Err(MigrationError::InvalidDirectory { .. })
    ));
    assert_eq!(finder.loader().calls.get(), 0);
}

#[test]
fn test_repeated_find_loads_files_once() {
    let mut finder = MigrationFinder::new(CountingLoader::default());

    let first = finder.find(fixtures("migrations"), &FileFilter::new(), None).unwrap();
    let second = finder.find(fixtures("migrations"), &FileFilter::new(), None).unwrap();

    assert_eq!(first.to_name_map(), second.to_name_map());
    assert_eq!(finder.loader().calls.get(), 2);
}

#[test]
fn test_unparseable_file_aborts_discovery() {
    let temp_dir = TempDir::new().unwrap();
    write_migration(temp_dir.path(), "version1.rs", "Version1");
    fs::write(temp_dir.path().join("version2.rs"), "pub struct Version2 {").unwrap();

    let mut finder = MigrationFinder::new(SourceLoader::default());
    let error = finder.find(temp_dir.path(), &FileFilter::new(), None).unwrap_err();

    match error {
        MigrationError::Load { path, .. } => {
            assert_eq!(path, temp_dir.path().join("version2.rs").canonicalize().unwrap());
        }
        other => panic!("Expected Load, got {other:?}"),
    }
}

#[derive(Default)]
struct Version20240120120000;

impl Migration for Version20240120120000 {
    fn up(&self) -> Vec<String> {
        vec!["CREATE TABLE users (id SERIAL PRIMARY KEY)".to_string()]
    }
}

#[derive(Default)]
struct Version20240121090000;

impl Migration for Version20240121090000 {
    fn up(&self) -> Vec<String> {
        vec!["CREATE TABLE chart_of_accounts (id SERIAL PRIMARY KEY)".to_string()]
    }
}

#[test]
fn test_static_loader_discovery() {
    let dir = fixtures("migrations");
    let mut loader = StaticLoader::new();
    loader
        .register::<Version20240121090000>(
            dir.join("version20240121090000.rs"),
            "app::migrations::Version20240121090000",
        )
        .register::<Version20240120120000>(
            dir.join("version20240120120000.rs"),
            "app::migrations::Version20240120120000",
        );

    let mut finder = MigrationFinder::new(loader);
    let registry = finder.find(&dir, &FileFilter::new(), Some("app::migrations")).unwrap();

    assert_eq!(
        registry.versions().collect::<Vec<_>>(),
        vec!["20240120120000", "20240121090000"]
    );
    let (_, first) = registry.iter().next().unwrap();
    assert!(matches!(first.capability(), Capability::Runnable(_)));
    assert_eq!(
        first.migration().unwrap().up(),
        vec!["CREATE TABLE users (id SERIAL PRIMARY KEY)".to_string()]
    );
}

#[test]
fn test_static_loader_missing_registration() {
    let dir = fixtures("migrations");
    let mut loader = StaticLoader::new();
    loader.register::<Version20240120120000>(
        dir.join("version20240120120000.rs"),
        "app::migrations::Version20240120120000",
    );

    let mut finder = MigrationFinder::new(loader);
    let result = finder.find(&dir, &FileFilter::new(), None);

    assert!(matches!(result, Err(MigrationError::Load { .. })));
}
