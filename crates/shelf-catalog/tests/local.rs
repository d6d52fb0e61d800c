use std::sync::Arc;
use std::time::SystemTime;

use shelf_catalog::catalog::Catalog;
use shelf_catalog::local::{LocalCatalog, LOCAL_INDEX_FILE};
use shelf_core::constraint::Requirement;
use shelf_core::library::{LibraryRecord, LocalIndexDocument, LocalLibrary};
use shelf_core::manifest::Manifest;
use shelf_util::errors::ShelfError;

fn record(name: &str, version: &str) -> LocalLibrary {
    let manifest: Manifest = serde_json::from_value(serde_json::json!({
        "manifest_version": "1.0.0",
        "library": {"name": name, "version": version},
        "urls": {"repository": format!("https://example.com/{name}")}
    }))
    .unwrap();
    LocalLibrary::new(
        manifest,
        std::path::Path::new(&format!("/libs/{name}")),
        SystemTime::now(),
    )
}

#[test]
fn missing_file_reads_as_empty() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = LocalCatalog::open(tmp.path().join(LOCAL_INDEX_FILE));
    assert!(catalog.installed().unwrap().is_empty());
    assert!(catalog.installed_record("foo").unwrap().is_none());
    assert!(!catalog.remove("foo").unwrap());
}

#[test]
fn add_then_remove() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = LocalCatalog::open(tmp.path().join(LOCAL_INDEX_FILE));
    catalog.add(record("foo", "1.0.0")).unwrap();
    catalog.add(record("bar", "2.0")).unwrap();

    let names: Vec<String> = catalog.installed().unwrap().iter().map(|r| r.name().to_string()).collect();
    assert_eq!(names, ["bar", "foo"]);
    assert!(tmp.path().join(LOCAL_INDEX_FILE).is_file());

    // A fresh handle sees the persisted state.
    let reopened = LocalCatalog::open(tmp.path().join(LOCAL_INDEX_FILE));
    assert_eq!(reopened.installed_record("foo").unwrap().unwrap().version(), "1.0.0");

    assert!(catalog.remove("foo").unwrap());
    assert!(reopened.installed_record("foo").unwrap().is_none());
    assert_eq!(catalog.names().unwrap(), ["bar"]);
}

#[test]
fn second_record_for_a_name_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = LocalCatalog::open(tmp.path().join(LOCAL_INDEX_FILE));
    catalog.add(record("foo", "1.0.0")).unwrap();
    let err = catalog.add(record("foo", "2.0.0")).unwrap_err();
    match err {
        ShelfError::AlreadyInstalled { name, version } => {
            assert_eq!(name, "foo");
            assert_eq!(version, "1.0.0");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(catalog.installed().unwrap().len(), 1);
}

#[test]
fn duplicate_records_on_disk_are_corruption() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join(LOCAL_INDEX_FILE);
    let doc = LocalIndexDocument {
        libraries: vec![record("foo", "1.0.0"), record("bar", "1.0"), record("foo", "2.0.0")],
    };
    std::fs::write(&path, doc.to_vec().unwrap()).unwrap();

    let catalog = LocalCatalog::open(&path);
    match catalog.installed().unwrap_err() {
        ShelfError::CorruptedLocalCatalog { name, count } => {
            assert_eq!(name, "foo");
            assert_eq!(count, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(catalog.add(record("baz", "1")).is_err());
}

#[test]
fn remove_strict_requires_an_install() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = LocalCatalog::open(tmp.path().join(LOCAL_INDEX_FILE));
    let err = catalog.remove_strict("foo").unwrap_err();
    assert!(matches!(err, ShelfError::NotInstalled { .. }));

    catalog.add(record("foo", "1.0.0")).unwrap();
    assert_eq!(catalog.remove_strict("foo").unwrap().version(), "1.0.0");
}

#[test]
fn search_and_get_through_catalog_trait() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = LocalCatalog::open(tmp.path().join(LOCAL_INDEX_FILE));
    catalog.add(record("foo", "1.4.0")).unwrap();

    assert_eq!(catalog.search("foo", &Requirement::parse("^1.0").unwrap()).unwrap().len(), 1);
    assert!(catalog.search("foo", &Requirement::parse(">=2").unwrap()).unwrap().is_empty());
    let version = shelf_core::version::Version::parse("1.4.0").unwrap();
    assert!(catalog.get("foo", &version).unwrap().is_some());
}

#[test]
fn concurrent_adds_are_all_recorded() {
    let tmp = tempfile::tempdir().unwrap();
    let catalog = Arc::new(LocalCatalog::open(tmp.path().join(LOCAL_INDEX_FILE)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let catalog = Arc::clone(&catalog);
            std::thread::spawn(move || catalog.add(record(&format!("lib{i}"), "1.0")).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(catalog.installed().unwrap().len(), 8);
}
