mod common;

use std::sync::Arc;

use common::{lib, FakeFetcher};
use shelf_catalog::local::LocalCatalog;
use shelf_catalog::remote::RemoteCatalog;
use shelf_core::constraint::Requirement;
use shelf_core::layout::Layout;
use shelf_core::library::{LibraryRecord, RemoteLibrary};
use shelf_core::version::Version;
use shelf_ops::ops_install::{install_concurrent, InstallOptions, InstallOutcome, Installer, RemoveOutcome};
use shelf_resolver::resolver::resolve;
use shelf_util::errors::ShelfError;
use tempfile::TempDir;

struct Fixture {
    tmp: TempDir,
    layout: Layout,
    fetcher: Arc<FakeFetcher>,
    installer: Installer,
}

fn fixture(records: Vec<RemoteLibrary>) -> Fixture {
    let tmp = TempDir::new().unwrap();
    let layout = Layout::rooted(tmp.path());
    let fetcher = Arc::new(FakeFetcher::default());
    let installer = Installer::new(
        Arc::new(RemoteCatalog::from_libraries(records)),
        Arc::new(LocalCatalog::open(layout.local_index_path())),
        fetcher.clone(),
        layout.clone(),
    );
    Fixture {
        tmp,
        layout,
        fetcher,
        installer,
    }
}

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn foo_bar() -> Vec<RemoteLibrary> {
    vec![
        lib("foo", "1.0.0", &[]),
        lib("foo", "2.0.0", &[("bar", "^1.0.0")]),
        lib("bar", "1.2.0", &[]),
    ]
}

#[test]
fn resolve_then_install_everything() {
    let fx = fixture(foo_bar());
    let resolution = resolve(fx.installer.remote(), "foo", &Requirement::parse(">=1.0.0").unwrap()).unwrap();
    let outcomes = fx
        .installer
        .install_resolved(&resolution.install_order(), InstallOptions::default())
        .unwrap();
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(InstallOutcome::changed));

    let installed = fx.installer.local().installed().unwrap();
    let summary: Vec<(String, String)> = installed
        .iter()
        .map(|r| (r.name().to_string(), r.version().to_string()))
        .collect();
    assert_eq!(
        summary,
        [("bar".to_string(), "1.2.0".to_string()), ("foo".to_string(), "2.0.0".to_string())]
    );
    for record in &installed {
        assert_eq!(record.location, fx.layout.install_dir(record.name()));
        let source = record.location.join(format!("{}.scad", record.name()));
        assert_eq!(std::fs::read_to_string(source).unwrap(), record.version());
    }
    assert!(!fx.layout.downloads_dir("foo").exists());
}

#[test]
fn second_install_is_a_no_op() {
    let fx = fixture(foo_bar());
    let first = fx.installer.install("foo", &v("2.0.0"), InstallOptions::default()).unwrap();
    assert!(matches!(first, InstallOutcome::Installed { .. }));
    let second = fx.installer.install("foo", &v("2.0.0"), InstallOptions::default()).unwrap();
    assert!(matches!(second, InstallOutcome::AlreadyInstalled { .. }));
    assert_eq!(fx.fetcher.downloads(), 1);
    assert_eq!(fx.installer.local().installed().unwrap().len(), 1);
}

#[test]
fn reinstall_downloads_again() {
    let fx = fixture(foo_bar());
    fx.installer.install("bar", &v("1.2.0"), InstallOptions::default()).unwrap();
    let outcome = fx
        .installer
        .install("bar", &v("1.2.0"), InstallOptions { reinstall: true, ..Default::default() })
        .unwrap();
    assert!(matches!(outcome, InstallOutcome::Replaced { .. }));
    assert_eq!(fx.fetcher.downloads(), 2);
    assert_eq!(fx.installer.local().installed().unwrap().len(), 1);
}

#[test]
fn different_version_needs_force() {
    let fx = fixture(foo_bar());
    fx.installer.install("foo", &v("1.0.0"), InstallOptions::default()).unwrap();

    let err = fx.installer.install("foo", &v("2.0.0"), InstallOptions::default()).unwrap_err();
    match err {
        ShelfError::ConflictingVersionInstalled { name, installed, requested } => {
            assert_eq!(name, "foo");
            assert_eq!(installed, "1.0.0");
            assert_eq!(requested, "2.0.0");
        }
        other => panic!("unexpected error: {other}"),
    }

    let outcome = fx
        .installer
        .install("foo", &v("2.0.0"), InstallOptions { force: true, ..Default::default() })
        .unwrap();
    assert_eq!(
        outcome,
        InstallOutcome::Replaced {
            name: "foo".into(),
            version: "2.0.0".into(),
            previous: "1.0.0".into(),
        }
    );
    let record = fx.installer.local().installed_record("foo").unwrap().unwrap();
    assert_eq!(record.version(), "2.0.0");
}

#[test]
fn unknown_version_leaves_existing_install_alone() {
    let fx = fixture(foo_bar());
    fx.installer.install("foo", &v("1.0.0"), InstallOptions::default()).unwrap();
    let err = fx
        .installer
        .install("foo", &v("9.9"), InstallOptions { force: true, ..Default::default() })
        .unwrap_err();
    assert!(matches!(err, ShelfError::NotFoundInIndex { .. }));
    let record = fx.installer.local().installed_record("foo").unwrap().unwrap();
    assert_eq!(record.version(), "1.0.0");
    assert!(fx.layout.install_dir("foo").is_dir());
}

#[test]
fn untracked_directory_blocks_install_unless_forced() {
    let fx = fixture(foo_bar());
    let dir = fx.layout.install_dir("bar");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("leftover.txt"), "x").unwrap();

    let err = fx.installer.install("bar", &v("1.2.0"), InstallOptions::default()).unwrap_err();
    assert!(matches!(err, ShelfError::OrphanInstall { .. }));
    assert_eq!(fx.fetcher.downloads(), 0);

    fx.installer
        .install("bar", &v("1.2.0"), InstallOptions { force: true, ..Default::default() })
        .unwrap();
    assert!(!dir.join("leftover.txt").exists());
    assert!(dir.join("bar.scad").is_file());
}

#[test]
fn remove_outcomes() {
    let fx = fixture(foo_bar());
    fx.installer.install("bar", &v("1.2.0"), InstallOptions::default()).unwrap();

    let removed = fx.installer.remove_library("bar", false).unwrap();
    assert_eq!(
        removed,
        RemoveOutcome::Removed { name: "bar".into(), version: "1.2.0".into() }
    );
    assert!(!fx.layout.install_dir("bar").exists());
    assert!(fx.installer.local().installed().unwrap().is_empty());

    assert_eq!(
        fx.installer.remove_library("bar", true).unwrap(),
        RemoveOutcome::Missing { name: "bar".into() }
    );
    let err = fx.installer.remove_library("bar", false).unwrap_err();
    assert!(matches!(err, ShelfError::NotInstalled { .. }));

    std::fs::create_dir_all(fx.layout.install_dir("ghost")).unwrap();
    let orphan = fx.installer.remove_library("ghost", false).unwrap();
    assert!(matches!(orphan, RemoveOutcome::Orphan { .. }));
    assert!(!fx.layout.install_dir("ghost").exists());
}

#[test]
fn remove_refuses_names_outside_the_libraries_dir() {
    let fx = fixture(foo_bar());
    let outside = fx.tmp.path().join("precious");
    std::fs::create_dir_all(&outside).unwrap();
    std::fs::write(outside.join("keep.txt"), "x").unwrap();

    let absolute = outside.to_string_lossy().into_owned();
    for name in [absolute.as_str(), "..", "../precious", "."] {
        let err = fx.installer.remove_library(name, true).unwrap_err();
        assert!(matches!(err, ShelfError::InvalidLibraryName { .. }), "{name}");
    }
    assert!(outside.join("keep.txt").is_file());
}

#[test]
fn install_refuses_path_like_names() {
    let fx = fixture(foo_bar());
    let outside = fx.tmp.path().join("precious");
    std::fs::create_dir_all(&outside).unwrap();

    let absolute = outside.to_string_lossy().into_owned();
    let options = InstallOptions { force: true, reinstall: true };
    for name in [absolute.as_str(), "../precious"] {
        let err = fx.installer.install(name, &v("1.0.0"), options).unwrap_err();
        assert!(matches!(err, ShelfError::InvalidLibraryName { .. }), "{name}");
    }
    assert!(outside.is_dir());
    assert_eq!(fx.fetcher.downloads(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_install_records_every_library() {
    let records: Vec<RemoteLibrary> = (0..6).map(|i| lib(&format!("lib{i}"), "1.0", &[])).collect();
    let fx = fixture(records);
    let list: Vec<(String, Version)> = (0..6).map(|i| (format!("lib{i}"), v("1.0"))).collect();

    let outcomes = install_concurrent(&fx.installer, list, InstallOptions::default(), 3)
        .await
        .unwrap();
    let names: Vec<&str> = outcomes.iter().map(InstallOutcome::name).collect();
    assert_eq!(names, ["lib0", "lib1", "lib2", "lib3", "lib4", "lib5"]);
    assert_eq!(fx.installer.local().installed().unwrap().len(), 6);
}

#[tokio::test]
async fn concurrent_install_reports_failures() {
    let fx = fixture(vec![lib("ok", "1.0", &[])]);
    let list = vec![("ok".to_string(), v("1.0")), ("missing".to_string(), v("1.0"))];
    let err = install_concurrent(&fx.installer, list, InstallOptions::default(), 2)
        .await
        .unwrap_err();
    assert!(matches!(err, ShelfError::NotFoundInIndex { .. }));
    assert!(fx.installer.local().installed_record("ok").unwrap().is_some());
}
