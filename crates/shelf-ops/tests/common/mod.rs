#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use shelf_catalog::fetch::ArtifactFetcher;
use shelf_core::library::RemoteLibrary;
use shelf_core::manifest::Manifest;
use shelf_util::errors::ShelfError;

/// A remote record whose download link is `mem://<name>/<version>`.
pub fn lib(name: &str, version: &str, deps: &[(&str, &str)]) -> RemoteLibrary {
    lib_with_link(name, version, deps, &format!("mem://{name}/{version}"))
}

pub fn lib_with_link(name: &str, version: &str, deps: &[(&str, &str)], link: &str) -> RemoteLibrary {
    let dependencies: serde_json::Map<String, serde_json::Value> = deps
        .iter()
        .map(|(n, c)| (n.to_string(), serde_json::Value::String(c.to_string())))
        .collect();
    let manifest: Manifest = serde_json::from_value(serde_json::json!({
        "manifest_version": "1.0.0",
        "library": {
            "name": name,
            "version": version,
            "short_description": format!("The {name} library"),
        },
        "dependencies": dependencies,
        "urls": {"repository": format!("https://example.com/{name}")}
    }))
    .unwrap();
    RemoteLibrary {
        manifest,
        download_link: link.to_string(),
    }
}

/// Write a zip whose single top-level directory holds `<name>.scad` with `version` as content.
pub fn write_library_zip(path: &Path, name: &str, version: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    zip.start_file(format!("{name}-{version}/{name}.scad"), options)
        .unwrap();
    zip.write_all(version.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// Serves `mem://<name>/<version>` links by writing a fresh zip.
#[derive(Default)]
pub struct FakeFetcher {
    pub downloads: AtomicUsize,
}

impl FakeFetcher {
    pub fn downloads(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

impl ArtifactFetcher for FakeFetcher {
    fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ShelfError> {
        let rest = url.strip_prefix("mem://").ok_or_else(|| ShelfError::Network {
            message: format!("unsupported url {url}"),
        })?;
        let (name, version) = rest.split_once('/').ok_or_else(|| ShelfError::Network {
            message: format!("bad url {url}"),
        })?;
        self.downloads.fetch_add(1, Ordering::SeqCst);
        std::fs::create_dir_all(dest_dir)?;
        let path = dest_dir.join(format!("{name}-{version}.zip"));
        write_library_zip(&path, name, version);
        Ok(path)
    }
}
