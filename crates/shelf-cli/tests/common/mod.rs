#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A throwaway `SHELF_HOME` plus a published index served from `file://` URLs.
pub struct Sandbox {
    pub tmp: TempDir,
}

impl Sandbox {
    /// Publishes foo 1.0.0, foo 2.0.0 (needs bar ^1.0.0) and bar 1.2.0.
    pub fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let published = tmp.path().join("published");
        std::fs::create_dir_all(&published).unwrap();

        let mut libraries = Vec::new();
        for (name, version, deps) in [
            ("foo", "1.0.0", serde_json::json!({})),
            ("foo", "2.0.0", serde_json::json!({"bar": "^1.0.0"})),
            ("bar", "1.2.0", serde_json::json!({})),
        ] {
            let archive = published.join(format!("{name}-{version}.zip"));
            write_zip(&archive, name, version);
            libraries.push(serde_json::json!({
                "manifest": {
                    "manifest_version": "1.0.0",
                    "library": {
                        "name": name,
                        "version": version,
                        "short_description": format!("The {name} library"),
                    },
                    "dependencies": deps,
                    "urls": {"repository": format!("https://example.com/{name}")}
                },
                "download_link": file_url(&archive),
            }));
        }
        let index = published.join("remote_index.json");
        std::fs::write(
            &index,
            serde_json::to_vec_pretty(&serde_json::json!({"libraries": libraries})).unwrap(),
        )
        .unwrap();

        let config_dir = tmp.path().join("home").join("config");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            format!("[index]\nurl = \"{}\"\n", file_url(&index)),
        )
        .unwrap();

        Self { tmp }
    }

    pub fn home(&self) -> PathBuf {
        self.tmp.path().join("home")
    }

    #[allow(deprecated)]
    pub fn shelf(&self) -> Command {
        let mut cmd = Command::cargo_bin("shelf").unwrap();
        cmd.env("SHELF_HOME", self.home()).env_remove("RUST_LOG");
        cmd
    }
}

fn file_url(path: &Path) -> String {
    format!("file://{}", path.display())
}

fn write_zip(path: &Path, name: &str, version: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file(
        format!("{name}-{version}/{name}.scad"),
        zip::write::SimpleFileOptions::default(),
    )
    .unwrap();
    zip.write_all(version.as_bytes()).unwrap();
    zip.finish().unwrap();
}
