//! Filesystem layout of everything shelf persists.
//!
//! ```text
//! <data>/remote/remote_index.json   published catalog
//! <data>/remote/remote_state.json   last refresh time
//! <data>/local_index.json           installed libraries
//! <data>/libraries/<name>/          install locations
//! <cache>/downloads/<name>/         archives while installing
//! <cache>/staging/<name>-<version>/ extraction scratch space
//! ```

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    data_dir: PathBuf,
    cache_dir: PathBuf,
}

impl Layout {
    pub fn new(data_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Layout rooted at the per-user data and cache directories.
    pub fn from_env() -> Self {
        Self::new(shelf_util::dirs::data_dir(), shelf_util::dirs::cache_dir())
    }

    /// Everything under one root, as used by tests and `SHELF_HOME`-style setups.
    pub fn rooted(root: &Path) -> Self {
        Self::new(root.join("data"), root.join("cache"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn remote_dir(&self) -> PathBuf {
        self.data_dir.join("remote")
    }

    pub fn local_index_path(&self) -> PathBuf {
        self.data_dir.join("local_index.json")
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.data_dir.join("libraries")
    }

    /// Canonical install location of a library.
    pub fn install_dir(&self, name: &str) -> PathBuf {
        self.libraries_dir().join(name)
    }

    pub fn downloads_dir(&self, name: &str) -> PathBuf {
        self.cache_dir.join("downloads").join(name)
    }

    pub fn staging_dir(&self, name: &str, version: &str) -> PathBuf {
        self.cache_dir
            .join("staging")
            .join(format!("{name}-{version}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_layout_paths() {
        let layout = Layout::rooted(Path::new("/tmp/shelf"));
        assert_eq!(
            layout.local_index_path(),
            Path::new("/tmp/shelf/data/local_index.json")
        );
        assert_eq!(
            layout.install_dir("gears"),
            Path::new("/tmp/shelf/data/libraries/gears")
        );
        assert_eq!(
            layout.downloads_dir("gears"),
            Path::new("/tmp/shelf/cache/downloads/gears")
        );
        assert_eq!(
            layout.staging_dir("gears", "1.0.0"),
            Path::new("/tmp/shelf/cache/staging/gears-1.0.0")
        );
        assert_eq!(layout.remote_dir(), Path::new("/tmp/shelf/data/remote"));
    }
}
