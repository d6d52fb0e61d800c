//! The remote catalog: every published library version, read from a local
//! copy of the remote index document.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use shelf_core::library::{unix_seconds, LibraryRecord, RemoteIndexDocument, RemoteLibrary};
use shelf_core::version::Version;
use shelf_util::errors::ShelfError;
use shelf_util::group::group_by_key;

use crate::catalog::Catalog;
use crate::fetch::IndexFetcher;

/// File name of the local copy of the remote index.
pub const REMOTE_INDEX_FILE: &str = "remote_index.json";

/// File name of the refresh bookkeeping next to the index.
pub const REMOTE_STATE_FILE: &str = "remote_state.json";

/// In-memory view of the remote index.
#[derive(Debug, Clone, Default)]
pub struct RemoteCatalog {
    libraries: BTreeMap<String, Vec<RemoteLibrary>>,
}

impl RemoteCatalog {
    /// Build a catalog from records, dropping any whose manifest does not validate.
    pub fn from_libraries<I>(records: I) -> Self
    where
        I: IntoIterator<Item = RemoteLibrary>,
    {
        let valid = records.into_iter().filter(|record| match record.manifest.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Ignoring invalid remote index entry: {e}");
                false
            }
        });
        let libraries = group_by_key(valid, |record| record.name().to_string())
            .into_iter()
            .collect();
        Self { libraries }
    }

    pub fn from_document(doc: RemoteIndexDocument) -> Self {
        Self::from_libraries(doc.libraries)
    }

    /// Path of the index document inside `dir`.
    pub fn index_path(dir: &Path) -> PathBuf {
        dir.join(REMOTE_INDEX_FILE)
    }

    /// Load the index previously downloaded into `dir`.
    pub fn load(dir: &Path) -> Result<Self, ShelfError> {
        let path = Self::index_path(dir);
        if !path.is_file() {
            return Err(ShelfError::IndexMissing { path });
        }
        let data = std::fs::read(&path)?;
        let catalog = Self::from_document(RemoteIndexDocument::from_slice(&data)?);
        tracing::debug!(
            "Loaded remote index from {} ({} libraries)",
            path.display(),
            catalog.libraries.len()
        );
        Ok(catalog)
    }

    /// The record for an exact version, or `NotFoundInIndex`.
    pub fn require(&self, name: &str, version: &Version) -> Result<RemoteLibrary, ShelfError> {
        self.get(name, version)?
            .ok_or_else(|| ShelfError::NotFoundInIndex {
                name: name.to_string(),
                constraint: format!("={version}"),
            })
    }

    /// The newest published version of `name`.
    pub fn latest(&self, name: &str) -> Result<Option<RemoteLibrary>, ShelfError> {
        Ok(self.search(name, &Default::default())?.into_iter().next())
    }

    /// Number of distinct library names.
    pub fn len(&self) -> usize {
        self.libraries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty()
    }

    /// Refresh the copy of the remote index in `dir` when it is missing,
    /// older than `max_age`, or `force` is set. Returns whether a fetch happened.
    ///
    /// The fetched document must parse before it replaces the current copy.
    pub fn ensure_fresh(
        dir: &Path,
        fetcher: &dyn IndexFetcher,
        url: &str,
        force: bool,
        max_age: Duration,
    ) -> Result<bool, ShelfError> {
        let index_path = Self::index_path(dir);
        let now = SystemTime::now();
        if !force && index_path.is_file() {
            if let Some(state) = RemoteState::load(dir)? {
                if !state.is_stale(now, max_age) {
                    tracing::debug!("Remote index is fresh, skipping update");
                    return Ok(false);
                }
            }
        }

        tracing::info!("Fetching remote index from {url}");
        let data = fetcher.fetch_index(url)?;
        let doc = RemoteIndexDocument::from_slice(&data)?;
        shelf_util::fs::atomic_write(&index_path, &data)?;
        RemoteState::at(now).save(dir)?;
        tracing::info!(
            "Remote index updated: {} records written to {}",
            doc.libraries.len(),
            index_path.display()
        );
        Ok(true)
    }
}

impl Catalog for RemoteCatalog {
    type Record = RemoteLibrary;

    fn versions(&self, name: &str) -> Result<Vec<RemoteLibrary>, ShelfError> {
        Ok(self.libraries.get(name).cloned().unwrap_or_default())
    }

    fn names(&self) -> Result<Vec<String>, ShelfError> {
        Ok(self.libraries.keys().cloned().collect())
    }
}

/// Persisted refresh bookkeeping for the remote index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RemoteState {
    /// UNIX seconds of the last successful fetch.
    pub last_update: f64,
}

impl RemoteState {
    pub fn at(time: SystemTime) -> Self {
        Self {
            last_update: unix_seconds(time),
        }
    }

    pub fn path(dir: &Path) -> PathBuf {
        dir.join(REMOTE_STATE_FILE)
    }

    /// Read the state in `dir`; `None` if it was never written or is unreadable.
    pub fn load(dir: &Path) -> Result<Option<Self>, ShelfError> {
        let path = Self::path(dir);
        if !path.is_file() {
            return Ok(None);
        }
        let data = std::fs::read(&path)?;
        match serde_json::from_slice(&data) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                tracing::warn!("Ignoring unreadable {}: {e}", path.display());
                Ok(None)
            }
        }
    }

    pub fn save(&self, dir: &Path) -> Result<(), ShelfError> {
        let data = serde_json::to_vec_pretty(self).map_err(|e| ShelfError::Catalog {
            message: format!("Failed to serialize remote state: {e}"),
        })?;
        shelf_util::fs::atomic_write(&Self::path(dir), &data)?;
        Ok(())
    }

    /// Whether more than `max_age` has passed since the last update.
    pub fn is_stale(&self, now: SystemTime, max_age: Duration) -> bool {
        let elapsed = unix_seconds(now) - self.last_update;
        elapsed < 0.0 || elapsed > max_age.as_secs_f64()
    }
}
