//! The local catalog: one record per installed library, persisted in
//! `local_index.json` and re-read on every operation.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use shelf_core::library::{LibraryRecord, LocalIndexDocument, LocalLibrary};
use shelf_util::errors::ShelfError;
use shelf_util::group::group_by_key;

use crate::catalog::Catalog;

/// File name of the local index inside the data directory.
pub const LOCAL_INDEX_FILE: &str = "local_index.json";

#[derive(Debug)]
pub struct LocalCatalog {
    path: PathBuf,
    /// Serialises read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl LocalCatalog {
    /// Open the catalog backed by `path`. A missing file reads as empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Register a freshly installed library.
    pub fn add(&self, record: LocalLibrary) -> Result<(), ShelfError> {
        let _guard = self.lock();
        let mut records = self.load()?;
        if let Some(existing) = records.get(record.name()) {
            return Err(ShelfError::AlreadyInstalled {
                name: existing.name().to_string(),
                version: existing.version().to_string(),
            });
        }
        tracing::debug!("Recording {} {} in the local index", record.name(), record.version());
        records.insert(record.name().to_string(), record);
        self.store(records)
    }

    /// Drop the record for `name`. Returns whether one existed.
    pub fn remove(&self, name: &str) -> Result<bool, ShelfError> {
        let _guard = self.lock();
        let mut records = self.load()?;
        if records.remove(name).is_none() {
            return Ok(false);
        }
        self.store(records)?;
        Ok(true)
    }

    /// Drop the record for `name`, failing with `NotInstalled` when there is none.
    pub fn remove_strict(&self, name: &str) -> Result<LocalLibrary, ShelfError> {
        let _guard = self.lock();
        let mut records = self.load()?;
        let removed = records.remove(name).ok_or_else(|| ShelfError::NotInstalled {
            name: name.to_string(),
        })?;
        self.store(records)?;
        Ok(removed)
    }

    /// The single record for `name`, if installed.
    pub fn installed_record(&self, name: &str) -> Result<Option<LocalLibrary>, ShelfError> {
        Ok(self.load()?.remove(name))
    }

    /// Every installed library, sorted by name.
    pub fn installed(&self) -> Result<Vec<LocalLibrary>, ShelfError> {
        Ok(self.load()?.into_values().collect())
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load(&self) -> Result<BTreeMap<String, LocalLibrary>, ShelfError> {
        if !self.path.is_file() {
            return Ok(BTreeMap::new());
        }
        let data = std::fs::read(&self.path)?;
        let doc = LocalIndexDocument::from_slice(&data)?;

        let mut records = BTreeMap::new();
        for (name, mut group) in group_by_key(doc.libraries, |r| r.name().to_string()) {
            if group.len() > 1 {
                return Err(ShelfError::CorruptedLocalCatalog {
                    name,
                    count: group.len(),
                });
            }
            if let Some(record) = group.pop() {
                records.insert(name, record);
            }
        }
        Ok(records)
    }

    fn store(&self, records: BTreeMap<String, LocalLibrary>) -> Result<(), ShelfError> {
        let doc = LocalIndexDocument {
            libraries: records.into_values().collect(),
        };
        shelf_util::fs::atomic_write(&self.path, &doc.to_vec()?)?;
        Ok(())
    }
}

impl Catalog for LocalCatalog {
    type Record = LocalLibrary;

    fn versions(&self, name: &str) -> Result<Vec<LocalLibrary>, ShelfError> {
        Ok(self.installed_record(name)?.into_iter().collect())
    }

    fn names(&self) -> Result<Vec<String>, ShelfError> {
        Ok(self.load()?.into_keys().collect())
    }
}
