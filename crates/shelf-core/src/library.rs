//! Catalog records and the JSON documents that persist them.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use shelf_util::errors::ShelfError;

use crate::manifest::Manifest;

/// Common access to the manifest inside any catalog record.
pub trait LibraryRecord {
    fn manifest(&self) -> &Manifest;

    fn name(&self) -> &str {
        self.manifest().name()
    }

    fn version(&self) -> &str {
        self.manifest().version()
    }
}

/// A published library version, as listed in the remote index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteLibrary {
    pub manifest: Manifest,
    pub download_link: String,
}

impl LibraryRecord for RemoteLibrary {
    fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

/// An installed library, as recorded in the local index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalLibrary {
    pub manifest: Manifest,
    pub location: PathBuf,
    #[serde(
        serialize_with = "serialize_timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub date_added: SystemTime,
}

impl LocalLibrary {
    pub fn new(manifest: Manifest, location: &Path, date_added: SystemTime) -> Self {
        Self {
            manifest,
            location: location.to_path_buf(),
            date_added,
        }
    }
}

impl LibraryRecord for LocalLibrary {
    fn manifest(&self) -> &Manifest {
        &self.manifest
    }
}

/// `remote_index.json`: every published version of every library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteIndexDocument {
    #[serde(default)]
    pub libraries: Vec<RemoteLibrary>,
}

/// `local_index.json`: one record per installed library.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalIndexDocument {
    #[serde(default)]
    pub libraries: Vec<LocalLibrary>,
}

impl RemoteIndexDocument {
    pub fn from_slice(data: &[u8]) -> Result<Self, ShelfError> {
        serde_json::from_slice(data).map_err(|e| ShelfError::Catalog {
            message: format!("Failed to parse remote index: {e}"),
        })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, ShelfError> {
        serde_json::to_vec_pretty(self).map_err(|e| ShelfError::Catalog {
            message: format!("Failed to serialize remote index: {e}"),
        })
    }
}

impl LocalIndexDocument {
    pub fn from_slice(data: &[u8]) -> Result<Self, ShelfError> {
        serde_json::from_slice(data).map_err(|e| ShelfError::Catalog {
            message: format!("Failed to parse local index: {e}"),
        })
    }

    pub fn to_vec(&self) -> Result<Vec<u8>, ShelfError> {
        serde_json::to_vec_pretty(self).map_err(|e| ShelfError::Catalog {
            message: format!("Failed to serialize local index: {e}"),
        })
    }
}

/// Seconds since the UNIX epoch as a float.
pub fn unix_seconds(time: SystemTime) -> f64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

fn serialize_timestamp<S: Serializer>(time: &SystemTime, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_f64(unix_seconds(*time))
}

fn deserialize_timestamp<'de, D: Deserializer<'de>>(d: D) -> Result<SystemTime, D::Error> {
    let secs = f64::deserialize(d)?;
    Duration::try_from_secs_f64(secs)
        .ok()
        .and_then(|since| UNIX_EPOCH.checked_add(since))
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp {secs}")))
}
