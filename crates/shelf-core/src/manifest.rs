use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use shelf_util::errors::ShelfError;

use crate::constraint::Requirement;
use crate::name::validate_name;
use crate::version::Version;

/// The manifest a library publishes for one of its versions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub manifest_version: String,

    pub library: LibraryMetadata,

    /// Dependency name to constraint string. An empty string accepts any version.
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,

    pub urls: Urls,
}

/// Identity and descriptive metadata from the `library` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryMetadata {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub long_description: String,
    #[serde(default)]
    pub authors: Vec<Person>,
    #[serde(default)]
    pub maintainers: Vec<Person>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// An author or maintainer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
}

/// License information: a license file shipped with the library, an SPDX identifier, or both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl License {
    /// Whether any license information is present.
    pub fn is_specified(&self) -> bool {
        self.file.is_some() || self.identifier.is_some()
    }
}

/// Project links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Urls {
    pub repository: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default)]
    pub preview_images: Vec<String>,
}

impl Manifest {
    /// Parse a manifest from a JSON string.
    pub fn parse_json(content: &str) -> Result<Self, ShelfError> {
        let manifest: Manifest =
            serde_json::from_str(content).map_err(|e| ShelfError::Catalog {
                message: format!("Failed to parse manifest: {e}"),
            })?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Check the fields every consumer relies on.
    pub fn validate(&self) -> Result<(), ShelfError> {
        let lib = &self.library;
        let blank = |field: &str| ShelfError::Catalog {
            message: format!(
                "Manifest for `{}` has an empty `{field}` field",
                if lib.name.trim().is_empty() { "<unnamed>" } else { &lib.name }
            ),
        };
        if lib.name.trim().is_empty() {
            return Err(blank("library.name"));
        }
        if lib.version.trim().is_empty() {
            return Err(blank("library.version"));
        }
        if self.urls.repository.trim().is_empty() {
            return Err(blank("urls.repository"));
        }
        if let Some(dep) = self.dependencies.keys().find(|d| d.trim().is_empty()) {
            return Err(ShelfError::Catalog {
                message: format!("Manifest for `{}` lists a dependency with no name: {dep:?}", lib.name),
            });
        }
        validate_name(&lib.name)?;
        for dep in self.dependencies.keys() {
            validate_name(dep)?;
        }
        self.parsed_version()?;
        self.requirements()?;
        Ok(())
    }

    /// The library version, parsed.
    pub fn parsed_version(&self) -> Result<Version, ShelfError> {
        Version::parse(&self.library.version)
    }

    /// Dependencies with their constraint text parsed, in name order.
    pub fn requirements(&self) -> Result<Vec<(&str, Requirement)>, ShelfError> {
        self.dependencies
            .iter()
            .map(|(name, raw)| Ok((name.as_str(), Requirement::parse(raw)?)))
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.library.name
    }

    pub fn version(&self) -> &str {
        &self.library.version
    }
}
