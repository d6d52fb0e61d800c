//! Read access shared by the remote and local catalogs.

use shelf_core::constraint::Requirement;
use shelf_core::library::LibraryRecord;
use shelf_core::version::{self, Version};
use shelf_util::errors::ShelfError;

/// A mapping from library name to the records known for it.
pub trait Catalog {
    type Record: LibraryRecord + Clone;

    /// Every record for `name`, in catalog order. Unknown names yield an empty list.
    fn versions(&self, name: &str) -> Result<Vec<Self::Record>, ShelfError>;

    /// All known library names, sorted.
    fn names(&self) -> Result<Vec<String>, ShelfError>;

    /// The record for `name` whose version equals `version`.
    fn get(&self, name: &str, version: &Version) -> Result<Option<Self::Record>, ShelfError> {
        Ok(self
            .versions(name)?
            .into_iter()
            .find(|record| {
                record
                    .manifest()
                    .parsed_version()
                    .is_ok_and(|v| &v == version)
            }))
    }

    /// Records for `name` accepted by `requirement`, newest first.
    fn search(&self, name: &str, requirement: &Requirement) -> Result<Vec<Self::Record>, ShelfError> {
        let mut matches = Vec::new();
        for record in self.versions(name)? {
            match record.manifest().parsed_version() {
                Ok(v) if requirement.matches(&v) => matches.push((v, record)),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!("Skipping `{name}` record with unusable version: {e}");
                }
            }
        }
        version::sort_by_version(&mut matches, true, |(v, _)| v);
        Ok(matches.into_iter().map(|(_, record)| record).collect())
    }
}
