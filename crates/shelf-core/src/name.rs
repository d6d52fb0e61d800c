//! Library names double as directory names under `libraries/`.

use std::path::{Component, Path};

use shelf_util::errors::ShelfError;

/// Check that `name` is usable as exactly one directory name.
///
/// Rejects blank names, `.` and `..`, path separators and anything the
/// platform reads as absolute or prefixed.
pub fn validate_name(name: &str) -> Result<(), ShelfError> {
    let invalid = |reason: &str| {
        Err(ShelfError::InvalidLibraryName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };
    if name.trim().is_empty() {
        return invalid("name is empty");
    }
    if name == "." || name == ".." {
        return invalid("name refers to a directory");
    }
    if name.contains(['/', '\\']) {
        return invalid("name contains a path separator");
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => invalid("name is not a plain directory name"),
    }
}
