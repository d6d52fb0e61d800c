//! Operation: remove installed libraries.

use std::path::PathBuf;

use shelf_catalog::local::LocalCatalog;
use shelf_core::layout::Layout;
use shelf_core::library::LibraryRecord;
use shelf_core::name::validate_name;
use shelf_util::errors::ShelfError;

use crate::context::Context;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed { name: String, version: String },
    /// Files without a local index entry were deleted.
    Orphan { name: String, path: PathBuf },
    Missing { name: String },
}

/// Delete an installed library and its local index entry.
///
/// `name` must be a plain directory name; see [`validate_name`].
/// Untracked files at the canonical install location are removed as an
/// orphan. With nothing to remove, returns `Missing` if `missing_ok`,
/// otherwise `NotInstalled`.
pub fn remove_library(
    local: &LocalCatalog,
    layout: &Layout,
    name: &str,
    missing_ok: bool,
) -> Result<RemoveOutcome, ShelfError> {
    validate_name(name)?;
    let canonical = layout.install_dir(name);
    match local.installed_record(name)? {
        Some(record) => {
            shelf_util::fs::remove_dir_if_exists(&record.location)?;
            if record.location != canonical {
                shelf_util::fs::remove_dir_if_exists(&canonical)?;
            }
            local.remove(name)?;
            tracing::info!("Removed {name} {}", record.version());
            Ok(RemoveOutcome::Removed {
                name: name.to_string(),
                version: record.version().to_string(),
            })
        }
        None if canonical.exists() => {
            tracing::warn!("Removing untracked files for {name} at {}", canonical.display());
            shelf_util::fs::remove_dir_if_exists(&canonical)?;
            Ok(RemoveOutcome::Orphan {
                name: name.to_string(),
                path: canonical,
            })
        }
        None if missing_ok => Ok(RemoveOutcome::Missing {
            name: name.to_string(),
        }),
        None => Err(ShelfError::NotInstalled {
            name: name.to_string(),
        }),
    }
}

/// `shelf remove <name>...`: every name must be installed (or left behind as
/// untracked files). Stops at the first failure.
pub fn remove(ctx: &Context, names: &[String]) -> miette::Result<Vec<RemoveOutcome>> {
    let local = ctx.local_catalog();
    let mut outcomes = Vec::with_capacity(names.len());
    for name in names {
        let outcome = remove_library(&local, &ctx.layout, name, false)?;
        match &outcome {
            RemoveOutcome::Removed { name, version } => {
                shelf_util::progress::status("Removed", &format!("{name} {version}"))
            }
            RemoveOutcome::Orphan { name, path } => shelf_util::progress::status_warn(
                "Removed",
                &format!("untracked files for {name} at {}", path.display()),
            ),
            RemoveOutcome::Missing { .. } => {}
        }
        outcomes.push(outcome);
    }
    Ok(outcomes)
}
