//! Operation: install libraries, and the installer that moves a single
//! library version between the remote catalog and the local one.

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use shelf_catalog::fetch::{ArtifactFetcher, IndexFetcher};
use shelf_catalog::local::LocalCatalog;
use shelf_catalog::remote::RemoteCatalog;
use shelf_core::constraint::Requirement;
use shelf_core::layout::Layout;
use shelf_core::library::{LibraryRecord, LocalLibrary};
use shelf_core::name::validate_name;
use shelf_core::reference::LibraryRef;
use shelf_core::version::Version;
use shelf_resolver::resolver;
use shelf_util::errors::ShelfError;

use crate::context::Context;
pub use crate::ops_remove::RemoveOutcome;

/// Flags for `shelf install`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Replace an installed library of a different version.
    pub force: bool,
    /// Install again even when the same version is already installed.
    pub reinstall: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed { name: String, version: String },
    AlreadyInstalled { name: String, version: String },
    Replaced { name: String, version: String, previous: String },
}

impl InstallOutcome {
    pub fn name(&self) -> &str {
        match self {
            Self::Installed { name, .. }
            | Self::AlreadyInstalled { name, .. }
            | Self::Replaced { name, .. } => name,
        }
    }

    /// Whether anything was written to disk.
    pub fn changed(&self) -> bool {
        !matches!(self, Self::AlreadyInstalled { .. })
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed { name, version } => write!(f, "{name} {version}"),
            Self::AlreadyInstalled { name, version } => {
                write!(f, "{name} {version} (already installed)")
            }
            Self::Replaced {
                name,
                version,
                previous,
            } => write!(f, "{name} {version} (replaced {previous})"),
        }
    }
}

/// Installs and removes single library versions.
///
/// Cheap to clone; every clone shares the same catalogs and fetcher.
#[derive(Clone)]
pub struct Installer {
    remote: Arc<RemoteCatalog>,
    local: Arc<LocalCatalog>,
    fetcher: Arc<dyn ArtifactFetcher>,
    layout: Layout,
}

impl Installer {
    pub fn new(
        remote: Arc<RemoteCatalog>,
        local: Arc<LocalCatalog>,
        fetcher: Arc<dyn ArtifactFetcher>,
        layout: Layout,
    ) -> Self {
        Self {
            remote,
            local,
            fetcher,
            layout,
        }
    }

    pub fn local(&self) -> &LocalCatalog {
        &self.local
    }

    pub fn remote(&self) -> &RemoteCatalog {
        &self.remote
    }

    /// Install exactly `version` of `name`.
    ///
    /// The remote record is looked up before an existing install is touched.
    /// If anything fails after a replaced install was removed, the library is
    /// left uninstalled.
    pub fn install(
        &self,
        name: &str,
        version: &Version,
        options: InstallOptions,
    ) -> Result<InstallOutcome, ShelfError> {
        validate_name(name)?;
        let existing = self.local.installed_record(name)?;
        let dest = self.layout.install_dir(name);

        if let Some(record) = &existing {
            let same = match record.manifest.parsed_version() {
                Ok(installed) => &installed == version,
                Err(_) => record.version() == version.as_str(),
            };
            if same && !options.reinstall {
                tracing::debug!("{name} {version} is already installed");
                return Ok(InstallOutcome::AlreadyInstalled {
                    name: name.to_string(),
                    version: record.version().to_string(),
                });
            }
            if !same && !options.force {
                return Err(ShelfError::ConflictingVersionInstalled {
                    name: name.to_string(),
                    installed: record.version().to_string(),
                    requested: version.to_string(),
                });
            }
        } else if dest.exists() && !(options.force || options.reinstall) {
            return Err(ShelfError::OrphanInstall {
                name: name.to_string(),
                path: dest,
            });
        }

        let remote = self.remote.require(name, version)?;

        let previous = match existing {
            Some(record) => {
                if record.version() != version.as_str() {
                    tracing::warn!(
                        "Replacing {name} {} with {version}; the old install is deleted first",
                        record.version()
                    );
                }
                self.remove_library(name, true)?;
                Some(record.version().to_string())
            }
            None => None,
        };
        if shelf_util::fs::remove_dir_if_exists(&dest)? {
            tracing::warn!("Deleted untracked files at {}", dest.display());
        }

        tracing::info!("Installing {name} {version} from {}", remote.download_link);
        let downloads = self.layout.downloads_dir(name);
        let archive = self.fetcher.download(&remote.download_link, &downloads)?;
        let staging = self.layout.staging_dir(name, version.as_str());
        let extracted = self.fetcher.extract(&archive, &staging, true)?;
        shelf_util::fs::move_dir(&extracted, &dest)?;
        shelf_util::fs::remove_dir_if_exists(&downloads)?;

        self.local
            .add(LocalLibrary::new(remote.manifest, &dest, SystemTime::now()))?;

        let version = version.to_string();
        let name = name.to_string();
        Ok(match previous {
            Some(previous) => InstallOutcome::Replaced {
                name,
                version,
                previous,
            },
            None => InstallOutcome::Installed { name, version },
        })
    }

    /// Delete an installed library; see [`crate::ops_remove::remove_library`].
    pub fn remove_library(&self, name: &str, missing_ok: bool) -> Result<RemoveOutcome, ShelfError> {
        crate::ops_remove::remove_library(&self.local, &self.layout, name, missing_ok)
    }

    /// Install every `(name, version)` pair in order, stopping at the first failure.
    pub fn install_resolved(
        &self,
        list: &[(String, Version)],
        options: InstallOptions,
    ) -> Result<Vec<InstallOutcome>, ShelfError> {
        list.iter()
            .map(|(name, version)| self.install(name, version, options))
            .collect()
    }
}

/// Install every pair with up to `jobs` installs running at once.
///
/// Each install runs on the blocking pool. All started installs are awaited
/// before the first error is returned. Outcomes keep the order of `list`.
pub async fn install_concurrent(
    installer: &Installer,
    list: Vec<(String, Version)>,
    options: InstallOptions,
    jobs: usize,
) -> Result<Vec<InstallOutcome>, ShelfError> {
    let semaphore = Arc::new(Semaphore::new(jobs.max(1)));
    let mut join_set = JoinSet::new();

    for (i, (name, version)) in list.into_iter().enumerate() {
        let installer = installer.clone();
        let sem = semaphore.clone();
        join_set.spawn(async move {
            let _permit = sem.acquire_owned().await.map_err(|e| ShelfError::Generic {
                message: format!("Install queue closed: {e}"),
            })?;
            let result = tokio::task::spawn_blocking(move || installer.install(&name, &version, options))
                .await
                .map_err(|e| ShelfError::Generic {
                    message: format!("Install task failed: {e}"),
                })?;
            result.map(|outcome| (i, outcome))
        });
    }

    let mut outcomes = Vec::new();
    let mut first_error = None;
    while let Some(joined) = join_set.join_next().await {
        let result = joined.map_err(|e| ShelfError::Generic {
            message: format!("Background task failed: {e}"),
        });
        match result.and_then(|r| r) {
            Ok(entry) => outcomes.push(entry),
            Err(e) => {
                tracing::debug!("Install failed: {e}");
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }
    outcomes.sort_by_key(|(i, _)| *i);
    Ok(outcomes.into_iter().map(|(_, outcome)| outcome).collect())
}

/// `shelf install <ref>...`: refresh the index if stale, resolve every
/// reference together, then install dependencies before dependents.
pub fn install(
    ctx: &Context,
    index: &dyn IndexFetcher,
    fetcher: Arc<dyn ArtifactFetcher>,
    refs: &[LibraryRef],
    options: InstallOptions,
) -> miette::Result<Vec<InstallOutcome>> {
    ctx.refresh_index(index, false)?;
    let remote = Arc::new(ctx.remote_catalog()?);

    let roots = refs
        .iter()
        .map(|r| Ok((r.name.clone(), r.requirement()?)))
        .collect::<Result<Vec<(String, Requirement)>, ShelfError>>()?;

    let sp = shelf_util::progress::spinner("Resolving dependencies...");
    let resolution = resolver::resolve_all(remote.as_ref(), &roots);
    sp.finish_and_clear();
    let order = resolution?.install_order();

    let installer = Installer::new(
        remote,
        Arc::new(ctx.local_catalog()),
        fetcher,
        ctx.layout.clone(),
    );

    let rt = tokio::runtime::Runtime::new().map_err(|e| ShelfError::Generic {
        message: format!("Failed to create async runtime: {e}"),
    })?;
    let outcomes = rt.block_on(install_concurrent(
        &installer,
        order,
        options,
        ctx.config.install.jobs,
    ))?;

    for outcome in &outcomes {
        match outcome {
            InstallOutcome::AlreadyInstalled { .. } => {
                shelf_util::progress::status_info("Fresh", &outcome.to_string())
            }
            InstallOutcome::Replaced { .. } => {
                shelf_util::progress::status_warn("Replaced", &outcome.to_string())
            }
            InstallOutcome::Installed { .. } => {
                shelf_util::progress::status("Installed", &outcome.to_string())
            }
        }
    }
    Ok(outcomes)
}
