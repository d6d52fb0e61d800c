//! Configuration and on-disk layout shared by every operation.

use shelf_catalog::fetch::IndexFetcher;
use shelf_catalog::local::LocalCatalog;
use shelf_catalog::remote::RemoteCatalog;
use shelf_core::config::GlobalConfig;
use shelf_core::layout::Layout;
use shelf_util::errors::ShelfError;

#[derive(Debug, Clone)]
pub struct Context {
    pub config: GlobalConfig,
    pub layout: Layout,
}

impl Context {
    pub fn new(config: GlobalConfig, layout: Layout) -> Self {
        Self { config, layout }
    }

    /// Load `config.toml` and use the per-user directories.
    pub fn load() -> miette::Result<Self> {
        let config = GlobalConfig::load()?;
        Ok(Self::new(config, Layout::from_env()))
    }

    /// The remote index as last downloaded.
    pub fn remote_catalog(&self) -> Result<RemoteCatalog, ShelfError> {
        RemoteCatalog::load(&self.layout.remote_dir())
    }

    pub fn local_catalog(&self) -> LocalCatalog {
        LocalCatalog::open(self.layout.local_index_path())
    }

    /// Refresh the remote index if it is stale or `force` is set.
    pub fn refresh_index(&self, fetcher: &dyn IndexFetcher, force: bool) -> Result<bool, ShelfError> {
        RemoteCatalog::ensure_fresh(
            &self.layout.remote_dir(),
            fetcher,
            &self.config.index.url,
            force,
            self.config.index.max_age(),
        )
    }
}
