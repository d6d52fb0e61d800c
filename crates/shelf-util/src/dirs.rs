//! Per-user directory resolution.
//!
//! `SHELF_HOME` overrides every location with `$SHELF_HOME/{data,cache,config}`.
//! Otherwise the platform directories from the `dirs` crate are used, each
//! with a `shelf` subdirectory.

use std::env;
use std::path::PathBuf;

/// Environment variable that relocates all shelf state.
pub const SHELF_HOME_ENV: &str = "SHELF_HOME";

const APP_DIR: &str = "shelf";

/// Data directory holding the indexes and installed libraries.
pub fn data_dir() -> PathBuf {
    resolve("data", ::dirs::data_dir())
}

/// Cache directory for downloads and scratch extraction.
pub fn cache_dir() -> PathBuf {
    resolve("cache", ::dirs::cache_dir())
}

/// Configuration directory containing `config.toml`.
pub fn config_dir() -> PathBuf {
    resolve("config", ::dirs::config_dir())
}

fn resolve(kind: &str, platform: Option<PathBuf>) -> PathBuf {
    if let Some(home) = env::var_os(SHELF_HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(kind);
    }
    match platform {
        Some(base) => base.join(APP_DIR),
        None => ::dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(format!(".{APP_DIR}"))
            .join(kind),
    }
}
