//! Moving bytes from URLs onto disk: library archives and the remote index.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;

use shelf_util::errors::ShelfError;

use crate::extract;

const USER_AGENT: &str = concat!("shelf/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Downloads and unpacks library archives.
pub trait ArtifactFetcher: Send + Sync {
    /// Download `url` into `dest_dir`, returning the path of the archive.
    fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ShelfError>;

    /// Unpack `archive` into `dest_dir`, returning the extracted directory.
    fn extract(&self, archive: &Path, dest_dir: &Path, overwrite: bool) -> Result<PathBuf, ShelfError> {
        extract::extract_archive(archive, dest_dir, overwrite)
    }
}

/// Retrieves the remote index document.
pub trait IndexFetcher: Send + Sync {
    fn fetch_index(&self, url: &str) -> Result<Vec<u8>, ShelfError>;
}

/// Fetcher for `http(s)://` URLs via blocking reqwest, and `file://` URLs
/// read straight from disk.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    show_progress: bool,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, ShelfError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShelfError::Network {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            show_progress: false,
        })
    }

    /// Show a byte progress bar while downloading archives of known size.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn get(&self, url: &Url) -> Result<reqwest::blocking::Response, ShelfError> {
        let resp = self.client.get(url.clone()).send().map_err(|e| ShelfError::Network {
            message: format!("Failed to download {url}: {e}"),
        })?;
        if !resp.status().is_success() {
            return Err(ShelfError::Network {
                message: format!("HTTP {} for {url}", resp.status()),
            });
        }
        Ok(resp)
    }
}

impl ArtifactFetcher for HttpFetcher {
    fn download(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, ShelfError> {
        let parsed = parse_url(url)?;
        shelf_util::fs::ensure_dir(dest_dir)?;

        if parsed.scheme() == "file" {
            let source = local_path(&parsed)?;
            let name = source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "download".to_string());
            let dest = dest_dir.join(name);
            tracing::info!("Copying {} to {}", source.display(), dest.display());
            std::fs::copy(&source, &dest)?;
            return Ok(dest);
        }

        tracing::info!("Downloading {url}");
        let resp = self.get(&parsed)?;
        let name = resp
            .headers()
            .get(reqwest::header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .and_then(filename_from_disposition)
            .or_else(|| filename_from_url(&parsed))
            .unwrap_or_else(|| "download".to_string());
        let dest = dest_dir.join(name);

        let total = resp.content_length().unwrap_or(0);
        let pb = (self.show_progress && total > 0).then(|| shelf_util::progress::download_bar(total));

        let mut out = File::create(&dest)?;
        let mut reader = resp;
        let mut buf = [0u8; 8192];
        loop {
            let n = reader.read(&mut buf).map_err(|e| ShelfError::Network {
                message: format!("Read error while downloading {url}: {e}"),
            })?;
            if n == 0 {
                break;
            }
            out.write_all(&buf[..n])?;
            if let Some(ref pb) = pb {
                pb.inc(n as u64);
            }
        }
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        Ok(dest)
    }
}

impl IndexFetcher for HttpFetcher {
    fn fetch_index(&self, url: &str) -> Result<Vec<u8>, ShelfError> {
        let parsed = parse_url(url)?;
        if parsed.scheme() == "file" {
            return Ok(std::fs::read(local_path(&parsed)?)?);
        }
        let bytes = self.get(&parsed)?.bytes().map_err(|e| ShelfError::Network {
            message: format!("Failed to read response from {url}: {e}"),
        })?;
        Ok(bytes.to_vec())
    }
}

fn parse_url(url: &str) -> Result<Url, ShelfError> {
    Url::parse(url).map_err(|e| ShelfError::Network {
        message: format!("Invalid URL `{url}`: {e}"),
    })
}

fn local_path(url: &Url) -> Result<PathBuf, ShelfError> {
    url.to_file_path().map_err(|()| ShelfError::Network {
        message: format!("`{url}` is not a usable file URL"),
    })
}

/// `attachment; filename="gears-1.0.0.zip"` → `gears-1.0.0.zip`.
fn filename_from_disposition(header: &str) -> Option<String> {
    let raw = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?
        .trim_matches('"');
    sanitize(raw)
}

fn filename_from_url(url: &Url) -> Option<String> {
    let last = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    sanitize(last)
}

/// Keep only the final path component so a hostile name cannot escape the download dir.
fn sanitize(name: &str) -> Option<String> {
    Path::new(name)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
}
