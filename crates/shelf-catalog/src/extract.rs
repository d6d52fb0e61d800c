//! Archive extraction for `.zip`, `.tar`, `.tar.gz` and `.tgz` downloads.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;

use shelf_util::errors::ShelfError;

/// Archive formats shelf can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveKind {
    /// Guess the format from the file name.
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else {
            None
        }
    }
}

/// Unpack `archive` into `dest` and return `dest`.
///
/// An existing `dest` is an error unless `overwrite` is set, in which case it
/// is replaced. When the archive holds a single top-level directory its
/// contents are moved up into `dest`.
pub fn extract_archive(archive: &Path, dest: &Path, overwrite: bool) -> Result<PathBuf, ShelfError> {
    let kind = ArchiveKind::detect(archive).ok_or_else(|| ShelfError::Archive {
        message: format!("Unsupported archive format: {}", archive.display()),
    })?;

    if dest.exists() {
        if !overwrite {
            return Err(ShelfError::Archive {
                message: format!("Extraction target {} already exists", dest.display()),
            });
        }
        tracing::debug!("Replacing existing extraction target {}", dest.display());
        fs::remove_dir_all(dest)?;
    }
    fs::create_dir_all(dest)?;

    tracing::debug!("Extracting {} into {}", archive.display(), dest.display());
    let file = fs::File::open(archive)?;
    match kind {
        ArchiveKind::Zip => extract_zip(file, dest)?,
        ArchiveKind::Tar => extract_tar(file, dest)?,
        ArchiveKind::TarGz => extract_tar(GzDecoder::new(file), dest)?,
    }

    flatten_single_child(dest)?;
    Ok(dest.to_path_buf())
}

fn extract_zip(file: fs::File, dest: &Path) -> Result<(), ShelfError> {
    let mut archive = zip::ZipArchive::new(file).map_err(|e| ShelfError::Archive {
        message: format!("Failed to open zip: {e}"),
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| ShelfError::Archive {
            message: format!("Zip entry error: {e}"),
        })?;

        let Some(relative) = entry.enclosed_name() else {
            tracing::warn!("Skipping zip entry with unsafe path: {}", entry.name());
            continue;
        };
        let out_path = dest.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&out_path)?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut buf = Vec::new();
        entry.read_to_end(&mut buf).map_err(|e| ShelfError::Archive {
            message: format!("Failed to read zip entry {}: {e}", entry.name()),
        })?;
        fs::write(&out_path, &buf)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Some(mode) = entry.unix_mode() {
                fs::set_permissions(&out_path, fs::Permissions::from_mode(mode))?;
            }
        }
    }
    Ok(())
}

fn extract_tar<R: Read>(reader: R, dest: &Path) -> Result<(), ShelfError> {
    let archive_error = |e: std::io::Error| ShelfError::Archive {
        message: format!("Failed to read tar archive: {e}"),
    };
    let mut archive = tar::Archive::new(reader);
    for entry in archive.entries().map_err(archive_error)? {
        let mut entry = entry.map_err(archive_error)?;
        // `unpack_in` refuses paths that would escape `dest`.
        if !entry.unpack_in(dest).map_err(archive_error)? {
            let path = entry.path().map(|p| p.display().to_string()).unwrap_or_default();
            tracing::warn!("Skipping tar entry with unsafe path: {path}");
        }
    }
    Ok(())
}

/// If `dir` contains exactly one child directory, move its contents up into `dir`.
fn flatten_single_child(dir: &Path) -> Result<(), ShelfError> {
    let entries: Vec<_> = fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
    if entries.len() != 1 || !entries[0].path().is_dir() {
        return Ok(());
    }
    let child_name = entries[0].file_name();
    let dir_name = dir
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("archive"))
        .to_string_lossy();
    let tmp_name = dir.with_file_name(format!(".shelf-flatten-{dir_name}"));
    shelf_util::fs::remove_dir_if_exists(&tmp_name)?;
    fs::rename(dir, &tmp_name)?;
    fs::rename(tmp_name.join(child_name), dir)?;
    fs::remove_dir_all(&tmp_name)?;
    Ok(())
}
