//! Operation: describe a library from the remote index.

use std::fmt::Write;

use shelf_catalog::catalog::Catalog;
use shelf_core::library::{LibraryRecord, LocalLibrary, RemoteLibrary};
use shelf_core::reference::LibraryRef;
use shelf_util::errors::ShelfError;

use crate::context::Context;

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    /// Newest version matching the request.
    pub record: RemoteLibrary,
    /// Every published version, newest first.
    pub versions: Vec<String>,
    pub installed: Option<LocalLibrary>,
}

/// `shelf info <name>[constraint]`.
pub fn info(ctx: &Context, query: &str) -> miette::Result<LibraryInfo> {
    let reference = LibraryRef::parse(query)?;
    let requirement = reference.requirement()?;
    let remote = ctx.remote_catalog()?;

    let all = remote.search(&reference.name, &Default::default())?;
    let record = remote
        .search(&reference.name, &requirement)?
        .into_iter()
        .next()
        .ok_or_else(|| ShelfError::NotFoundInIndex {
            name: reference.name.clone(),
            constraint: requirement.to_string(),
        })?;
    let installed = ctx.local_catalog().installed_record(&reference.name)?;

    Ok(LibraryInfo {
        record,
        versions: all.iter().map(|r| r.version().to_string()).collect(),
        installed,
    })
}

impl LibraryInfo {
    /// Human-readable description, one field per line.
    pub fn render(&self) -> String {
        let m = &self.record.manifest;
        let lib = &m.library;
        let mut out = String::new();
        let _ = writeln!(out, "name: {}", lib.name);
        let _ = writeln!(out, "version: {}", lib.version);
        if !lib.short_description.is_empty() {
            let _ = writeln!(out, "description: {}", lib.short_description);
        }
        if let Some(license) = lib.license.as_ref().filter(|l| l.is_specified()) {
            let text = license
                .identifier
                .clone()
                .or_else(|| license.file.clone())
                .unwrap_or_default();
            let _ = writeln!(out, "license: {text}");
        }
        if !lib.authors.is_empty() {
            let authors: Vec<String> = lib
                .authors
                .iter()
                .map(|p| format!("{} <{}>", p.name, p.email))
                .collect();
            let _ = writeln!(out, "authors: {}", authors.join(", "));
        }
        if !lib.tags.is_empty() {
            let _ = writeln!(out, "tags: {}", lib.tags.join(", "));
        }
        let _ = writeln!(out, "repository: {}", m.urls.repository);
        if let Some(homepage) = &m.urls.homepage {
            let _ = writeln!(out, "homepage: {homepage}");
        }
        if let Some(docs) = &m.urls.documentation {
            let _ = writeln!(out, "documentation: {docs}");
        }
        if !m.dependencies.is_empty() {
            let deps: Vec<String> = m
                .dependencies
                .iter()
                .map(|(name, c)| if c.is_empty() { name.clone() } else { format!("{name}{c}") })
                .collect();
            let _ = writeln!(out, "dependencies: {}", deps.join(", "));
        }
        let _ = writeln!(out, "versions: {}", self.versions.join(", "));
        match &self.installed {
            Some(local) => {
                let _ = writeln!(
                    out,
                    "installed: {} at {}",
                    local.version(),
                    local.location.display()
                );
            }
            None => {
                let _ = writeln!(out, "installed: no");
            }
        }
        if !lib.long_description.is_empty() {
            let _ = writeln!(out, "\n{}", lib.long_description);
        }
        out
    }
}
