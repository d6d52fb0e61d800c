//! Newest-first backtracking resolution against a catalog.
//!
//! Each library is pinned to exactly one version. For an unpinned library the
//! candidates matching the request are tried newest first: the candidate is
//! pinned tentatively, then each of its dependencies is pinned recursively
//! with the requester chain extended. If any dependency fails, every pin and
//! request added since the candidate was tried is rolled back and the next
//! candidate is attempted. A request for an already pinned library either
//! accepts the pinned version or fails with a conflict; the pinned subtree is
//! never re-resolved.

use std::collections::HashMap;

use shelf_catalog::catalog::Catalog;
use shelf_core::constraint::Requirement;
use shelf_core::library::LibraryRecord;
use shelf_core::version::Version;
use shelf_util::errors::ShelfError;

use crate::conflict;
use crate::graph::Resolution;
use crate::pinset::{Pin, PinSet, Request};

/// Resolution session over one catalog. Candidate lists are cached for the
/// lifetime of the session.
pub struct Resolver<'a, C: Catalog> {
    catalog: &'a C,
    candidates: HashMap<String, Vec<(Version, C::Record)>>,
}

impl<'a, C: Catalog> Resolver<'a, C> {
    pub fn new(catalog: &'a C) -> Self {
        Self {
            catalog,
            candidates: HashMap::new(),
        }
    }

    /// Pin `name` so that `requirement` holds, together with its dependencies.
    ///
    /// `chain` lists the requesters from the root down to whoever asked for
    /// `name`; it is empty for a root request. On failure `pins` may hold
    /// partial state; callers that need atomicity use [`Resolver::resolve_into`].
    pub fn pin(
        &mut self,
        pins: &mut PinSet,
        name: &str,
        requirement: &Requirement,
        chain: &[String],
    ) -> Result<(), ShelfError> {
        let request = Request::new(requirement.clone(), chain.to_vec());

        if let Some(existing) = pins.get(name) {
            if requirement.matches(&existing.version) {
                tracing::debug!(
                    "`{name}` {} already pinned, accepts `{requirement}`",
                    existing.version
                );
                pins.append_request(name, request);
                return Ok(());
            }
            return Err(conflict::conflict(name, existing, &request));
        }

        let candidates = self.candidates(name, requirement)?;
        if candidates.is_empty() {
            return Err(ShelfError::NotFoundInIndex {
                name: name.to_string(),
                constraint: requirement.to_string(),
            });
        }

        let checkpoint = pins.checkpoint();
        let mut last_failure = None;
        for (version, record) in candidates {
            tracing::debug!("Trying `{name}` {version} for `{requirement}`");
            match self.try_candidate(pins, name, version, &record, request.clone(), chain) {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::debug!("Backtracking from `{name}`: {e}");
                    pins.rollback(checkpoint);
                    last_failure = Some(e);
                }
            }
        }
        Err(last_failure.unwrap_or_else(|| ShelfError::NotFoundInIndex {
            name: name.to_string(),
            constraint: requirement.to_string(),
        }))
    }

    /// Like [`Resolver::pin`] for a root request, leaving `pins` untouched on failure.
    pub fn resolve_into(
        &mut self,
        pins: &mut PinSet,
        name: &str,
        requirement: &Requirement,
    ) -> Result<(), ShelfError> {
        let checkpoint = pins.checkpoint();
        let result = self.pin(pins, name, requirement, &[]);
        if result.is_err() {
            pins.rollback(checkpoint);
        }
        result
    }

    fn try_candidate(
        &mut self,
        pins: &mut PinSet,
        name: &str,
        version: Version,
        record: &C::Record,
        request: Request,
        chain: &[String],
    ) -> Result<(), ShelfError> {
        let requirements = record.manifest().requirements()?;
        pins.insert(
            name,
            Pin {
                version,
                requests: vec![request],
                dependencies: requirements.iter().map(|(dep, _)| dep.to_string()).collect(),
            },
        );

        let mut child_chain = chain.to_vec();
        child_chain.push(name.to_string());
        for (dep, requirement) in &requirements {
            self.pin(pins, dep, requirement, &child_chain)?;
        }
        Ok(())
    }

    /// Matching candidates, newest first.
    fn candidates(
        &mut self,
        name: &str,
        requirement: &Requirement,
    ) -> Result<Vec<(Version, C::Record)>, ShelfError> {
        if !self.candidates.contains_key(name) {
            let mut all = Vec::new();
            for record in self.catalog.search(name, &Requirement::any())? {
                // `search` already skipped records whose version does not parse.
                if let Ok(v) = record.manifest().parsed_version() {
                    all.push((v, record));
                }
            }
            self.candidates.insert(name.to_string(), all);
        }
        Ok(self
            .candidates
            .get(name)
            .map(|all| {
                all.iter()
                    .filter(|(v, _)| requirement.matches(v))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Resolve a single root request.
pub fn resolve<C: Catalog>(
    catalog: &C,
    root: &str,
    requirement: &Requirement,
) -> Result<Resolution, ShelfError> {
    resolve_all(catalog, &[(root.to_string(), requirement.clone())])
}

/// Resolve several root requests into one pin set, so that requirements
/// from different roots must agree.
pub fn resolve_all<C: Catalog>(
    catalog: &C,
    roots: &[(String, Requirement)],
) -> Result<Resolution, ShelfError> {
    let mut resolver = Resolver::new(catalog);
    let mut pins = PinSet::new();
    for (name, requirement) in roots {
        resolver.resolve_into(&mut pins, name, requirement)?;
    }
    pins.commit();
    tracing::debug!("Resolved {} libraries", pins.len());
    Ok(Resolution::new(
        roots.iter().map(|(name, _)| name.clone()).collect(),
        pins,
    ))
}
