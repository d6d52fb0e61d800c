//! Building resolution-conflict errors from the pin set.

use shelf_util::errors::{ConflictDetail, ShelfError};

use crate::pinset::{Pin, Request};

/// `incoming` cannot be satisfied by the version already pinned for `name`.
pub fn conflict(name: &str, pin: &Pin, incoming: &Request) -> ShelfError {
    ShelfError::ResolutionConflict(Box::new(ConflictDetail {
        name: name.to_string(),
        pinned: pin.version.to_string(),
        existing: pin.requests.iter().map(Request::trace).collect(),
        incoming: incoming.trace(),
    }))
}

/// The structured detail behind a conflict error, if `err` is one.
pub fn detail(err: &ShelfError) -> Option<&ConflictDetail> {
    match err {
        ShelfError::ResolutionConflict(detail) => Some(detail.as_ref()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::constraint::Requirement;
    use shelf_core::version::Version;

    #[test]
    fn conflict_names_both_chains() {
        let pin = Pin {
            version: Version::parse("1.0.0").unwrap(),
            requests: vec![Request::new(
                Requirement::parse("=1.0.0").unwrap(),
                vec!["app".to_string()],
            )],
            dependencies: vec![],
        };
        let incoming = Request::new(
            Requirement::parse("=2.0.0").unwrap(),
            vec!["app".to_string(), "y".to_string()],
        );
        let err = conflict("x", &pin, &incoming);
        let detail = detail(&err).unwrap();
        assert_eq!(detail.pinned, "1.0.0");
        assert_eq!(detail.existing[0].requester(), Some("app"));
        assert_eq!(detail.incoming.requester(), Some("y"));
        assert_eq!(
            err.to_string(),
            "Dependency resolution failed: `x` is pinned to 1.0.0 for `=1.0.0` (required by app), \
             which does not satisfy `=2.0.0` (required by app -> y)"
        );
    }
}
