use std::fmt;
use std::str::FromStr;

use shelf_util::errors::ShelfError;

use crate::constraint::Requirement;
use crate::name::validate_name;

/// Characters that start the constraint part of a reference.
const OPERATOR_CHARS: &[char] = &['>', '<', '^', '='];

/// A library reference as typed on the command line: `name` optionally
/// followed directly by a constraint, e.g. `gears`, `gears^2.0.0`, `gears>=1.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRef {
    pub name: String,
    /// Raw constraint text; `None` accepts any version.
    pub constraint: Option<String>,
}

impl LibraryRef {
    pub fn parse(raw: &str) -> Result<Self, ShelfError> {
        let raw = raw.trim();
        let (name, constraint) = match raw.find(OPERATOR_CHARS) {
            Some(i) => (&raw[..i], &raw[i..]),
            None => (raw, ""),
        };
        let name = name.trim();
        if name.is_empty() {
            return Err(ShelfError::Generic {
                message: format!("Library reference `{raw}` has no library name"),
            });
        }
        validate_name(name)?;
        let constraint = constraint.trim();
        Ok(Self {
            name: name.to_string(),
            constraint: (!constraint.is_empty()).then(|| constraint.to_string()),
        })
    }

    /// The constraint part parsed; no constraint accepts any version.
    pub fn requirement(&self) -> Result<Requirement, ShelfError> {
        Requirement::parse(self.constraint.as_deref().unwrap_or(""))
    }
}

impl FromStr for LibraryRef {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for LibraryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.constraint {
            Some(c) => write!(f, "{}{c}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
