//! Library version parsing and ordering.
//!
//! A version is a dotted sequence of components with no fixed depth:
//! - A component made only of ASCII digits is numeric and compares by value,
//!   with no upper bound and leading zeros ignored
//! - Any other component is textual and compares byte-wise
//! - Textual components sort below numeric ones
//! - A missing component sorts below any present one, so `1.2 < 1.2.0 < 1.2.1`

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use shelf_util::errors::ShelfError;

/// A parsed library version.
#[derive(Debug, Clone)]
pub struct Version {
    original: String,
    components: Vec<Component>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Component {
    /// Digits with leading zeros stripped.
    Numeric(String),
    Text(String),
}

impl Version {
    pub fn parse(raw: &str) -> Result<Self, ShelfError> {
        let malformed = |reason: String| ShelfError::MalformedConstraint {
            constraint: raw.to_string(),
            reason,
        };
        if raw.is_empty() {
            return Err(malformed("version is empty".to_string()));
        }
        let mut components = Vec::new();
        for (i, part) in raw.split('.').enumerate() {
            if part.is_empty() {
                return Err(malformed(format!("component {} is empty", i + 1)));
            }
            if let Some(bad) = part.chars().find(|c| !is_component_char(*c)) {
                return Err(malformed(format!("invalid character {bad:?} in version")));
            }
            components.push(classify(part));
        }
        Ok(Self {
            original: raw.to_string(),
            components,
        })
    }

    /// The version exactly as written.
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Whether the first components of both versions are equal.
    pub fn same_leading_component(&self, other: &Version) -> bool {
        self.components.first() == other.components.first()
    }
}

fn is_component_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '+' | '~')
}

fn classify(part: &str) -> Component {
    if part.bytes().all(|b| b.is_ascii_digit()) {
        Component::Numeric(part.trim_start_matches('0').to_string())
    } else {
        Component::Text(part.to_string())
    }
}

fn compare_components(a: &Component, b: &Component) -> Ordering {
    match (a, b) {
        // Stripped digit strings: longer is larger, equal length compares lexically.
        (Component::Numeric(a), Component::Numeric(b)) => {
            a.len().cmp(&b.len()).then_with(|| a.cmp(b))
        }
        (Component::Text(a), Component::Text(b)) => a.as_bytes().cmp(b.as_bytes()),
        (Component::Text(_), Component::Numeric(_)) => Ordering::Less,
        (Component::Numeric(_), Component::Text(_)) => Ordering::Greater,
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let max_len = self.components.len().max(other.components.len());
        for i in 0..max_len {
            let ord = match (self.components.get(i), other.components.get(i)) {
                (Some(a), Some(b)) => compare_components(a, b),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.components.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for Version {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Sort versions in place, newest first when `descending`.
pub fn sort(versions: &mut [Version], descending: bool) {
    sort_by_version(versions, descending, |v| v);
}

/// Sort arbitrary items by the version `key` extracts from each one.
pub fn sort_by_version<T, F>(items: &mut [T], descending: bool, key: F)
where
    F: Fn(&T) -> &Version,
{
    if descending {
        items.sort_by(|a, b| key(b).cmp(key(a)));
    } else {
        items.sort_by(|a, b| key(a).cmp(key(b)));
    }
}

/// Parse a list of raw version strings, failing on the first malformed one.
pub fn parse_all<I, S>(raw: I) -> Result<Vec<Version>, ShelfError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter().map(|s| Version::parse(s.as_ref())).collect()
}
