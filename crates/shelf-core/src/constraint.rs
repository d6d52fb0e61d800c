//! Version constraints: an operator paired with a version.

use std::fmt;
use std::str::FromStr;

use shelf_util::errors::ShelfError;

use crate::version::Version;

/// Comparison operator of a [`Constraint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
    /// Same leading component and not older.
    Caret,
}

impl Op {
    /// Two-character operators come first so `>=` is not read as `>` followed by `=1.0`.
    const PREFIXES: [(&'static str, Op); 6] = [
        (">=", Op::Ge),
        ("<=", Op::Le),
        (">", Op::Gt),
        ("<", Op::Lt),
        ("=", Op::Eq),
        ("^", Op::Caret),
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Op::Eq => "=",
            Op::Gt => ">",
            Op::Lt => "<",
            Op::Ge => ">=",
            Op::Le => "<=",
            Op::Caret => "^",
        }
    }
}

/// A single version constraint such as `>=1.2` or `^2.0.0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub op: Op,
    pub version: Version,
}

impl Constraint {
    pub fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Exact-version constraint.
    pub fn exact(version: Version) -> Self {
        Self::new(Op::Eq, version)
    }

    /// Parse constraint text. Without an operator the whole string is an exact version.
    pub fn parse(raw: &str) -> Result<Self, ShelfError> {
        let trimmed = raw.trim();
        let (op, rest) = Op::PREFIXES
            .iter()
            .find_map(|(prefix, op)| trimmed.strip_prefix(prefix).map(|rest| (*op, rest)))
            .unwrap_or((Op::Eq, trimmed));
        let rest = rest.trim();
        if rest.is_empty() {
            return Err(ShelfError::MalformedConstraint {
                constraint: raw.to_string(),
                reason: "no version after the operator".to_string(),
            });
        }
        let version = Version::parse(rest).map_err(|e| match e {
            ShelfError::MalformedConstraint { reason, .. } => ShelfError::MalformedConstraint {
                constraint: raw.to_string(),
                reason,
            },
            other => other,
        })?;
        Ok(Self { op, version })
    }

    /// Whether `candidate` satisfies this constraint.
    pub fn matches(&self, candidate: &Version) -> bool {
        let v = &self.version;
        match self.op {
            Op::Eq => candidate == v,
            Op::Gt => candidate > v,
            Op::Lt => candidate < v,
            Op::Ge => candidate >= v,
            Op::Le => candidate <= v,
            Op::Caret => candidate >= v && candidate.same_leading_component(v),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op.symbol(), self.version)
    }
}

impl FromStr for Constraint {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Lazily keep the versions that satisfy `constraint`, in input order.
pub fn filter<'a, I>(versions: I, constraint: &'a Constraint) -> impl Iterator<Item = &'a Version>
where
    I: IntoIterator<Item = &'a Version>,
    I::IntoIter: 'a,
{
    filter_by(versions, constraint, |v| *v)
}

/// Keyed form of [`filter`] for records that carry a version.
pub fn filter_by<'a, T, I, F>(
    items: I,
    constraint: &'a Constraint,
    key: F,
) -> impl Iterator<Item = T> + 'a
where
    I: IntoIterator<Item = T>,
    I::IntoIter: 'a,
    F: Fn(&T) -> &Version + 'a,
    T: 'a,
{
    items
        .into_iter()
        .filter(move |item| constraint.matches(key(item)))
}

/// What a requester accepts for a library: a constraint, or any version.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Requirement(Option<Constraint>);

impl Requirement {
    pub fn any() -> Self {
        Self(None)
    }

    pub fn constrained(constraint: Constraint) -> Self {
        Self(Some(constraint))
    }

    /// Empty or blank text accepts any version.
    pub fn parse(raw: &str) -> Result<Self, ShelfError> {
        if raw.trim().is_empty() {
            return Ok(Self::any());
        }
        Constraint::parse(raw).map(Self::constrained)
    }

    pub fn constraint(&self) -> Option<&Constraint> {
        self.0.as_ref()
    }

    pub fn is_any(&self) -> bool {
        self.0.is_none()
    }

    pub fn matches(&self, candidate: &Version) -> bool {
        self.0.as_ref().map_or(true, |c| c.matches(candidate))
    }
}

impl From<Option<Constraint>> for Requirement {
    fn from(value: Option<Constraint>) -> Self {
        Self(value)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(c) => write!(f, "{c}"),
            None => f.write_str("*"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    fn c(s: &str) -> Constraint {
        Constraint::parse(s).unwrap()
    }

    #[test]
    fn parse_operators() {
        assert_eq!(c(">=1.0").op, Op::Ge);
        assert_eq!(c("<=1.0").op, Op::Le);
        assert_eq!(c(">1.0").op, Op::Gt);
        assert_eq!(c("<1.0").op, Op::Lt);
        assert_eq!(c("=1.0").op, Op::Eq);
        assert_eq!(c("^1.0").op, Op::Caret);
        assert_eq!(c("1.0").op, Op::Eq);
    }

    #[test]
    fn parse_trims_whitespace() {
        let parsed = c("  >= 1.2.0 ");
        assert_eq!(parsed.op, Op::Ge);
        assert_eq!(parsed.version.as_str(), "1.2.0");
    }

    #[test]
    fn operator_without_version_is_malformed() {
        for raw in [">=", "^", "=", " < ", ""] {
            let err = Constraint::parse(raw).unwrap_err();
            assert!(
                matches!(err, ShelfError::MalformedConstraint { .. }),
                "{raw:?} gave {err}"
            );
        }
    }

    #[test]
    fn malformed_version_reports_whole_constraint() {
        match Constraint::parse(">=1..0").unwrap_err() {
            ShelfError::MalformedConstraint { constraint, .. } => assert_eq!(constraint, ">=1..0"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn caret_requires_same_leading_component() {
        let caret = c("^1.4.0");
        assert!(caret.matches(&v("1.4.0")));
        assert!(caret.matches(&v("1.9.2")));
        assert!(!caret.matches(&v("1.3.9")));
        assert!(!caret.matches(&v("2.0.0")));
        assert!(!caret.matches(&v("0.9")));
    }

    #[test]
    fn display_round_trips() {
        for raw in ["=1.0", ">=2.1.3", "<3", "^0.4.0", ">1.rc1", "<=10"] {
            let parsed = c(raw);
            assert_eq!(Constraint::parse(&parsed.to_string()).unwrap(), parsed);
        }
        assert_eq!(c("1.2").to_string(), "=1.2");
    }

    #[test]
    fn filter_keeps_input_order() {
        let versions: Vec<Version> = ["1.0", "3.0", "2.0", "0.5"].into_iter().map(v).collect();
        let constraint = c(">=1.0");
        let out: Vec<&str> = filter(&versions, &constraint).map(Version::as_str).collect();
        assert_eq!(out, ["1.0", "3.0", "2.0"]);
    }

    #[test]
    fn requirement_any_matches_everything() {
        let any = Requirement::parse("  ").unwrap();
        assert!(any.is_any());
        assert!(any.matches(&v("0.0.1")));
        assert_eq!(any.to_string(), "*");
        assert!(!Requirement::parse("<1").unwrap().matches(&v("1.0")));
    }
}
