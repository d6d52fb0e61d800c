use std::cmp::Ordering;

use shelf_core::constraint::{Constraint, Requirement};
use shelf_core::version::{self, Version};

const SAMPLE: &[&str] = &[
    "0", "0.0", "0.0.0", "0.1", "1", "1.0", "1.0.0", "1.0.1", "1.2", "1.2.0", "1.2.1", "1.10",
    "1.rc1", "1.rc2", "1.a", "1.B", "1.2.beta", "2", "2.0.0-pre", "10.0", "010.0",
    "99999999999999999999999.0",
];

fn sample() -> Vec<Version> {
    version::parse_all(SAMPLE).unwrap()
}

#[test]
fn comparison_is_a_total_order() {
    let versions = sample();
    for a in &versions {
        assert_eq!(a.cmp(a), Ordering::Equal, "{a} not reflexive");
        for b in &versions {
            assert_eq!(a.cmp(b), b.cmp(a).reverse(), "{a} vs {b} not antisymmetric");
            for c in &versions {
                if a <= b && b <= c {
                    assert!(a <= c, "{a} <= {b} <= {c} but not {a} <= {c}");
                }
            }
        }
    }
}

#[test]
fn sorting_is_stable_under_reversal() {
    let mut asc = sample();
    version::sort(&mut asc, false);
    let mut desc = sample();
    version::sort(&mut desc, true);
    desc.reverse();
    assert_eq!(asc, desc);
    assert_eq!(asc.first().map(Version::as_str), Some("0"));
}

#[test]
fn reflexive_constraints() {
    for v in sample() {
        for op in ["=", ">=", "<=", "^"] {
            let c = Constraint::parse(&format!("{op}{v}")).unwrap();
            assert!(c.matches(&v), "{c} should match {v}");
        }
        for op in [">", "<"] {
            let c = Constraint::parse(&format!("{op}{v}")).unwrap();
            assert!(!c.matches(&v), "{c} should not match {v}");
        }
    }
}

#[test]
fn caret_semantics() {
    let caret = Constraint::parse("^1.2").unwrap();
    for ok in ["1.2", "1.2.0", "1.3", "1.10.7"] {
        assert!(caret.matches(&Version::parse(ok).unwrap()), "{ok}");
    }
    for bad in ["1.1.9", "1", "2.0", "0.9", "1.rc1"] {
        assert!(!caret.matches(&Version::parse(bad).unwrap()), "{bad}");
    }
}

#[test]
fn keyed_sort_and_filter() {
    let mut records: Vec<(&str, Version)> = [("a", "1.0"), ("b", "3.0"), ("c", "2.0")]
        .into_iter()
        .map(|(name, v)| (name, Version::parse(v).unwrap()))
        .collect();
    version::sort_by_version(&mut records, true, |r| &r.1);
    let names: Vec<_> = records.iter().map(|r| r.0).collect();
    assert_eq!(names, ["b", "c", "a"]);

    let below_three = Constraint::parse("<3").unwrap();
    let kept: Vec<_> = shelf_core::constraint::filter_by(&records, &below_three, |r| &r.1)
        .map(|r| r.0)
        .collect();
    assert_eq!(kept, ["c", "a"]);
}

#[test]
fn requirement_display() {
    assert_eq!(Requirement::any().to_string(), "*");
    assert_eq!(Requirement::parse("^1").unwrap().to_string(), "^1");
}
