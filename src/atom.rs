//! The interned "string handle" type (spec §3).
//!
//! This crate treats the string interner as an external collaborator: names
//! of elements, classes, ids, attributes, and pseudo-classes all flow through
//! a single refcounted, deduplicated handle type. We reuse `string_cache`'s
//! default atom table rather than hand-rolling an interner, the same way the
//! teacher reuses `markup5ever::LocalName` (itself a `string_cache::Atom`)
//! for element and attribute names throughout `css.rs` and `element.rs`.

use string_cache::DefaultAtom;

/// An interned, reference-counted, case-foldable string.
///
/// Equality between two handles is pointer/hash identity under the hood
/// (provided by `string_cache`), matching the spec's "all equality
/// comparisons use handle identity" invariant. [`Atom::eq_ignore_ascii_case`]
/// is the "library-provided operation" the spec calls out for
/// case-insensitive comparisons (used for quirks-mode class/id matching).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom(DefaultAtom);

impl Atom {
    pub fn from_str(s: &str) -> Self {
        Atom(DefaultAtom::from(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn eq_ignore_ascii_case(&self, other: &Atom) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Atom::from_str(s)
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_and_compares() {
        let a = Atom::from_str("foo");
        let b = Atom::from_str("foo");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "foo");
    }

    #[test]
    fn case_insensitive_compare() {
        let a = Atom::from_str("Foo");
        let b = Atom::from_str("foo");
        assert_ne!(a, b);
        assert!(a.eq_ignore_ascii_case(&b));
    }
}
