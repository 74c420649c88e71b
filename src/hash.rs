//! The selector hash: bucketing rules by the rightmost compound's most
//! selective detail (spec §4.4).
//!
//! No bucketed-hash source ships in the reference pack; the key extraction
//! precedence below — a rightmost compound keyed by id beats one keyed by
//! class, which beats one keyed by element name or the universal selector —
//! is derived from spec.md's own description of rightmost-compound keying
//! (spec §4.4), structured as the `HashMap<Key, Vec<_>>` bucket idiom
//! `examples/original_source/libcss/src/stylesheet.h`'s own selector-storage
//! comments describe in prose. Candidate lookup for an element therefore
//! probes the id bucket
//! first, then every class the element carries, then the element-name
//! bucket, then finally the universal bucket — a rule is a candidate for an
//! element if *any* of those buckets contains it, since the other compounds
//! and combinators still have to be checked by the caller (spec §4.4's
//! `select_style`, not this module).

use std::collections::HashMap;

use crate::atom::Atom;
use crate::selector::{Detail, Selector};

/// The bucket a selector's rightmost compound is filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Key {
    Id(Atom),
    Class(Atom),
    Element(Atom),
    Universal,
}

fn key_for(selector: &Selector) -> Key {
    let details = &selector.rightmost().details;
    if let Some(Detail::Id(a)) = details.iter().find(|d| matches!(d, Detail::Id(_))) {
        return Key::Id(a.clone());
    }
    if let Some(Detail::Class(a)) = details.iter().find(|d| matches!(d, Detail::Class(_))) {
        return Key::Class(a.clone());
    }
    if let Some(Detail::Element(a)) = details.iter().find(|d| matches!(d, Detail::Element(_))) {
        return Key::Element(a.clone());
    }
    Key::Universal
}

/// Maps a selector's hash key to the indices of rules whose selector hashes
/// to that key. `T` is whatever a caller wants to associate with each
/// selector (typically an index into a stylesheet's rule list), kept
/// generic so this module doesn't need to know about [`crate::rule::Rule`].
#[derive(Debug, Clone, Default)]
pub struct SelectorHash<T> {
    buckets: HashMap<Key, Vec<(Selector, T)>>,
}

impl<T: Clone> SelectorHash<T> {
    pub fn new() -> Self {
        SelectorHash { buckets: HashMap::new() }
    }

    pub fn insert(&mut self, selector: Selector, value: T) {
        let key = key_for(&selector);
        self.buckets.entry(key).or_default().push((selector, value));
    }

    /// Every `(selector, value)` pair that is a *candidate* match for an
    /// element identified by `id`, `classes`, and `element_name`. Order
    /// within and across buckets is insertion order, matching document
    /// order for a single stylesheet; callers doing full cascade precedence
    /// still need `(origin, important, specificity, document order)`
    /// ordering over the union, which is `crate::select`'s job.
    pub fn candidates(
        &self,
        id: Option<&Atom>,
        classes: &[Atom],
        element_name: &Atom,
    ) -> Vec<(Selector, T)> {
        let mut out = Vec::new();
        if let Some(id) = id {
            if let Some(bucket) = self.buckets.get(&Key::Id(id.clone())) {
                out.extend(bucket.iter().cloned());
            }
        }
        for class in classes {
            if let Some(bucket) = self.buckets.get(&Key::Class(class.clone())) {
                out.extend(bucket.iter().cloned());
            }
        }
        if let Some(bucket) = self.buckets.get(&Key::Element(element_name.clone())) {
            out.extend(bucket.iter().cloned());
        }
        if let Some(bucket) = self.buckets.get(&Key::Universal) {
            out.extend(bucket.iter().cloned());
        }
        out
    }

    /// Removes every `(selector, value)` pair whose value satisfies
    /// `predicate`, from every bucket. Used by
    /// [`crate::rule::Stylesheet::remove_rule`] to evict a removed rule's
    /// selectors without needing to know which bucket they hashed into.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        for bucket in self.buckets.values_mut() {
            bucket.retain(|(_, v)| !predicate(v));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::{Combinator, Compound};

    fn sel(details: Vec<Detail>) -> Selector {
        Selector::new(vec![Compound { combinator: Combinator::None, details }])
    }

    #[test]
    fn id_keyed_selector_found_by_id_only() {
        let mut hash = SelectorHash::new();
        hash.insert(sel(vec![Detail::Id(Atom::from_str("x"))]), 1u32);

        let found = hash.candidates(Some(&Atom::from_str("x")), &[], &Atom::from_str("div"));
        assert_eq!(found.len(), 1);

        let missed = hash.candidates(None, &[], &Atom::from_str("div"));
        assert!(missed.is_empty());
    }

    #[test]
    fn universal_selector_always_a_candidate() {
        let mut hash = SelectorHash::new();
        hash.insert(sel(vec![Detail::Universal]), 7u32);

        let found = hash.candidates(None, &[], &Atom::from_str("span"));
        assert_eq!(found[0].1, 7);
    }

    #[test]
    fn class_selector_found_by_any_matching_class() {
        let mut hash = SelectorHash::new();
        hash.insert(sel(vec![Detail::Class(Atom::from_str("warn"))]), 3u32);

        let classes = [Atom::from_str("a"), Atom::from_str("warn")];
        let found = hash.candidates(None, &classes, &Atom::from_str("div"));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn remove_where_evicts_matching_values_from_every_bucket() {
        let mut hash = SelectorHash::new();
        hash.insert(sel(vec![Detail::Id(Atom::from_str("x"))]), 1u32);
        hash.insert(sel(vec![Detail::Class(Atom::from_str("warn"))]), 2u32);
        hash.insert(sel(vec![Detail::Universal]), 1u32);

        hash.remove_where(|v| *v == 1);

        assert!(hash.candidates(Some(&Atom::from_str("x")), &[], &Atom::from_str("div")).is_empty());
        assert!(hash.candidates(None, &[], &Atom::from_str("div")).is_empty());
        let found = hash.candidates(None, &[Atom::from_str("warn")], &Atom::from_str("div"));
        assert_eq!(found.len(), 1);
    }
}
