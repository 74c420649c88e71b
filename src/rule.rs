//! Rules and the stylesheet container (spec §3, §4.2, §9).
//!
//! Grounded on `examples/original_source/libcss/src/stylesheet.h`'s
//! `css_rule` tagged union (`CSS_RULE_SELECTOR`, `CSS_RULE_CHARSET`,
//! `CSS_RULE_IMPORT`, `CSS_RULE_MEDIA`, `CSS_RULE_FONT_FACE`,
//! `CSS_RULE_PAGE`) and on its free-list allocator
//! (`css_stylesheet_style_create`/`_destroy`) for released bytecode blobs,
//! reproduced here as [`BlobFreeList`] (SPEC_FULL.md §C: four buckets
//! quantized in steps of 4 `u32` words, i.e. 16 bytes).

use crate::bytecode::StyleBlob;
use crate::hash::SelectorHash;
use crate::media::MediaMask;
use crate::selector::Selector;

/// Where a rule came from, used as the first element of the cascade
/// precedence tuple (spec §4.4): user-agent rules lose to user rules, which
/// lose to author rules, modulo `!important`'s reversal of that order
/// (CSS2.1 §6.4.1).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Origin {
    UserAgent,
    User,
    Author,
}

impl Default for Origin {
    fn default() -> Self {
        Origin::Author
    }
}

#[derive(Debug, Clone)]
pub enum RuleBody {
    /// A `selector { declarations }` block.
    Style { selectors: Vec<Selector>, declarations: StyleBlob },
    /// `@charset "...";` — informational once the parser front-end has
    /// already used it to pick a decoding, kept so a caller can inspect it.
    Charset(String),
    /// `@import url(...) media-list;`
    Import { url: String, media: MediaMask },
    /// `@media media-list { rules }`
    Media { media: MediaMask, rules: Vec<Rule> },
    /// `@font-face { declarations }`
    FontFace(StyleBlob),
    /// `@page [:pseudo] { declarations }`
    Page { pseudo: Option<String>, declarations: StyleBlob },
    /// A syntactically valid but semantically unrecognized at-rule, kept so
    /// error-recovery invariants (spec §4.5) hold: unknown rules are
    /// dropped, not fatal.
    Unknown,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub body: RuleBody,
    pub origin: Origin,
    /// Position among all rules parsed into this stylesheet, used as the
    /// cascade tie-breaker "document order" (spec §4.4).
    pub index: usize,
}

/// Recycles the word buffers behind released [`StyleBlob`]s instead of
/// letting the allocator reclaim them immediately, the same trade loading
/// and reloading the same stylesheet repeatedly makes worthwhile in the
/// source. Bucketed by capacity in steps of 4 words (16 bytes); anything
/// larger than the biggest bucket is simply dropped rather than pooled.
#[derive(Debug, Default)]
pub struct BlobFreeList {
    buckets: [Vec<Vec<u32>>; 4],
}

impl BlobFreeList {
    const QUANTUM: usize = 4;

    fn bucket_index(words: usize) -> Option<usize> {
        let bucket = words / Self::QUANTUM;
        if bucket < 4 {
            Some(bucket)
        } else {
            None
        }
    }

    /// Returns a word buffer with at least `min_words` of capacity, reusing
    /// a pooled one if a suitably-sized one is available.
    pub fn acquire(&mut self, min_words: usize) -> Vec<u32> {
        if let Some(idx) = Self::bucket_index(min_words) {
            if let Some(mut buf) = self.buckets[idx].pop() {
                buf.clear();
                return buf;
            }
        }
        Vec::with_capacity(min_words)
    }

    /// Returns a no-longer-needed buffer to the pool for later reuse.
    pub fn release(&mut self, buf: Vec<u32>) {
        if let Some(idx) = Self::bucket_index(buf.capacity()) {
            if self.buckets[idx].len() < 64 {
                self.buckets[idx].push(buf);
            }
        }
    }
}

/// A parsed stylesheet: its rules in document order, plus a selector hash
/// over every top-level and `@media`-nested style rule for fast candidate
/// lookup during selection (spec §4.4).
/// Addresses one style rule through a stylesheet's (possibly `@media`-
/// nested) rule tree: `path[0]` indexes `Stylesheet::rules`, and each
/// further element descends one more level into a `RuleBody::Media`'s own
/// `rules`. A top-level rule has a single-element path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RulePath(pub Vec<usize>);

/// What the selector hash stores per candidate: the path to its containing
/// rule, its position within that rule's selector list, and the media mask
/// that must be active for it to apply (the intersection of every `@media`
/// block it's nested inside, `MediaMask::ALL` if none).
#[derive(Debug, Clone)]
pub struct HashEntry {
    pub path: RulePath,
    pub selector_slot: usize,
    pub media: MediaMask,
}

#[derive(Debug, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
    hash: SelectorHash<HashEntry>,
    pub origin: Origin,
    pub free_list: BlobFreeList,
    pub url: Option<String>,
    pub title: Option<String>,
    /// CSS language level the stylesheet was parsed against; this crate
    /// only implements one level, so this is carried for the query API
    /// rather than used to gate parsing.
    pub language_level: u8,
    pub quirks_allowed: bool,
    pub used_quirks: bool,
    pub disabled: bool,
    /// `@import` rules whose target has not yet been resolved by the host
    /// (spec §6's `next_pending_import`/`register_import`). Each entry is
    /// the rule's index within [`Stylesheet::rules`] alongside its URL and
    /// media mask; resolved entries are removed.
    pending_imports: Vec<(usize, String, MediaMask)>,
    /// Imported stylesheets the host has registered, keyed by the
    /// originating `@import` rule's index (spec §3's "Import resolution
    /// state": "null imported-sheet pointer" until the host resolves it).
    imports: std::collections::HashMap<usize, Box<Stylesheet>>,
}

impl Stylesheet {
    pub fn new(origin: Origin) -> Self {
        Stylesheet {
            rules: Vec::new(),
            hash: SelectorHash::new(),
            origin,
            free_list: BlobFreeList::default(),
            url: None,
            title: None,
            language_level: 0,
            quirks_allowed: false,
            used_quirks: false,
            disabled: false,
            pending_imports: Vec::new(),
            imports: std::collections::HashMap::new(),
        }
    }

    /// The next unresolved `@import`'s URL and media mask, if any (spec
    /// §6's `next_pending_import`).
    pub fn next_pending_import(&self) -> Option<(&str, MediaMask)> {
        self.pending_imports.first().map(|(_, url, media)| (url.as_str(), *media))
    }

    /// Registers the host-resolved stylesheet for the oldest pending
    /// `@import`, mutating that rule's "imported-sheet pointer" (spec §3)
    /// from null to `Some(imported)`.
    pub fn register_import(&mut self, imported: Stylesheet) -> Result<(), crate::error::CssError> {
        if self.pending_imports.is_empty() {
            return Err(crate::error::CssError::Invalid);
        }
        let (rule_index, _, _) = self.pending_imports.remove(0);
        self.imports.insert(rule_index, Box::new(imported));
        Ok(())
    }

    pub fn has_pending_imports(&self) -> bool {
        !self.pending_imports.is_empty()
    }

    /// The stylesheet registered for the `@import` rule at `rule_index`, if
    /// the host has resolved it.
    pub fn imported_stylesheet(&self, rule_index: usize) -> Option<&Stylesheet> {
        self.imports.get(&rule_index).map(|b| b.as_ref())
    }

    /// Total declarations across every style rule, the `size` query of
    /// spec §6.
    pub fn size(&self) -> usize {
        fn count(rules: &[Rule]) -> usize {
            rules
                .iter()
                .map(|r| match &r.body {
                    RuleBody::Style { declarations, .. } => declarations.declaration_count(),
                    RuleBody::Media { rules, .. } => count(rules),
                    _ => 0,
                })
                .sum()
        }
        count(&self.rules)
    }

    /// Appends a rule and, if it (or something nested inside an `@media`
    /// block) is a style rule, indexes its selectors.
    pub fn push_rule(&mut self, rule: Rule) {
        let top_index = self.rules.len();
        let path = vec![top_index];
        self.index_rule(&rule, &path, MediaMask::ALL);
        if let RuleBody::Import { url, media } = &rule.body {
            self.pending_imports.push((top_index, url.clone(), *media));
        }
        self.rules.push(rule);
    }

    /// Removes the rule at top-level position `index`: evicts its (and any
    /// rule nested inside it via `@media`) selectors from the hash, drops
    /// any bookkeeping keyed by that index, and leaves a tombstone in
    /// [`Stylesheet::rules`] at that position rather than shifting later
    /// rules down. Per spec §4.2, rule-index uniqueness matters for
    /// addressing by [`RulePath`]; contiguity does not, so other rules'
    /// indices stay valid across a removal (spec §4.2 `remove_rule`).
    pub fn remove_rule(&mut self, index: usize) -> Result<(), crate::error::CssError> {
        if index >= self.rules.len() {
            return Err(crate::error::CssError::BadParam);
        }
        let removed = self.rules[index].clone();
        self.unindex_rule(&removed, &[index]);
        self.pending_imports.retain(|(i, _, _)| *i != index);
        self.imports.remove(&index);
        self.rules[index] = Rule { body: RuleBody::Unknown, origin: removed.origin, index };
        Ok(())
    }

    fn unindex_rule(&mut self, rule: &Rule, path: &[usize]) {
        match &rule.body {
            RuleBody::Style { .. } => {
                let removed_path = RulePath(path.to_vec());
                self.hash.remove_where(|entry: &HashEntry| entry.path == removed_path);
            }
            RuleBody::Media { rules, .. } => {
                for (i, nested) in rules.iter().enumerate() {
                    let mut child_path = path.to_vec();
                    child_path.push(i);
                    self.unindex_rule(nested, &child_path);
                }
            }
            _ => {}
        }
    }

    fn index_rule(&mut self, rule: &Rule, path: &[usize], media: MediaMask) {
        match &rule.body {
            RuleBody::Style { selectors, .. } => {
                for (sel_index, selector) in selectors.iter().enumerate() {
                    self.hash.insert(
                        selector.clone(),
                        HashEntry { path: RulePath(path.to_vec()), selector_slot: sel_index, media },
                    );
                }
            }
            RuleBody::Media { rules, media: nested_media } => {
                for (i, nested) in rules.iter().enumerate() {
                    let mut child_path = path.to_vec();
                    child_path.push(i);
                    self.index_rule(nested, &child_path, media.intersection(*nested_media));
                }
            }
            _ => {}
        }
    }

    pub fn hash(&self) -> &SelectorHash<HashEntry> {
        &self.hash
    }

    /// Resolves a [`RulePath`] to the [`Rule`] it addresses.
    pub fn resolve(&self, path: &RulePath) -> &Rule {
        let mut rules = &self.rules;
        let mut iter = path.0.iter().peekable();
        loop {
            let i = *iter.next().expect("RulePath is never empty");
            let rule = &rules[i];
            if iter.peek().is_none() {
                return rule;
            }
            match &rule.body {
                RuleBody::Media { rules: nested, .. } => rules = nested,
                _ => panic!("RulePath descends past a non-@media rule"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::selector::{Combinator, Compound, Detail};

    #[test]
    fn free_list_reuses_released_buffers() {
        let mut pool = BlobFreeList::default();
        let buf = pool.acquire(4);
        assert_eq!(buf.capacity() >= 4, true);
        pool.release(buf);
        let reused = pool.acquire(4);
        assert!(reused.is_empty());
    }

    #[test]
    fn oversized_buffers_are_not_pooled() {
        let mut pool = BlobFreeList::default();
        let buf = Vec::<u32>::with_capacity(1000);
        pool.release(buf);
        assert!(pool.buckets.iter().all(|b| b.is_empty()));
    }

    #[test]
    fn pushing_style_rule_indexes_its_selectors() {
        let mut sheet = Stylesheet::new(Origin::Author);
        let selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Element(Atom::from_str("p"))],
        }]);
        sheet.push_rule(Rule {
            body: RuleBody::Style { selectors: vec![selector], declarations: StyleBlob::new() },
            origin: Origin::Author,
            index: 0,
        });

        let candidates = sheet.hash().candidates(None, &[], &Atom::from_str("p"));
        assert_eq!(candidates.len(), 1);
    }

    #[test]
    fn import_rule_becomes_pending_until_registered() {
        let mut sheet = Stylesheet::new(Origin::Author);
        sheet.push_rule(Rule {
            body: RuleBody::Import { url: "x.css".to_string(), media: MediaMask::SCREEN },
            origin: Origin::Author,
            index: 0,
        });

        assert!(sheet.has_pending_imports());
        assert_eq!(sheet.next_pending_import(), Some(("x.css", MediaMask::SCREEN)));
        sheet.register_import(Stylesheet::new(Origin::Author)).unwrap();
        assert!(!sheet.has_pending_imports());
        assert!(sheet.imported_stylesheet(0).is_some());
        assert!(sheet.register_import(Stylesheet::new(Origin::Author)).is_err());
    }

    #[test]
    fn size_counts_declarations_across_rules() {
        let mut sheet = Stylesheet::new(Origin::Author);
        let selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Element(Atom::from_str("p"))],
        }]);
        let mut blob = StyleBlob::new();
        blob.push(
            crate::style::PropertyId::Display,
            false,
            false,
            &crate::bytecode::Value::Keyword(1),
        );
        blob.push(
            crate::style::PropertyId::Color,
            false,
            false,
            &crate::bytecode::Value::Color(crate::color::Color::BLACK),
        );
        sheet.push_rule(Rule {
            body: RuleBody::Style { selectors: vec![selector], declarations: blob },
            origin: Origin::Author,
            index: 0,
        });

        assert_eq!(sheet.size(), 2);
    }

    #[test]
    fn remove_rule_evicts_its_selectors_but_keeps_other_indices() {
        let mut sheet = Stylesheet::new(Origin::Author);
        let p_selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Element(Atom::from_str("p"))],
        }]);
        let span_selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Element(Atom::from_str("span"))],
        }]);
        sheet.push_rule(Rule {
            body: RuleBody::Style { selectors: vec![p_selector], declarations: StyleBlob::new() },
            origin: Origin::Author,
            index: 0,
        });
        sheet.push_rule(Rule {
            body: RuleBody::Style { selectors: vec![span_selector], declarations: StyleBlob::new() },
            origin: Origin::Author,
            index: 1,
        });

        sheet.remove_rule(0).unwrap();

        assert!(sheet.hash().candidates(None, &[], &Atom::from_str("p")).is_empty());
        assert_eq!(sheet.hash().candidates(None, &[], &Atom::from_str("span")).len(), 1);
        assert!(matches!(sheet.rules[0].body, RuleBody::Unknown));
        assert!(sheet.remove_rule(99).is_err());
    }
}
