//! The cascade: turning a node plus a set of stylesheets into a computed
//! style (spec §4.4, §8).
//!
//! No cascade-algorithm source ships in the reference pack under that name;
//! the flow below — gather every selector hash's candidates for the
//! element, discard the ones whose full compound chain doesn't actually
//! match by walking combinators back through the handler's ancestry
//! callbacks, sort survivors by the CSS2.1 §6.4.1 cascade order, then apply
//! each survivor's declarations to a fresh [`StyleBuilder`] in that order —
//! is derived from spec.md's own description of `select_style` (spec §4.4),
//! using the selector/rule storage shape
//! `examples/original_source/libcss/src/stylesheet.h` declares. Later,
//! higher-precedence declarations overwrite earlier ones as
//! `StyleBlob::apply` runs each survivor in turn, except that an
//! already-applied `!important` declaration refuses to be overwritten by a
//! later non-important one for the same property (CSS2.1 §6.4.1).

use crate::handler::SelectionHandler;
use crate::length::Length;
use crate::rule::{Origin, Rule, RuleBody, Stylesheet};
use crate::selector::{Combinator, Compound, Detail, Selector, Specificity};
use crate::style::compute::StyleBuilder;
use crate::style::ComputedStyle;

/// The cascade precedence key for one matched declaration block (CSS2.1
/// §6.4.1): origin (with `!important` able to promote user rules above
/// author rules), specificity, then document order as the final tie-break.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Precedence {
    important: bool,
    origin_rank: u8,
    specificity: Specificity,
    document_order: (usize, usize, usize),
}

fn origin_rank(origin: Origin, important: bool) -> u8 {
    // CSS2.1 §6.4.1: for normal declarations, UA < user < author. For
    // `!important` declarations the order reverses: author < user < UA.
    match (origin, important) {
        (Origin::UserAgent, false) => 0,
        (Origin::User, false) => 1,
        (Origin::Author, false) => 2,
        (Origin::Author, true) => 3,
        (Origin::User, true) => 4,
        (Origin::UserAgent, true) => 5,
    }
}

/// Runs the selector-matching and cascade algorithm for one node against a
/// set of stylesheets through a [`SelectionHandler`]. Stylesheets
/// participate in selection in list order (spec §6's Selection API), and
/// can be added, inserted, or removed after construction via
/// `context_add_stylesheet`/`context_insert_at`/`context_remove`.
pub struct SelectionContext<'a, H: SelectionHandler> {
    handler: &'a H,
    stylesheets: Vec<&'a Stylesheet>,
}

impl<'a, H: SelectionHandler> SelectionContext<'a, H> {
    /// `context_create` (spec §6), seeded with an initial stylesheet list.
    pub fn new(handler: &'a H, stylesheets: Vec<&'a Stylesheet>) -> Self {
        SelectionContext { handler, stylesheets }
    }

    /// Appends `sheet` at `position` among the stylesheets that participate
    /// in selection, or at the end if `position` is past the current count
    /// (spec §6 `context_add_stylesheet`).
    pub fn context_add_stylesheet(&mut self, sheet: &'a Stylesheet, position: usize) {
        let at = position.min(self.stylesheets.len());
        self.stylesheets.insert(at, sheet);
    }

    /// Inserts `sheet` at exactly `index`, shifting later entries down
    /// (spec §6 `context_insert_at`). `index` may equal the current count to
    /// append.
    pub fn context_insert_at(&mut self, sheet: &'a Stylesheet, index: usize) {
        let at = index.min(self.stylesheets.len());
        self.stylesheets.insert(at, sheet);
    }

    /// Removes the first stylesheet identical (by pointer) to `sheet`, if
    /// any (spec §6 `context_remove`).
    pub fn context_remove(&mut self, sheet: &Stylesheet) {
        if let Some(pos) = self.stylesheets.iter().position(|s| std::ptr::eq(*s, sheet)) {
            self.stylesheets.remove(pos);
        }
    }

    /// The number of stylesheets currently participating in selection
    /// (spec §6 `context_count`).
    pub fn context_count(&self) -> usize {
        self.stylesheets.len()
    }

    /// Computes the style for `node`, given its already-composed parent
    /// style (`None` for the root) and whether `node` is the document root
    /// (spec §4.1's root-element `display` fixup — not implied by `parent`
    /// being `None`, since an embedder may omit a parent for other reasons).
    pub fn select_style(
        &self,
        node: &H::Node,
        parent: Option<&ComputedStyle>,
        is_root: bool,
    ) -> ComputedStyle {
        let mut matches = self.gather_matches(node);
        matches.sort_by(|a, b| a.0.cmp(&b.0));

        let mut builder = StyleBuilder::with_initial_quotes(self.handler.initial_quotes(node));
        for (_, path, sheet_index) in &matches {
            let sheet = self.stylesheets[*sheet_index];
            if let RuleBody::Style { declarations, .. } = &sheet.resolve(path).body {
                declarations.apply(&mut builder);
            }
        }

        builder.finish(parent, is_root, |specified, parent_px| {
            self.handler.compute_font_size(node, specified, parent_px)
        })
    }

    /// Collects every `(precedence, rule_path, sheet_index)` triple whose
    /// selector actually matches `node`, from every sheet's hash.
    fn gather_matches(&self, node: &H::Node) -> Vec<(Precedence, crate::rule::RulePath, usize)> {
        let element_name = self.handler.node_name(node);
        let id = self.handler.node_id(node);
        let classes = self.handler.node_classes(node);
        let media = self.handler.media(node);

        let mut out = Vec::new();
        for (sheet_index, sheet) in self.stylesheets.iter().enumerate() {
            for (doc_order, (selector, entry)) in sheet
                .hash()
                .candidates(id.as_ref(), &classes, &element_name)
                .into_iter()
                .enumerate()
            {
                if !entry.media.intersects(media) {
                    continue;
                }
                let quirks = sheet.quirks_allowed && sheet.used_quirks;
                if !self.selector_matches(&selector, node, quirks) {
                    continue;
                }
                let rule = sheet.resolve(&entry.path);
                let important = declaration_block_has_important(rule);
                let precedence = Precedence {
                    important,
                    origin_rank: origin_rank(sheet.origin, important),
                    specificity: selector.specificity(),
                    document_order: (sheet_index, doc_order, entry.selector_slot),
                };
                out.push((precedence, entry.path.clone(), sheet_index));
            }
        }
        out
    }

    /// Walks a selector's compound chain from right to left, following
    /// `named_parent_node`/`named_ancestor_node`/`named_sibling_node` for
    /// each combinator, matching the rightmost compound against `node`
    /// itself. `quirks` is the matched stylesheet's quirks-mode flag (spec
    /// §9's Open Question (c)): when set, class/id comparisons fold ASCII
    /// case.
    fn selector_matches(&self, selector: &Selector, node: &H::Node, quirks: bool) -> bool {
        let mut compounds = selector.compounds.iter().rev();
        let rightmost = match compounds.next() {
            Some(c) => c,
            None => return false,
        };
        if !self.compound_matches(rightmost, node, quirks) {
            return false;
        }

        let mut current = node.clone();
        let mut next_combinator = rightmost.combinator;
        for compound in compounds {
            let candidate = match next_combinator {
                Combinator::None => return true,
                Combinator::Child => self.handler.named_parent_node(&current),
                Combinator::Descendant => self.handler.named_ancestor_node(&current),
                Combinator::AdjacentSibling => self.handler.named_sibling_node(&current),
            };
            let found = match next_combinator {
                Combinator::Descendant => self.find_matching_ancestor(compound, &current, quirks),
                _ => candidate.filter(|n| self.compound_matches(compound, n, quirks)),
            };
            match found {
                Some(n) => current = n,
                None => return false,
            }
            next_combinator = compound.combinator;
        }
        true
    }

    /// A descendant combinator may need to walk several ancestors before
    /// one matches, unlike child/adjacent-sibling which test exactly one
    /// candidate.
    fn find_matching_ancestor(&self, compound: &Compound, from: &H::Node, quirks: bool) -> Option<H::Node> {
        let mut current = self.handler.named_ancestor_node(from);
        while let Some(candidate) = current {
            if self.compound_matches(compound, &candidate, quirks) {
                return Some(candidate);
            }
            current = self.handler.named_ancestor_node(&candidate);
        }
        None
    }

    fn compound_matches(&self, compound: &Compound, node: &H::Node, quirks: bool) -> bool {
        compound.details.iter().all(|d| self.detail_matches(d, node, quirks))
    }

    fn detail_matches(&self, detail: &Detail, node: &H::Node, quirks: bool) -> bool {
        match detail {
            Detail::Universal => true,
            Detail::Element(name) => &self.handler.node_name(node) == name,
            Detail::Class(class) => {
                if quirks {
                    self.handler.node_classes(node).iter().any(|c| c.eq_ignore_ascii_case(class))
                } else {
                    self.handler.node_has_class(node, class)
                }
            }
            Detail::Id(id) => {
                if quirks {
                    self.handler.node_id(node).map_or(false, |n| n.eq_ignore_ascii_case(id))
                } else {
                    self.handler.node_has_id(node, id)
                }
            }
            Detail::PseudoClass(name) => self.pseudo_class_matches(name.as_str(), node),
            // Pseudo-elements (`::before`) don't correspond to a real node
            // in the handler's tree; matching them is the caller's
            // responsibility once it knows which pseudo-element, if any,
            // it's asking about (spec §4.2's Non-goals).
            Detail::PseudoElement(_) => true,
            Detail::AttributePresent(name) => self.handler.node_attribute(node, name).is_some(),
            Detail::AttributeEquals(name, value) => {
                self.handler.node_attribute(node, name).as_ref() == Some(value)
            }
            Detail::AttributeIncludes(name, value) => self
                .handler
                .node_attribute(node, name)
                .map(|v| v.as_str().split_whitespace().any(|w| w == value.as_str()))
                .unwrap_or(false),
            Detail::AttributeDashMatch(name, value) => self
                .handler
                .node_attribute(node, name)
                .map(|v| {
                    v.as_str() == value.as_str()
                        || v.as_str().starts_with(&format!("{}-", value.as_str()))
                })
                .unwrap_or(false),
        }
    }

    fn pseudo_class_matches(&self, name: &str, node: &H::Node) -> bool {
        if let Some(range) = name.strip_prefix("lang(").and_then(|s| s.strip_suffix(')')) {
            return self
                .handler
                .node_lang(node)
                .map_or(false, |tag| lang_range_matches(range, &tag));
        }
        match name {
            "link" => self.handler.node_is_link(node),
            "visited" => self.handler.node_is_visited(node),
            "hover" => self.handler.node_is_hover(node),
            "active" => self.handler.node_is_active(node),
            "focus" => self.handler.node_is_focus(node),
            "first-child" => self.handler.named_parent_node(node).is_some()
                && self.handler.named_sibling_node(node).is_none(),
            _ => false,
        }
    }
}

/// CSS2.1 §5.11.2's `:lang()` range matching: `range` matches `tag` when
/// they're ASCII-case-insensitively equal, or `range` is a `-`-terminated
/// prefix of `tag` (e.g. `en` matches `en-US`).
fn lang_range_matches(range: &str, tag: &language_tags::LanguageTag) -> bool {
    let tag_str = tag.as_str();
    if tag_str.eq_ignore_ascii_case(range) {
        return true;
    }
    tag_str.len() > range.len()
        && tag_str[..range.len()].eq_ignore_ascii_case(range)
        && tag_str.as_bytes()[range.len()] == b'-'
}

/// Whether any declaration in `rule`'s block carries `!important`. A block
/// can mix important and non-important declarations, so this is a
/// rule-granularity approximation of the true per-declaration precedence
/// (CSS2.1 §6.4.1): it decides how the whole rule sorts relative to other
/// candidates, while `StyleBuilder`'s importance mask (see
/// [`crate::bytecode::StyleBlob::apply`]) separately refuses to let a later,
/// non-important declaration overwrite a property an earlier important one
/// already set, so a mixed block's important declarations still can't be
/// clobbered even if the rule-level sort doesn't single them out.
fn declaration_block_has_important(rule: &Rule) -> bool {
    match &rule.body {
        RuleBody::Style { declarations, .. } => declarations.has_important(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bytecode::{StyleBlob, Value};
    use crate::handler::NullSelectionHandler;
    use crate::length::Unit;
    use crate::rule::Stylesheet;
    use crate::style::PropertyId;

    #[derive(Clone)]
    struct Node {
        name: &'static str,
    }

    struct TestHandler;

    impl SelectionHandler for TestHandler {
        type Node = Node;

        fn node_name(&self, node: &Node) -> Atom {
            Atom::from_str(node.name)
        }

        fn compute_font_size(&self, _node: &Node, specified: Length, parent_px: f32) -> f32 {
            specified.to_px(parent_px, None).value()
        }
    }

    fn style_rule(selector: Selector, blob: StyleBlob, origin: Origin, index: usize) -> Rule {
        Rule {
            body: RuleBody::Style { selectors: vec![selector], declarations: blob },
            origin,
            index,
        }
    }

    #[test]
    fn element_selector_matches_and_applies_declaration() {
        let mut sheet = Stylesheet::new(Origin::Author);
        let selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Element(Atom::from_str("p"))],
        }]);
        let mut blob = StyleBlob::new();
        blob.push(PropertyId::Display, false, false, &Value::Keyword(1));
        sheet.push_rule(style_rule(selector, blob, Origin::Author, 0));

        let handler = TestHandler;
        let ctx = SelectionContext::new(&handler, vec![&sheet]);
        let style = ctx.select_style(&Node { name: "p" }, None, false);
        assert_ne!(style.display, crate::style::properties::Display::default());
    }

    #[test]
    fn non_matching_element_keeps_initial_style() {
        let mut sheet = Stylesheet::new(Origin::Author);
        let selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Element(Atom::from_str("p"))],
        }]);
        let mut blob = StyleBlob::new();
        blob.push(PropertyId::Display, false, false, &Value::Keyword(1));
        sheet.push_rule(style_rule(selector, blob, Origin::Author, 0));

        let handler = TestHandler;
        let ctx = SelectionContext::new(&handler, vec![&sheet]);
        let style = ctx.select_style(&Node { name: "span" }, None, false);
        assert_eq!(style.display, crate::style::properties::Display::default());
    }

    #[test]
    fn higher_specificity_wins_regardless_of_document_order() {
        let mut sheet = Stylesheet::new(Origin::Author);
        let low = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Element(Atom::from_str("p"))],
        }]);
        let high = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Element(Atom::from_str("p")), Detail::Id(Atom::from_str("x"))],
        }]);

        let mut low_blob = StyleBlob::new();
        low_blob.push(PropertyId::Color, false, false, &Value::Color(crate::color::Color::BLACK));
        let mut high_blob = StyleBlob::new();
        high_blob.push(
            PropertyId::Color,
            false,
            false,
            &Value::Color(crate::color::Color::from_rgba(1, 2, 3, 255)),
        );

        sheet.push_rule(style_rule(low, low_blob, Origin::Author, 0));
        sheet.push_rule(style_rule(high, high_blob, Origin::Author, 1));

        struct IdHandler;
        impl SelectionHandler for IdHandler {
            type Node = Node;
            fn node_name(&self, node: &Node) -> Atom {
                Atom::from_str(node.name)
            }
            fn node_id(&self, _node: &Node) -> Option<Atom> {
                Some(Atom::from_str("x"))
            }
            fn compute_font_size(&self, _node: &Node, specified: Length, parent_px: f32) -> f32 {
                specified.to_px(parent_px, None).value()
            }
        }

        let handler = IdHandler;
        let ctx = SelectionContext::new(&handler, vec![&sheet]);
        let style = ctx.select_style(&Node { name: "p" }, None, false);
        assert_eq!(style.color, crate::color::Color::from_rgba(1, 2, 3, 255));
    }

    #[test]
    fn null_handler_compiles_against_the_trait() {
        let _handler = NullSelectionHandler;
        let _ = Unit::Px;
    }

    #[test]
    fn quirks_mode_class_match_is_case_insensitive() {
        let mut sheet = Stylesheet::new(Origin::Author);
        sheet.quirks_allowed = true;
        sheet.used_quirks = true;
        let selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Class(Atom::from_str("Warn"))],
        }]);
        let mut blob = StyleBlob::new();
        blob.push(PropertyId::Display, false, false, &Value::Keyword(1));
        sheet.push_rule(style_rule(selector, blob, Origin::Author, 0));

        struct ClassHandler;
        impl SelectionHandler for ClassHandler {
            type Node = Node;
            fn node_name(&self, node: &Node) -> Atom {
                Atom::from_str(node.name)
            }
            fn node_classes(&self, _node: &Node) -> Vec<Atom> {
                vec![Atom::from_str("warn")]
            }
            fn compute_font_size(&self, _node: &Node, specified: Length, parent_px: f32) -> f32 {
                specified.to_px(parent_px, None).value()
            }
        }

        let handler = ClassHandler;
        let ctx = SelectionContext::new(&handler, vec![&sheet]);
        let style = ctx.select_style(&Node { name: "p" }, None, false);
        assert_ne!(style.display, crate::style::properties::Display::default());
    }

    #[test]
    fn non_quirks_class_match_is_case_sensitive() {
        let mut sheet = Stylesheet::new(Origin::Author);
        let selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![Detail::Class(Atom::from_str("Warn"))],
        }]);
        let mut blob = StyleBlob::new();
        blob.push(PropertyId::Display, false, false, &Value::Keyword(1));
        sheet.push_rule(style_rule(selector, blob, Origin::Author, 0));

        struct ClassHandler;
        impl SelectionHandler for ClassHandler {
            type Node = Node;
            fn node_name(&self, node: &Node) -> Atom {
                Atom::from_str(node.name)
            }
            fn node_classes(&self, _node: &Node) -> Vec<Atom> {
                vec![Atom::from_str("warn")]
            }
            fn compute_font_size(&self, _node: &Node, specified: Length, parent_px: f32) -> f32 {
                specified.to_px(parent_px, None).value()
            }
        }

        let handler = ClassHandler;
        let ctx = SelectionContext::new(&handler, vec![&sheet]);
        let style = ctx.select_style(&Node { name: "p" }, None, false);
        assert_eq!(style.display, crate::style::properties::Display::default());
    }

    #[test]
    fn lang_pseudo_class_matches_bcp47_prefix() {
        let mut sheet = Stylesheet::new(Origin::Author);
        let selector = Selector::new(vec![Compound {
            combinator: Combinator::None,
            details: vec![
                Detail::Element(Atom::from_str("p")),
                Detail::PseudoClass(Atom::from_str("lang(en)")),
            ],
        }]);
        let mut blob = StyleBlob::new();
        blob.push(PropertyId::Display, false, false, &Value::Keyword(1));
        sheet.push_rule(style_rule(selector, blob, Origin::Author, 0));

        struct LangHandler;
        impl SelectionHandler for LangHandler {
            type Node = Node;
            fn node_name(&self, node: &Node) -> Atom {
                Atom::from_str(node.name)
            }
            fn node_lang(&self, _node: &Node) -> Option<language_tags::LanguageTag> {
                language_tags::LanguageTag::parse("en-US").ok()
            }
            fn compute_font_size(&self, _node: &Node, specified: Length, parent_px: f32) -> f32 {
                specified.to_px(parent_px, None).value()
            }
        }

        let handler = LangHandler;
        let ctx = SelectionContext::new(&handler, vec![&sheet]);
        let style = ctx.select_style(&Node { name: "p" }, None, false);
        assert_ne!(style.display, crate::style::properties::Display::default());

        struct OtherLangHandler;
        impl SelectionHandler for OtherLangHandler {
            type Node = Node;
            fn node_name(&self, node: &Node) -> Atom {
                Atom::from_str(node.name)
            }
            fn node_lang(&self, _node: &Node) -> Option<language_tags::LanguageTag> {
                language_tags::LanguageTag::parse("fr").ok()
            }
            fn compute_font_size(&self, _node: &Node, specified: Length, parent_px: f32) -> f32 {
                specified.to_px(parent_px, None).value()
            }
        }

        let other_handler = OtherLangHandler;
        let other_ctx = SelectionContext::new(&other_handler, vec![&sheet]);
        let unmatched = other_ctx.select_style(&Node { name: "p" }, None, false);
        assert_eq!(unmatched.display, crate::style::properties::Display::default());
    }

    #[test]
    fn context_management_tracks_insertion_removal_and_count() {
        let handler = TestHandler;
        let mut ctx = SelectionContext::new(&handler, Vec::new());
        assert_eq!(ctx.context_count(), 0);

        let sheet_a = Stylesheet::new(Origin::Author);
        let sheet_b = Stylesheet::new(Origin::UserAgent);
        ctx.context_add_stylesheet(&sheet_a, 0);
        assert_eq!(ctx.context_count(), 1);

        ctx.context_insert_at(&sheet_b, 0);
        assert_eq!(ctx.context_count(), 2);

        ctx.context_remove(&sheet_a);
        assert_eq!(ctx.context_count(), 1);
    }
}
