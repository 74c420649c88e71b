//! The selection handler: the host-supplied DOM query capability (spec §4.4,
//! §6's External Interfaces).
//!
//! This crate never walks a DOM itself — it only knows how to match
//! selectors against whatever an embedder's tree looks like by asking that
//! embedder. Grounded on
//! `examples/original_source/cocoa-framework/CSSSelectHandlerBase.h`'s
//! no-op base implementation of the same capability interface (there,
//! Objective-C methods with trivial bodies; here, a Rust trait with default
//! methods so an embedder only overrides what it actually needs).

use crate::atom::Atom;
use crate::color::Color;
use crate::length::Length;
use crate::media::MediaMask;
use crate::style::PropertyId;

/// A node handle is whatever the embedder's DOM uses to identify an element;
/// this crate never dereferences it, only passes it back to the handler.
pub trait SelectionHandler {
    type Node: Clone;

    fn node_name(&self, node: &Self::Node) -> Atom;

    /// The node's `id`, if any. Used both for direct `#foo` matching and to
    /// probe the id bucket of a stylesheet's selector hash.
    fn node_id(&self, node: &Self::Node) -> Option<Atom> {
        let _ = node;
        None
    }

    /// Every class the node carries. Used both for direct `.foo` matching
    /// and to probe the selector hash's class buckets.
    fn node_classes(&self, node: &Self::Node) -> Vec<Atom> {
        let _ = node;
        Vec::new()
    }

    fn node_has_class(&self, node: &Self::Node, class: &Atom) -> bool {
        self.node_classes(node).iter().any(|c| c == class)
    }

    fn node_has_id(&self, node: &Self::Node, id: &Atom) -> bool {
        self.node_id(node).as_ref() == Some(id)
    }

    fn node_attribute(&self, node: &Self::Node, name: &Atom) -> Option<Atom> {
        let _ = (node, name);
        None
    }

    fn named_parent_node(&self, node: &Self::Node) -> Option<Self::Node> {
        let _ = node;
        None
    }

    fn named_ancestor_node(&self, node: &Self::Node) -> Option<Self::Node> {
        self.named_parent_node(node)
    }

    fn named_sibling_node(&self, node: &Self::Node) -> Option<Self::Node> {
        let _ = node;
        None
    }

    fn node_is_link(&self, node: &Self::Node) -> bool {
        let _ = node;
        false
    }

    fn node_is_visited(&self, node: &Self::Node) -> bool {
        let _ = node;
        false
    }

    fn node_is_hover(&self, node: &Self::Node) -> bool {
        let _ = node;
        false
    }

    fn node_is_active(&self, node: &Self::Node) -> bool {
        let _ = node;
        false
    }

    fn node_is_focus(&self, node: &Self::Node) -> bool {
        let _ = node;
        false
    }

    /// The node's language, for `:lang()` matching (spec §4.4's
    /// `node_is_lang`). `:lang(xx)` matches when this tag's primary subtag
    /// equals `xx`, or `xx` is a prefix of it followed by `-` (BCP 47
    /// range matching, e.g. `:lang(en)` matches a node tagged `en-US`).
    fn node_lang(&self, node: &Self::Node) -> Option<language_tags::LanguageTag> {
        let _ = node;
        None
    }

    /// String-valued initial defaults an embedder wants to control directly
    /// (spec §4.1's `initialise(style, handler, pw)` hook), e.g. `quotes`.
    /// Defaults to CSS2.1's own initial value (the empty list).
    fn initial_quotes(&self, node: &Self::Node) -> Vec<(Atom, Atom)> {
        let _ = node;
        Vec::new()
    }

    /// A presentational hint the embedder wants treated as if it were a
    /// user-agent-origin declaration for `property` (spec §4.4), e.g. an
    /// HTML `<font color>` attribute. Returning `None` means "no hint."
    fn node_presentational_hint(&self, node: &Self::Node, property: PropertyId) -> Option<PresentationalHint> {
        let _ = (node, property);
        None
    }

    /// A user-agent default value for `property` on `node`, consulted when
    /// no rule in any stylesheet sets it and the property does not inherit
    /// (spec §4.4). Returning `None` uses the CSS2.1 initial value.
    fn ua_default_for_property(&self, node: &Self::Node, property: PropertyId) -> Option<PresentationalHint> {
        let _ = (node, property);
        None
    }

    /// Resolves a possibly font-relative `font-size` value to an absolute
    /// pixel size, given the parent's already-resolved font-size in pixels.
    /// This is the one callback every composed style needs, so it has no
    /// default: an embedder with no opinion can just pass
    /// `length.to_px(parent_px, None).value()` through.
    fn compute_font_size(&self, node: &Self::Node, specified: Length, parent_font_size_px: f32) -> f32;

    /// The active media mask for `node` (spec §5), e.g. `screen`. Defaults
    /// to [`MediaMask::SCREEN`].
    fn media(&self, node: &Self::Node) -> MediaMask {
        let _ = node;
        MediaMask::SCREEN
    }
}

/// The value half of a presentational hint or UA default (spec §4.4); kept
/// deliberately small since only a handful of property shapes ever need a
/// host-injected hint in practice.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationalHint {
    Keyword(u8),
    Length(Length),
    Color(Color),
}

/// A `SelectionHandler` that answers every query with "no information,"
/// used when an embedder has no DOM to consult (for example, composing a
/// UA stylesheet's own properties against itself in a test). Grounded on
/// the same no-op-base idea as `CSSSelectHandlerBase.h`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSelectionHandler;

impl SelectionHandler for NullSelectionHandler {
    type Node = ();

    fn node_name(&self, _node: &()) -> Atom {
        Atom::from_str("")
    }

    fn compute_font_size(&self, _node: &(), specified: Length, parent_font_size_px: f32) -> f32 {
        specified.to_px(parent_font_size_px, None).value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_handler_resolves_font_size_via_to_px() {
        let h = NullSelectionHandler;
        let px = h.compute_font_size(&(), Length::new(2.0, crate::length::Unit::Em), 10.0);
        assert!((px - 20.0).abs() < 0.01);
    }

    #[test]
    fn null_handler_has_no_ancestry() {
        let h = NullSelectionHandler;
        assert!(h.named_parent_node(&()).is_none());
        assert!(!h.node_has_class(&(), &Atom::from_str("x")));
    }
}
