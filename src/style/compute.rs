//! The computed style record and its composition/fixup passes (spec §3,
//! §4.1, §9).
//!
//! Grounded on `examples/original_source/libcss/include/libcss/computed.h`'s
//! `css_computed_style` / `css_computed_uncommon` split, and on
//! `examples/original_source/libcss/src/select/computed.h`'s accessor
//! declarations for `top`/`right`/`bottom`/`left` (the `position: relative`
//! opposing-sides rule from CSS2.1 §9.4.3 that those accessors resolve).
//! Where the source bit-packs every property into a handful of `uint32_t`
//! words, this module instead takes spec §9's explicitly-permitted
//! alternative: one typed Rust field per property. A bitset
//! ([`ExplicitMask`]) plays the role the source's "which sub-bits are
//! non-initial" packing plays, tracking only what composition needs to
//! know — whether a property was explicitly set by some declaration, so
//! inheritance vs. the initial value can be decided once composition for an
//! element is done.

use once_cell::sync::Lazy;

use crate::color::Color;
use crate::length::{Length, Unit};
use crate::parsers::Parse;
use crate::style::properties::*;
use crate::style::uncommon::Uncommon;

/// The full computed style for one element. Produced by
/// [`StyleBuilder::finish`]; immutable afterwards (querying it is the only
/// supported operation, per spec §6's Computed-style API).
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub background_attachment: BackgroundAttachment,
    pub background_color: Color,
    pub background_image: Option<crate::atom::Atom>,
    pub background_position: BackgroundPosition,
    pub background_repeat: BackgroundRepeat,
    pub border_collapse: BorderCollapse,
    pub border_top_color: ColorOrCurrent,
    pub border_right_color: ColorOrCurrent,
    pub border_bottom_color: ColorOrCurrent,
    pub border_left_color: ColorOrCurrent,
    pub border_top_style: BorderStyle,
    pub border_right_style: BorderStyle,
    pub border_bottom_style: BorderStyle,
    pub border_left_style: BorderStyle,
    pub border_top_width: BorderWidth,
    pub border_right_width: BorderWidth,
    pub border_bottom_width: BorderWidth,
    pub border_left_width: BorderWidth,
    pub caption_side: CaptionSide,
    pub clear: Clear,
    pub color: Color,
    pub direction: Direction,
    pub display: Display,
    pub empty_cells: EmptyCells,
    pub float: Float,
    pub font_family: Vec<crate::atom::Atom>,
    pub font_size: Length,
    pub font_style: FontStyle,
    pub font_variant: FontVariant,
    pub font_weight: FontWeight,
    pub height: LengthOrAuto,
    pub line_height: LineHeight,
    pub list_style_image: Option<crate::atom::Atom>,
    pub list_style_position: ListStylePosition,
    pub list_style_type: ListStyleType,
    pub margin_top: LengthOrAuto,
    pub margin_right: LengthOrAuto,
    pub margin_bottom: LengthOrAuto,
    pub margin_left: LengthOrAuto,
    pub max_height: LengthOrNone,
    pub max_width: LengthOrNone,
    pub min_height: Length,
    pub min_width: Length,
    pub overflow: Overflow,
    pub outline_style: BorderStyle,
    pub padding_top: Length,
    pub padding_right: Length,
    pub padding_bottom: Length,
    pub padding_left: Length,
    pub position: Position,
    pub quotes: Vec<(crate::atom::Atom, crate::atom::Atom)>,
    pub table_layout: TableLayout,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
    pub text_indent: Length,
    pub text_transform: TextTransform,
    pub top: LengthOrAuto,
    pub right: LengthOrAuto,
    pub bottom: LengthOrAuto,
    pub left: LengthOrAuto,
    pub unicode_bidi: UnicodeBidi,
    pub vertical_align: VerticalAlign,
    pub visibility: Visibility,
    pub white_space: WhiteSpace,
    pub width: LengthOrAuto,
    pub z_index: ZIndex,
    uncommon: Option<Box<Uncommon>>,
}

/// `border-*-color`'s initial value is `currentColor`, not a fixed color, so
/// it needs its own small sum type rather than reusing [`Color`] directly.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ColorOrCurrent {
    CurrentColor,
    Color(Color),
}

impl Default for ColorOrCurrent {
    fn default() -> Self {
        ColorOrCurrent::CurrentColor
    }
}

impl crate::parsers::Parse for ColorOrCurrent {
    fn parse<'i>(
        parser: &mut cssparser::Parser<'i, '_>,
    ) -> Result<Self, crate::error::ParseError<'i>> {
        if parser
            .try_parse(|p| p.expect_ident_matching("currentcolor"))
            .is_ok()
        {
            return Ok(ColorOrCurrent::CurrentColor);
        }
        Ok(ColorOrCurrent::Color(Color::parse(parser)?))
    }
}

impl ColorOrCurrent {
    pub fn resolve(self, current: Color) -> Color {
        match self {
            ColorOrCurrent::CurrentColor => current,
            ColorOrCurrent::Color(c) => c,
        }
    }
}

static DEFAULT_UNCOMMON: Lazy<Uncommon> = Lazy::new(Uncommon::default);

impl ComputedStyle {
    /// The CSS2.1 initial value of every property (CSS2.1 Appendix F),
    /// before any rule, inheritance, or fixup has been applied.
    pub fn initial() -> Self {
        ComputedStyle {
            background_attachment: BackgroundAttachment::default(),
            background_color: Color::TRANSPARENT,
            background_image: None,
            background_position: BackgroundPosition::default(),
            background_repeat: BackgroundRepeat::default(),
            border_collapse: BorderCollapse::default(),
            border_top_color: ColorOrCurrent::default(),
            border_right_color: ColorOrCurrent::default(),
            border_bottom_color: ColorOrCurrent::default(),
            border_left_color: ColorOrCurrent::default(),
            border_top_style: BorderStyle::default(),
            border_right_style: BorderStyle::default(),
            border_bottom_style: BorderStyle::default(),
            border_left_style: BorderStyle::default(),
            border_top_width: BorderWidth::default(),
            border_right_width: BorderWidth::default(),
            border_bottom_width: BorderWidth::default(),
            border_left_width: BorderWidth::default(),
            caption_side: CaptionSide::default(),
            clear: Clear::default(),
            color: Color::BLACK,
            direction: Direction::default(),
            display: Display::default(),
            empty_cells: EmptyCells::default(),
            float: Float::default(),
            font_family: Vec::new(),
            font_size: Length::new(16.0, Unit::Px),
            font_style: FontStyle::default(),
            font_variant: FontVariant::default(),
            font_weight: FontWeight::default(),
            height: LengthOrAuto::Auto,
            line_height: LineHeight::default(),
            list_style_image: None,
            list_style_position: ListStylePosition::default(),
            list_style_type: ListStyleType::default(),
            margin_top: LengthOrAuto::Length(Length::zero()),
            margin_right: LengthOrAuto::Length(Length::zero()),
            margin_bottom: LengthOrAuto::Length(Length::zero()),
            margin_left: LengthOrAuto::Length(Length::zero()),
            max_height: LengthOrNone::None_,
            max_width: LengthOrNone::None_,
            min_height: Length::zero(),
            min_width: Length::zero(),
            overflow: Overflow::default(),
            outline_style: BorderStyle::default(),
            padding_top: Length::zero(),
            padding_right: Length::zero(),
            padding_bottom: Length::zero(),
            padding_left: Length::zero(),
            position: Position::default(),
            quotes: Vec::new(),
            table_layout: TableLayout::default(),
            text_align: TextAlign::default(),
            text_decoration: TextDecoration::default(),
            text_indent: Length::zero(),
            text_transform: TextTransform::default(),
            top: LengthOrAuto::Auto,
            right: LengthOrAuto::Auto,
            bottom: LengthOrAuto::Auto,
            left: LengthOrAuto::Auto,
            unicode_bidi: UnicodeBidi::default(),
            vertical_align: VerticalAlign::default(),
            visibility: Visibility::default(),
            white_space: WhiteSpace::default(),
            width: LengthOrAuto::Auto,
            z_index: ZIndex::default(),
            uncommon: None,
        }
    }

    pub fn uncommon(&self) -> &Uncommon {
        self.uncommon.as_deref().unwrap_or(&DEFAULT_UNCOMMON)
    }

    /// Lazily allocates the uncommon sub-record the first time one of its
    /// properties is written to.
    pub fn uncommon_mut(&mut self) -> &mut Uncommon {
        self.uncommon.get_or_insert_with(|| Box::new(Uncommon::default()))
    }

    /// Drops the uncommon allocation if composition happened to leave every
    /// field at its initial value (for example, a rule set `cursor: auto`
    /// explicitly, which is also the initial value).
    fn compact_uncommon(&mut self) {
        if self.uncommon.as_deref().map_or(false, Uncommon::is_initial) {
            self.uncommon = None;
        }
    }
}

/// Tracks which properties a [`StyleBuilder`] has seen an explicit
/// declaration for, so [`StyleBuilder::finish`] knows whether to inherit
/// from the parent or fall back to the initial value for everything else.
#[derive(Debug, Clone, Copy, Default)]
struct ExplicitMask([u64; 2]);

impl ExplicitMask {
    fn set(&mut self, id: PropertyId) {
        let bit = id as u16 as usize;
        self.0[bit / 64] |= 1 << (bit % 64);
    }

    fn get(&self, id: PropertyId) -> bool {
        let bit = id as u16 as usize;
        self.0[bit / 64] & (1 << (bit % 64)) != 0
    }
}

/// Accumulates the result of executing a rule's declarations against one
/// element, before inheritance and fixups are applied (spec §4.1 `compose`).
pub struct StyleBuilder {
    style: ComputedStyle,
    explicit: ExplicitMask,
    important: ExplicitMask,
}

impl StyleBuilder {
    pub fn new() -> Self {
        Self::with_initial_quotes(Vec::new())
    }

    /// Like [`StyleBuilder::new`], but seeds `quotes`'s initial value from
    /// the selection handler's `initial_quotes` hook (spec §4.1's
    /// `initialise(style, handler, pw)`) instead of the empty list CSS2.1's
    /// own initial value would otherwise leave it at, so an embedder's UA
    /// stylesheet can supply its own default quote pairs.
    pub fn with_initial_quotes(quotes: Vec<(crate::atom::Atom, crate::atom::Atom)>) -> Self {
        let mut style = ComputedStyle::initial();
        style.quotes = quotes;
        StyleBuilder {
            style,
            explicit: ExplicitMask::default(),
            important: ExplicitMask::default(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ComputedStyle {
        &mut self.style
    }

    /// Called by bytecode execution (see [`crate::bytecode`]) whenever a
    /// declaration for `id` is applied, so `finish` won't later overwrite it
    /// with an inherited or initial value.
    pub fn mark_explicit(&mut self, id: PropertyId) {
        self.explicit.set(id);
    }

    pub fn is_explicit(&self, id: PropertyId) -> bool {
        self.explicit.get(id)
    }

    /// Called once `id` has been written by an `!important` declaration, so
    /// a later, lower-precedence, non-important declaration for the same
    /// property can be refused (spec §4.3/§4.4's `!important` precedence).
    pub fn mark_important(&mut self, id: PropertyId) {
        self.important.set(id);
    }

    pub fn is_important(&self, id: PropertyId) -> bool {
        self.important.get(id)
    }

    /// Applies inheritance for every property no declaration touched, then
    /// the display/position/float fixups, then absolute-length resolution.
    ///
    /// `is_root` marks `node` as the document root, which forces the same
    /// display block-ification as `position: absolute`/`fixed` and `float`
    /// (CSS2.1 §9.7); it's the caller's job to know this, since whether a
    /// parent style was supplied doesn't imply it (an embedder may omit a
    /// parent for other reasons).
    ///
    /// `resolve_font_size` lets the caller turn a possibly font-relative
    /// `font-size` length into an absolute pixel length (spec §4.4's
    /// `compute_font_size` handler callback); every other property's `em`/`ex`
    /// lengths are then resolved against the element's own resolved
    /// font-size.
    pub fn finish(
        mut self,
        parent: Option<&ComputedStyle>,
        is_root: bool,
        mut resolve_font_size: impl FnMut(Length, f32) -> f32,
    ) -> ComputedStyle {
        self.inherit_unset(parent);
        apply_fixups(&mut self.style, is_root);

        let parent_font_size_px = parent.map(|p| p.font_size.value()).unwrap_or(16.0);
        let font_size_px = resolve_font_size(self.style.font_size, parent_font_size_px);
        self.style.font_size = Length::new(font_size_px, Unit::Px);

        resolve_absolute_lengths(&mut self.style, font_size_px);
        self.style.compact_uncommon();
        self.style
    }

    fn inherit_unset(&mut self, parent: Option<&ComputedStyle>) {
        macro_rules! inherit {
            ($field:ident, $id:expr) => {
                if !self.explicit.get($id) {
                    if let Some(p) = parent {
                        self.style.$field = p.$field.clone();
                    }
                }
            };
        }

        inherit!(border_collapse, PropertyId::BorderCollapse);
        inherit!(caption_side, PropertyId::CaptionSide);
        inherit!(color, PropertyId::Color);
        inherit!(direction, PropertyId::Direction);
        inherit!(empty_cells, PropertyId::EmptyCells);
        inherit!(font_family, PropertyId::FontFamily);
        inherit!(font_size, PropertyId::FontSize);
        inherit!(font_style, PropertyId::FontStyle);
        inherit!(font_variant, PropertyId::FontVariant);
        inherit!(font_weight, PropertyId::FontWeight);
        inherit!(line_height, PropertyId::LineHeight);
        inherit!(list_style_image, PropertyId::ListStyleImage);
        inherit!(list_style_position, PropertyId::ListStylePosition);
        inherit!(list_style_type, PropertyId::ListStyleType);
        inherit!(quotes, PropertyId::Quotes);
        inherit!(text_align, PropertyId::TextAlign);
        inherit!(text_indent, PropertyId::TextIndent);
        inherit!(text_transform, PropertyId::TextTransform);
        inherit!(visibility, PropertyId::Visibility);
        inherit!(white_space, PropertyId::WhiteSpace);

        if !self.explicit.get(PropertyId::BorderSpacing) {
            if let Some(p) = parent {
                self.style.uncommon_mut().border_spacing = p.uncommon().border_spacing;
            }
        }
        if !self.explicit.get(PropertyId::LetterSpacing) {
            if let Some(p) = parent {
                self.style.uncommon_mut().letter_spacing = p.uncommon().letter_spacing;
            }
        }
        if !self.explicit.get(PropertyId::WordSpacing) {
            if let Some(p) = parent {
                self.style.uncommon_mut().word_spacing = p.uncommon().word_spacing;
            }
        }
        if !self.explicit.get(PropertyId::CounterIncrement) {
            if let Some(p) = parent {
                self.style.uncommon_mut().counter_increment = p.uncommon().counter_increment.clone();
            }
        }
        if !self.explicit.get(PropertyId::CounterReset) {
            if let Some(p) = parent {
                self.style.uncommon_mut().counter_reset = p.uncommon().counter_reset.clone();
            }
        }
        if !self.explicit.get(PropertyId::Content) {
            if let Some(p) = parent {
                self.style.uncommon_mut().content = p.uncommon().content.clone();
            }
        }
        if !self.explicit.get(PropertyId::Cursor) {
            if let Some(p) = parent {
                self.style.uncommon_mut().cursor = p.uncommon().cursor.clone();
            }
        }
    }
}

impl Default for StyleBuilder {
    fn default() -> Self {
        StyleBuilder::new()
    }
}

/// Display/position/float fixups (spec §4.1; CSS2.1 §9.7's "Relationships
/// between 'display', 'position', and 'float'"). Block-ification triggers
/// when the element is the document root, or `position` is absolute/fixed,
/// or `float` isn't `none`.
fn apply_fixups(style: &mut ComputedStyle, is_root: bool) {
    if style.display == Display::None_ {
        // A display:none subtree computes no other box properties, but
        // nothing else in this record depends on box generation, so no
        // further fixup is needed here (Open Question (a): display:none is
        // otherwise left unchanged, see SPEC_FULL.md §C).
        return;
    }

    if style.position == Position::Absolute || style.position == Position::Fixed {
        style.float = Float::None_;
        fixup_display_for_absolute(style);
    } else if style.float != Float::None_ {
        fixup_display_for_absolute(style);
    } else if is_root {
        fixup_display_for_absolute(style);
    }

    fixup_position_offsets(style);
}

fn fixup_display_for_absolute(style: &mut ComputedStyle) {
    style.display = match style.display {
        Display::InlineTable => Display::Table,
        Display::None_ => Display::None_,
        _ => Display::Block,
    };
}

/// CSS2.1 §9.4.3: for `position: relative`, if both `left` and `right` are
/// non-auto, `right` is ignored (its used value is `-left`'s, in the
/// direction-aware sense); this crate resolves the simpler case of "last
/// writer wins" that `libcss`'s own `css_computed_left`/`_right` resolve to
/// when direction isn't tracked at this layer. `position: static` elements
/// never position against offsets at all; libcss leaves the stored value
/// alone but callers must treat it as inert, which this crate encodes by
/// resetting it to `auto`.
fn fixup_position_offsets(style: &mut ComputedStyle) {
    if style.position == Position::Static {
        style.top = LengthOrAuto::Auto;
        style.right = LengthOrAuto::Auto;
        style.bottom = LengthOrAuto::Auto;
        style.left = LengthOrAuto::Auto;
        return;
    }

    if style.position == Position::Relative {
        if let (LengthOrAuto::Length(left), LengthOrAuto::Length(_)) = (style.left, style.right) {
            style.right = LengthOrAuto::Length(left.negate());
        }
        if let (LengthOrAuto::Length(top), LengthOrAuto::Length(_)) = (style.top, style.bottom) {
            style.bottom = LengthOrAuto::Length(top.negate());
        }
    }
}

/// Resolves every `em`/`ex` length against the element's own resolved
/// font-size, turning them into absolute pixel lengths. Percentages are left
/// alone: resolving them needs a containing-block dimension, which is a
/// layout concern this crate (per spec.md's Non-goals) does not have.
fn resolve_absolute_lengths(style: &mut ComputedStyle, font_size_px: f32) {
    let px = |l: Length| l.to_px(font_size_px, None);
    let px_auto = |l: LengthOrAuto| match l {
        LengthOrAuto::Auto => LengthOrAuto::Auto,
        LengthOrAuto::Length(len) if len.unit == Unit::Percent => LengthOrAuto::Length(len),
        LengthOrAuto::Length(len) => LengthOrAuto::Length(px(len)),
    };
    let px_none = |l: LengthOrNone| match l {
        LengthOrNone::None_ => LengthOrNone::None_,
        LengthOrNone::Length(len) if len.unit == Unit::Percent => LengthOrNone::Length(len),
        LengthOrNone::Length(len) => LengthOrNone::Length(px(len)),
    };

    style.top = px_auto(style.top);
    style.right = px_auto(style.right);
    style.bottom = px_auto(style.bottom);
    style.left = px_auto(style.left);
    style.width = px_auto(style.width);
    style.height = px_auto(style.height);
    style.margin_top = px_auto(style.margin_top);
    style.margin_right = px_auto(style.margin_right);
    style.margin_bottom = px_auto(style.margin_bottom);
    style.margin_left = px_auto(style.margin_left);
    style.max_width = px_none(style.max_width);
    style.max_height = px_none(style.max_height);
    style.min_width = px(style.min_width);
    style.min_height = px(style.min_height);
    style.padding_top = px(style.padding_top);
    style.padding_right = px(style.padding_right);
    style.padding_bottom = px(style.padding_bottom);
    style.padding_left = px(style.padding_left);
    style.text_indent = px(style.text_indent);

    if let LineHeight::Length(l) = style.line_height {
        style.line_height = LineHeight::Length(px(l));
    }
    if let VerticalAlign::Length(l) = style.vertical_align {
        style.vertical_align = VerticalAlign::Length(px(l));
    }

    if style.uncommon.is_some() {
        let u = style.uncommon_mut();
        if let crate::style::uncommon::LengthOrNormal::Length(l) = u.letter_spacing {
            u.letter_spacing = crate::style::uncommon::LengthOrNormal::Length(px(l));
        }
        if let crate::style::uncommon::LengthOrNormal::Length(l) = u.word_spacing {
            u.word_spacing = crate::style::uncommon::LengthOrNormal::Length(px(l));
        }
        u.border_spacing.horizontal = px(u.border_spacing.horizontal);
        u.border_spacing.vertical = px(u.border_spacing.vertical);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_style_matches_css21_defaults() {
        let s = ComputedStyle::initial();
        assert_eq!(s.display, Display::Inline);
        assert_eq!(s.position, Position::Static);
        assert_eq!(s.color, Color::BLACK);
        assert_eq!(s.background_color, Color::TRANSPARENT);
        assert_eq!(s.margin_top, LengthOrAuto::Length(Length::zero()));
    }

    #[test]
    fn unset_inheriting_property_pulls_from_parent() {
        let mut parent = ComputedStyle::initial();
        parent.color = Color::from_rgba(1, 2, 3, 255);

        let builder = StyleBuilder::new();
        let child = builder.finish(Some(&parent), false, |len, _| len.value());
        assert_eq!(child.color, parent.color);
    }

    #[test]
    fn unset_non_inheriting_property_stays_initial() {
        let mut parent = ComputedStyle::initial();
        parent.display = Display::Block;

        let builder = StyleBuilder::new();
        let child = builder.finish(Some(&parent), false, |len, _| len.value());
        assert_eq!(child.display, Display::Inline);
    }

    #[test]
    fn static_position_clears_offsets() {
        let mut builder = StyleBuilder::new();
        builder.style_mut().top = LengthOrAuto::Length(Length::new(10.0, Unit::Px));
        builder.mark_explicit(PropertyId::Top);
        let style = builder.finish(None, false, |len, _| len.value());
        assert_eq!(style.top, LengthOrAuto::Auto);
    }

    #[test]
    fn absolute_position_blockifies_inline() {
        let mut builder = StyleBuilder::new();
        builder.style_mut().position = Position::Absolute;
        builder.mark_explicit(PropertyId::Position);
        let style = builder.finish(None, false, |len, _| len.value());
        assert_eq!(style.display, Display::Block);
        assert_eq!(style.float, Float::None_);
    }

    #[test]
    fn root_element_blockifies_inline() {
        let builder = StyleBuilder::new();
        let style = builder.finish(None, true, |len, _| len.value());
        assert_eq!(style.display, Display::Block);
    }

    #[test]
    fn em_lengths_resolve_against_font_size() {
        let mut builder = StyleBuilder::new();
        builder.style_mut().font_size = Length::new(2.0, Unit::Em);
        builder.mark_explicit(PropertyId::FontSize);
        builder.style_mut().text_indent = Length::new(1.0, Unit::Em);
        builder.mark_explicit(PropertyId::TextIndent);

        let style = builder.finish(None, false, |len, parent_px| len.to_px(parent_px, None).value());
        assert!((style.font_size.value() - 32.0).abs() < 0.01);
        assert!((style.text_indent.value() - 32.0).abs() < 0.01);
    }

    #[test]
    fn display_none_is_left_otherwise_unchanged() {
        let mut builder = StyleBuilder::new();
        builder.style_mut().display = Display::None_;
        builder.mark_explicit(PropertyId::Display);
        builder.style_mut().position = Position::Absolute;
        builder.mark_explicit(PropertyId::Position);

        let style = builder.finish(None, false, |len, _| len.value());
        assert_eq!(style.display, Display::None_);
    }
}
