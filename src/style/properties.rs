//! The main-record property catalog (spec §3/§9).
//!
//! Grounded on
//! `examples/original_source/libcss/include/libcss/computed.h`'s property
//! list (the "main" struct, as opposed to its "uncommon" sub-record which
//! lives in [`crate::style::uncommon`]). Each CSS keyword-only property is
//! generated with [`keyword_property!`], a small macro adapted from the
//! teacher's `make_property!` "identifiers" arm in `property_macros.rs`:
//! same idea (name, default, keyword table), simplified because this
//! crate's properties don't need the teacher's inheritance/compute
//! overrides baked into the macro — that logic lives uniformly in
//! `style::compute` instead, since spec.md makes inheritance a property
//! of the *catalog entry*, not of each value type.

use cssparser::{Parser, Token};

use crate::color::Color;
use crate::error::{CssError, ParseError};
use crate::length::{Length, Unit};
use crate::parsers::{parse_keyword, Parse};

/// Identifies one of the ~70 supported CSS properties. Used as the bytecode
/// opcode (spec §4.3) and as the key into the property catalog's
/// inheritance table.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum PropertyId {
    BackgroundAttachment,
    BackgroundColor,
    BackgroundImage,
    BackgroundPosition,
    BackgroundRepeat,
    BorderCollapse,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    BorderTopStyle,
    BorderRightStyle,
    BorderBottomStyle,
    BorderLeftStyle,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    CaptionSide,
    Clear,
    Color,
    Direction,
    Display,
    EmptyCells,
    Float,
    FontFamily,
    FontSize,
    FontStyle,
    FontVariant,
    FontWeight,
    Height,
    LineHeight,
    ListStyleImage,
    ListStylePosition,
    ListStyleType,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    MaxHeight,
    MaxWidth,
    MinHeight,
    MinWidth,
    Overflow,
    OutlineStyle,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    Position,
    Quotes,
    TableLayout,
    TextAlign,
    TextDecoration,
    TextIndent,
    TextTransform,
    Top,
    Right,
    Bottom,
    Left,
    UnicodeBidi,
    VerticalAlign,
    Visibility,
    WhiteSpace,
    Width,
    ZIndex,
    // Uncommon (see style::uncommon); listed here too since they still need
    // an opcode to appear in bytecode.
    BorderSpacing,
    Clip,
    LetterSpacing,
    OutlineColor,
    OutlineWidth,
    WordSpacing,
    CounterIncrement,
    CounterReset,
    Cursor,
    Content,
}

impl PropertyId {
    /// Whether the property's computed value inherits from parent to child
    /// elements by default (spec §4.1 `compose`). Grounded on CSS2.1's
    /// per-property "Inherited:" line, the same information the teacher's
    /// `Property::inherits_automatically()` encodes per type; here it's a
    /// single table since bytecode execution needs to look this up by
    /// opcode, not by Rust type.
    pub fn inherits_automatically(self) -> bool {
        use PropertyId::*;
        matches!(
            self,
            BorderCollapse
                | Color
                | CaptionSide
                | Cursor
                | Direction
                | EmptyCells
                | FontFamily
                | FontSize
                | FontStyle
                | FontVariant
                | FontWeight
                | LetterSpacing
                | LineHeight
                | ListStyleImage
                | ListStylePosition
                | ListStyleType
                | Quotes
                | TextAlign
                | TextIndent
                | TextTransform
                | Visibility
                | WhiteSpace
                | WordSpacing
                | BorderSpacing
                | CounterIncrement
                | CounterReset
                | Content
        )
    }

    /// Whether this property lives in the on-demand "uncommon" sub-record.
    pub fn is_uncommon(self) -> bool {
        use PropertyId::*;
        matches!(
            self,
            BorderSpacing
                | Clip
                | LetterSpacing
                | OutlineColor
                | OutlineWidth
                | WordSpacing
                | CounterIncrement
                | CounterReset
                | Cursor
                | Content
        )
    }
}

macro_rules! keyword_property {
    ($(#[$attr:meta])* $name:ident { default: $default:ident, $($kw:literal => $variant:ident),+ $(,)? }) => {
        $(#[$attr])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq)]
        pub enum $name { $($variant),+ }

        impl Default for $name {
            fn default() -> Self { $name::$default }
        }

        impl Parse for $name {
            fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
                parse_keyword(parser, &[$(($kw, $name::$variant)),+])
            }
        }

        impl $name {
            /// Every variant, in declaration order; the bytecode layer
            /// (`crate::bytecode`) uses the variant's position in this slice
            /// as its value discriminant, so order must stay stable once a
            /// stylesheet has been compiled against it.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }
    };
}

keyword_property!(Display {
    default: Inline,
    "none" => None_,
    "inline" => Inline,
    "block" => Block,
    "list-item" => ListItem,
    "inline-block" => InlineBlock,
    "table" => Table,
    "inline-table" => InlineTable,
    "table-row-group" => TableRowGroup,
    "table-header-group" => TableHeaderGroup,
    "table-footer-group" => TableFooterGroup,
    "table-row" => TableRow,
    "table-column-group" => TableColumnGroup,
    "table-column" => TableColumn,
    "table-cell" => TableCell,
    "table-caption" => TableCaption,
});

keyword_property!(Position {
    default: Static,
    "static" => Static,
    "relative" => Relative,
    "absolute" => Absolute,
    "fixed" => Fixed,
});

keyword_property!(Float {
    default: None_,
    "none" => None_,
    "left" => Left,
    "right" => Right,
});

keyword_property!(Clear {
    default: None_,
    "none" => None_,
    "left" => Left,
    "right" => Right,
    "both" => Both,
});

keyword_property!(Visibility {
    default: Visible,
    "visible" => Visible,
    "hidden" => Hidden,
    "collapse" => Collapse,
});

keyword_property!(Overflow {
    default: Visible,
    "visible" => Visible,
    "hidden" => Hidden,
    "scroll" => Scroll,
    "auto" => Auto,
});

keyword_property!(TableLayout {
    default: Auto,
    "auto" => Auto,
    "fixed" => Fixed,
});

keyword_property!(CaptionSide {
    default: Top,
    "top" => Top,
    "bottom" => Bottom,
});

keyword_property!(EmptyCells {
    default: Show,
    "show" => Show,
    "hide" => Hide,
});

keyword_property!(Direction {
    default: Ltr,
    "ltr" => Ltr,
    "rtl" => Rtl,
});

keyword_property!(UnicodeBidi {
    default: Normal,
    "normal" => Normal,
    "embed" => Embed,
    "bidi-override" => BidiOverride,
});

keyword_property!(BorderCollapse {
    default: Separate,
    "separate" => Separate,
    "collapse" => Collapse,
});

keyword_property!(WhiteSpace {
    default: Normal,
    "normal" => Normal,
    "pre" => Pre,
    "nowrap" => Nowrap,
    "pre-wrap" => PreWrap,
    "pre-line" => PreLine,
});

keyword_property!(TextAlign {
    default: Left,
    "left" => Left,
    "right" => Right,
    "center" => Center,
    "justify" => Justify,
});

keyword_property!(TextTransform {
    default: None_,
    "none" => None_,
    "capitalize" => Capitalize,
    "uppercase" => Uppercase,
    "lowercase" => Lowercase,
});

keyword_property!(BorderStyle {
    default: None_,
    "none" => None_,
    "hidden" => Hidden,
    "dotted" => Dotted,
    "dashed" => Dashed,
    "solid" => Solid,
    "double" => Double,
    "groove" => Groove,
    "ridge" => Ridge,
    "inset" => Inset,
    "outset" => Outset,
});

keyword_property!(ListStylePosition {
    default: Outside,
    "inside" => Inside,
    "outside" => Outside,
});

keyword_property!(ListStyleType {
    default: Disc,
    "disc" => Disc,
    "circle" => Circle,
    "square" => Square,
    "decimal" => Decimal,
    "decimal-leading-zero" => DecimalLeadingZero,
    "lower-roman" => LowerRoman,
    "upper-roman" => UpperRoman,
    "lower-greek" => LowerGreek,
    "lower-alpha" => LowerAlpha,
    "lower-latin" => LowerLatin,
    "upper-alpha" => UpperAlpha,
    "upper-latin" => UpperLatin,
    "armenian" => Armenian,
    "georgian" => Georgian,
    "none" => None_,
});

keyword_property!(FontStyle {
    default: Normal,
    "normal" => Normal,
    "italic" => Italic,
    "oblique" => Oblique,
});

keyword_property!(FontVariant {
    default: Normal,
    "normal" => Normal,
    "small-caps" => SmallCaps,
});

keyword_property!(BackgroundAttachment {
    default: Scroll,
    "scroll" => Scroll,
    "fixed" => Fixed,
});

keyword_property!(BackgroundRepeat {
    default: Repeat,
    "repeat" => Repeat,
    "repeat-x" => RepeatX,
    "repeat-y" => RepeatY,
    "no-repeat" => NoRepeat,
});

/// `font-weight`: keywords plus the CSS2.1 numeric scale. Not generated by
/// `keyword_property!` because `bolder`/`lighter` are relative to the
/// parent's computed weight, which the macro's simple keyword table can't
/// express; see `style::compute` for how those two are resolved.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
    Bolder,
    Lighter,
    W100,
    W200,
    W300,
    W400,
    W500,
    W600,
    W700,
    W800,
    W900,
}

impl FontWeight {
    /// Matches the decode table in `crate::bytecode`; keep both in sync.
    pub const ALL: &'static [FontWeight] = &[
        FontWeight::Normal,
        FontWeight::Bold,
        FontWeight::Bolder,
        FontWeight::Lighter,
        FontWeight::W100,
        FontWeight::W200,
        FontWeight::W300,
        FontWeight::W400,
        FontWeight::W500,
        FontWeight::W600,
        FontWeight::W700,
        FontWeight::W800,
        FontWeight::W900,
    ];
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::Normal
    }
}

impl Parse for FontWeight {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        let loc = parser.current_source_location();
        if let Ok(n) = parser.try_parse(|p| p.expect_integer()) {
            return Ok(match n {
                100 => FontWeight::W100,
                200 => FontWeight::W200,
                300 => FontWeight::W300,
                400 => FontWeight::W400,
                500 => FontWeight::W500,
                600 => FontWeight::W600,
                700 => FontWeight::W700,
                800 => FontWeight::W800,
                900 => FontWeight::W900,
                _ => {
                    return Err(loc.new_custom_error(CssError::value_error(
                        "font-weight integer must be a multiple of 100 between 100 and 900",
                    )))
                }
            });
        }
        parse_keyword(
            parser,
            &[
                ("normal", FontWeight::Normal),
                ("bold", FontWeight::Bold),
                ("bolder", FontWeight::Bolder),
                ("lighter", FontWeight::Lighter),
            ],
        )
    }
}

/// `<length>` or `auto`, used by `top`/`right`/`bottom`/`left`,
/// `width`/`height`, and the margin shorthand longhands.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LengthOrAuto {
    Auto,
    Length(Length),
}

impl Default for LengthOrAuto {
    fn default() -> Self {
        LengthOrAuto::Auto
    }
}

impl Parse for LengthOrAuto {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("auto")).is_ok() {
            return Ok(LengthOrAuto::Auto);
        }
        Ok(LengthOrAuto::Length(Length::parse(parser)?))
    }
}

/// `<length>` or `none`, used by `max-width`/`max-height`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LengthOrNone {
    None_,
    Length(Length),
}

impl Default for LengthOrNone {
    fn default() -> Self {
        LengthOrNone::None_
    }
}

impl Parse for LengthOrNone {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
            return Ok(LengthOrNone::None_);
        }
        Ok(LengthOrNone::Length(Length::parse(parser)?))
    }
}

/// `thin | medium | thick | <length>`, used by border widths and
/// `outline-width`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BorderWidth {
    Thin,
    Medium,
    Thick,
    Length(Length),
}

impl BorderWidth {
    pub fn to_length(self) -> Length {
        match self {
            BorderWidth::Thin => Length::new(1.0, Unit::Px),
            BorderWidth::Medium => Length::new(3.0, Unit::Px),
            BorderWidth::Thick => Length::new(5.0, Unit::Px),
            BorderWidth::Length(l) => l,
        }
    }
}

impl Default for BorderWidth {
    fn default() -> Self {
        BorderWidth::Medium
    }
}

impl Parse for BorderWidth {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if let Ok(v) = parser.try_parse(|p| {
            parse_keyword(
                p,
                &[
                    ("thin", BorderWidth::Thin),
                    ("medium", BorderWidth::Medium),
                    ("thick", BorderWidth::Thick),
                ],
            )
        }) {
            return Ok(v);
        }
        Ok(BorderWidth::Length(Length::parse(parser)?))
    }
}

/// `normal | <number> | <length>`, for `line-height`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LineHeight {
    Normal,
    Number(f32),
    Length(Length),
}

impl Default for LineHeight {
    fn default() -> Self {
        LineHeight::Normal
    }
}

impl Parse for LineHeight {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("normal")).is_ok() {
            return Ok(LineHeight::Normal);
        }
        if let Ok(n) = parser.try_parse(|p| p.expect_number()) {
            return Ok(LineHeight::Number(n));
        }
        Ok(LineHeight::Length(Length::parse(parser)?))
    }
}

/// `auto | <integer>`, for `z-index`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ZIndex {
    Auto,
    Number(i32),
}

impl Default for ZIndex {
    fn default() -> Self {
        ZIndex::Auto
    }
}

impl Parse for ZIndex {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("auto")).is_ok() {
            return Ok(ZIndex::Auto);
        }
        Ok(ZIndex::Number(parser.expect_integer()?))
    }
}

/// Keyword half of `vertical-align`; the property as a whole is
/// `<keyword> | <percentage> | <length>`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VerticalAlignKeyword {
    Baseline,
    Sub,
    Super,
    Top,
    TextTop,
    Middle,
    Bottom,
    TextBottom,
}

impl VerticalAlignKeyword {
    /// Matches the decode table in `crate::bytecode`; keep both in sync.
    pub const ALL: &'static [VerticalAlignKeyword] = &[
        VerticalAlignKeyword::Baseline,
        VerticalAlignKeyword::Sub,
        VerticalAlignKeyword::Super,
        VerticalAlignKeyword::Top,
        VerticalAlignKeyword::TextTop,
        VerticalAlignKeyword::Middle,
        VerticalAlignKeyword::Bottom,
        VerticalAlignKeyword::TextBottom,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum VerticalAlign {
    Keyword(VerticalAlignKeyword),
    Length(Length),
}

impl Default for VerticalAlign {
    fn default() -> Self {
        VerticalAlign::Keyword(VerticalAlignKeyword::Baseline)
    }
}

impl Parse for VerticalAlign {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if let Ok(kw) = parser.try_parse(|p| {
            parse_keyword(
                p,
                &[
                    ("baseline", VerticalAlignKeyword::Baseline),
                    ("sub", VerticalAlignKeyword::Sub),
                    ("super", VerticalAlignKeyword::Super),
                    ("top", VerticalAlignKeyword::Top),
                    ("text-top", VerticalAlignKeyword::TextTop),
                    ("middle", VerticalAlignKeyword::Middle),
                    ("bottom", VerticalAlignKeyword::Bottom),
                    ("text-bottom", VerticalAlignKeyword::TextBottom),
                ],
            )
        }) {
            return Ok(VerticalAlign::Keyword(kw));
        }
        Ok(VerticalAlign::Length(Length::parse(parser)?))
    }
}

/// `text-decoration`: a keyword set (`underline || overline ||
/// line-through || blink`) or `none`.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct TextDecoration {
    pub underline: bool,
    pub overline: bool,
    pub line_through: bool,
    pub blink: bool,
}

impl Parse for TextDecoration {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
            return Ok(TextDecoration::default());
        }
        let mut result = TextDecoration::default();
        loop {
            let loc = parser.current_source_location();
            let ident = match parser.try_parse(|p| p.expect_ident().map(|s| s.clone())) {
                Ok(i) => i,
                Err(_) => break,
            };
            match_ignore_ascii_case(&ident, &mut result, loc)?;
            if parser.is_exhausted() {
                break;
            }
        }
        Ok(result)
    }
}

fn match_ignore_ascii_case<'i>(
    ident: &str,
    result: &mut TextDecoration,
    loc: cssparser::SourceLocation,
) -> Result<(), ParseError<'i>> {
    if ident.eq_ignore_ascii_case("underline") {
        result.underline = true;
    } else if ident.eq_ignore_ascii_case("overline") {
        result.overline = true;
    } else if ident.eq_ignore_ascii_case("line-through") {
        result.line_through = true;
    } else if ident.eq_ignore_ascii_case("blink") {
        result.blink = true;
    } else {
        return Err(loc.new_custom_error(CssError::parse_error("unknown text-decoration keyword")));
    }
    Ok(())
}

/// `background-position`: a pair of lengths/percentages, resolved from
/// either the two-length form or the keyword form (`top left`, `center`,
/// ...).
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BackgroundPosition {
    pub x: Length,
    pub y: Length,
}

impl Default for BackgroundPosition {
    fn default() -> Self {
        BackgroundPosition {
            x: Length::new(0.0, Unit::Percent),
            y: Length::new(0.0, Unit::Percent),
        }
    }
}

impl Parse for BackgroundPosition {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        let x = parse_position_component(parser, true)?;
        let y = if parser.is_exhausted() {
            Length::new(50.0, Unit::Percent)
        } else {
            parse_position_component(parser, false)?
        };
        Ok(BackgroundPosition { x, y })
    }
}

fn parse_position_component<'i>(
    parser: &mut Parser<'i, '_>,
    horizontal: bool,
) -> Result<Length, ParseError<'i>> {
    let loc = parser.current_source_location();
    if let Ok(l) = parser.try_parse(Length::parse) {
        return Ok(l);
    }
    match *parser.next()? {
        Token::Ident(ref ident) => {
            let pct = if ident.eq_ignore_ascii_case("center") {
                50.0
            } else if horizontal && ident.eq_ignore_ascii_case("left") {
                0.0
            } else if horizontal && ident.eq_ignore_ascii_case("right") {
                100.0
            } else if !horizontal && ident.eq_ignore_ascii_case("top") {
                0.0
            } else if !horizontal && ident.eq_ignore_ascii_case("bottom") {
                100.0
            } else {
                return Err(loc.new_custom_error(CssError::parse_error(
                    "unknown background-position keyword",
                )));
            };
            Ok(Length::new(pct, Unit::Percent))
        }
        ref t => Err(loc.new_unexpected_token_error(t.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Parse;

    #[test]
    fn display_parses_keywords() {
        assert_eq!(Display::parse_str("block").unwrap(), Display::Block);
        assert_eq!(Display::parse_str("INLINE-BLOCK").unwrap(), Display::InlineBlock);
        assert!(Display::parse_str("bogus").is_err());
    }

    #[test]
    fn font_weight_parses_numbers_and_keywords() {
        assert_eq!(FontWeight::parse_str("700").unwrap(), FontWeight::W700);
        assert_eq!(FontWeight::parse_str("bold").unwrap(), FontWeight::Bold);
        assert!(FontWeight::parse_str("150").is_err());
    }

    #[test]
    fn length_or_auto() {
        assert_eq!(LengthOrAuto::parse_str("auto").unwrap(), LengthOrAuto::Auto);
        assert!(matches!(
            LengthOrAuto::parse_str("10px").unwrap(),
            LengthOrAuto::Length(_)
        ));
    }

    #[test]
    fn text_decoration_combines_flags() {
        let d = TextDecoration::parse_str("underline overline").unwrap();
        assert!(d.underline);
        assert!(d.overline);
        assert!(!d.line_through);
    }

    #[test]
    fn inherits_automatically_table() {
        assert!(PropertyId::Color.inherits_automatically());
        assert!(!PropertyId::Display.inherits_automatically());
        assert!(PropertyId::FontSize.inherits_automatically());
    }
}
