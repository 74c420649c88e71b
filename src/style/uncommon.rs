//! The on-demand "uncommon" sub-record (spec §3/§9).
//!
//! Grounded on
//! `examples/original_source/libcss/include/libcss/computed.h`'s
//! `css_computed_uncommon` struct: ten properties rarely set in practice
//! (they have cheap, all-initial defaults) are split out of the main record
//! so that a [`crate::style::compute::ComputedStyle`] that never sets any of
//! them pays no allocation for them. `Uncommon` is stored behind an
//! `Option<Box<_>>` in `ComputedStyle` and only allocated the first time one
//! of its fields is set to a non-initial value.

use crate::atom::Atom;
use crate::color::Color;
use crate::error::ParseError;
use crate::length::{Length, Unit};
use crate::parsers::{parse_keyword, Parse};
use crate::style::properties::{BorderWidth, LengthOrAuto};

/// `clip: rect(<top>, <right>, <bottom>, <left>) | auto`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ClipRect {
    pub top: LengthOrAuto,
    pub right: LengthOrAuto,
    pub bottom: LengthOrAuto,
    pub left: LengthOrAuto,
}

impl Default for ClipRect {
    fn default() -> Self {
        ClipRect {
            top: LengthOrAuto::Auto,
            right: LengthOrAuto::Auto,
            bottom: LengthOrAuto::Auto,
            left: LengthOrAuto::Auto,
        }
    }
}

impl Parse for ClipRect {
    fn parse<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("auto")).is_ok() {
            return Ok(ClipRect::default());
        }
        parser.expect_function_matching("rect")?;
        parser.parse_nested_block(|p| {
            let top = LengthOrAuto::parse(p)?;
            p.expect_comma()?;
            let right = LengthOrAuto::parse(p)?;
            p.expect_comma()?;
            let bottom = LengthOrAuto::parse(p)?;
            p.expect_comma()?;
            let left = LengthOrAuto::parse(p)?;
            Ok(ClipRect { top, right, bottom, left })
        })
    }
}

/// `border-spacing: <length> <length>?`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BorderSpacing {
    pub horizontal: Length,
    pub vertical: Length,
}

impl Default for BorderSpacing {
    fn default() -> Self {
        BorderSpacing {
            horizontal: Length::zero(),
            vertical: Length::zero(),
        }
    }
}

impl Parse for BorderSpacing {
    fn parse<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        let horizontal = Length::parse(parser)?;
        let vertical = parser.try_parse(Length::parse).unwrap_or(horizontal);
        Ok(BorderSpacing { horizontal, vertical })
    }
}

/// `letter-spacing` / `word-spacing`: `normal | <length>`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LengthOrNormal {
    Normal,
    Length(Length),
}

impl Default for LengthOrNormal {
    fn default() -> Self {
        LengthOrNormal::Normal
    }
}

impl Parse for LengthOrNormal {
    fn parse<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("normal")).is_ok() {
            return Ok(LengthOrNormal::Normal);
        }
        Ok(LengthOrNormal::Length(Length::parse(parser)?))
    }
}

/// `outline-color: <color> | invert`. `invert` has no RGB equivalent (it asks
/// the renderer to XOR whatever is underneath), so it is kept as a distinct
/// variant rather than forced into [`Color`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum OutlineColor {
    Color(Color),
    Invert,
}

impl Default for OutlineColor {
    fn default() -> Self {
        OutlineColor::Invert
    }
}

impl Parse for OutlineColor {
    fn parse<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("invert")).is_ok() {
            return Ok(OutlineColor::Invert);
        }
        Ok(OutlineColor::Color(Color::parse(parser)?))
    }
}

/// One `(identifier, integer)` pair from `counter-increment`/`counter-reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterEntry {
    pub name: Atom,
    pub value: i32,
}

/// `counter-increment` / `counter-reset`: `none | [<identifier> <integer>?]+`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Counters(pub Vec<CounterEntry>);

impl Counters {
    fn parse_with_default(parser: &mut cssparser::Parser, default: i32) -> Result<Self, ParseError> {
        if parser.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
            return Ok(Counters::default());
        }
        let mut entries = Vec::new();
        loop {
            let name = Atom::from_str(parser.expect_ident()?.as_ref());
            let value = parser.try_parse(|p| p.expect_integer()).unwrap_or(default);
            entries.push(CounterEntry { name, value });
            if parser.is_exhausted() {
                break;
            }
        }
        Ok(Counters(entries))
    }

    pub fn parse_increment<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        Counters::parse_with_default(parser, 1)
    }

    pub fn parse_reset<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        Counters::parse_with_default(parser, 0)
    }
}

/// `cursor: [<uri> ,]* <keyword>`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CursorKeyword {
    Auto,
    Default,
    Crosshair,
    Pointer,
    Move,
    Text,
    Wait,
    Help,
    Progress,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cursor {
    pub uris: Vec<Atom>,
    pub keyword: CursorKeyword,
}

impl Default for Cursor {
    fn default() -> Self {
        Cursor { uris: Vec::new(), keyword: CursorKeyword::Auto }
    }
}

impl Parse for Cursor {
    fn parse<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        let mut uris = Vec::new();
        loop {
            if let Ok(url) = parser.try_parse(|p| p.expect_url().map(|u| u.as_ref().to_owned())) {
                uris.push(Atom::from_str(&url));
                parser.expect_comma()?;
            } else {
                break;
            }
        }
        let keyword = parse_keyword(
            parser,
            &[
                ("auto", CursorKeyword::Auto),
                ("default", CursorKeyword::Default),
                ("crosshair", CursorKeyword::Crosshair),
                ("pointer", CursorKeyword::Pointer),
                ("move", CursorKeyword::Move),
                ("text", CursorKeyword::Text),
                ("wait", CursorKeyword::Wait),
                ("help", CursorKeyword::Help),
                ("progress", CursorKeyword::Progress),
            ],
        )?;
        Ok(Cursor { uris, keyword })
    }
}

/// One item of a `content` value.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentItem {
    String(Atom),
    Uri(Atom),
    Attr(Atom),
    Counter(Atom, Option<Atom>),
    Counters(Atom, Atom, Option<Atom>),
    OpenQuote,
    CloseQuote,
    NoOpenQuote,
    NoCloseQuote,
}

/// `content: normal | none | [<string> | <uri> | <counter> | attr(...) |
/// open-quote | close-quote | no-open-quote | no-close-quote]+`.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    Normal,
    None_,
    Items(Vec<ContentItem>),
}

impl Default for Content {
    fn default() -> Self {
        Content::Normal
    }
}

impl Parse for Content {
    fn parse<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<Self, ParseError<'i>> {
        if parser.try_parse(|p| p.expect_ident_matching("normal")).is_ok() {
            return Ok(Content::Normal);
        }
        if parser.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
            return Ok(Content::None_);
        }
        let mut items = Vec::new();
        loop {
            items.push(parse_content_item(parser)?);
            if parser.is_exhausted() {
                break;
            }
        }
        Ok(Content::Items(items))
    }
}

fn parse_content_item<'i>(parser: &mut cssparser::Parser<'i, '_>) -> Result<ContentItem, ParseError<'i>> {
    let loc = parser.current_source_location();
    if let Ok(s) = parser.try_parse(|p| p.expect_string().map(|s| s.as_ref().to_owned())) {
        return Ok(ContentItem::String(Atom::from_str(&s)));
    }
    if let Ok(u) = parser.try_parse(|p| p.expect_url().map(|u| u.as_ref().to_owned())) {
        return Ok(ContentItem::Uri(Atom::from_str(&u)));
    }
    if parser.try_parse(|p| p.expect_ident_matching("open-quote")).is_ok() {
        return Ok(ContentItem::OpenQuote);
    }
    if parser.try_parse(|p| p.expect_ident_matching("close-quote")).is_ok() {
        return Ok(ContentItem::CloseQuote);
    }
    if parser.try_parse(|p| p.expect_ident_matching("no-open-quote")).is_ok() {
        return Ok(ContentItem::NoOpenQuote);
    }
    if parser.try_parse(|p| p.expect_ident_matching("no-close-quote")).is_ok() {
        return Ok(ContentItem::NoCloseQuote);
    }
    if let Ok(name) = parser.try_parse(|p| {
        p.expect_function_matching("attr")?;
        p.parse_nested_block(|p| Ok(p.expect_ident()?.as_ref().to_owned()))
    }) {
        return Ok(ContentItem::Attr(Atom::from_str(&name)));
    }
    if let Ok(item) = parser.try_parse(|p| {
        p.expect_function_matching("counter")?;
        p.parse_nested_block(|p| {
            let name = Atom::from_str(p.expect_ident()?.as_ref());
            let style = p
                .try_parse(|p| -> Result<_, ParseError> {
                    p.expect_comma()?;
                    Ok(Atom::from_str(p.expect_ident()?.as_ref()))
                })
                .ok();
            Ok(ContentItem::Counter(name, style))
        })
    }) {
        return Ok(item);
    }
    if let Ok(item) = parser.try_parse(|p| {
        p.expect_function_matching("counters")?;
        p.parse_nested_block(|p| {
            let name = Atom::from_str(p.expect_ident()?.as_ref());
            p.expect_comma()?;
            let sep = Atom::from_str(p.expect_string()?.as_ref());
            let style = p
                .try_parse(|p| -> Result<_, ParseError> {
                    p.expect_comma()?;
                    Ok(Atom::from_str(p.expect_ident()?.as_ref()))
                })
                .ok();
            Ok(ContentItem::Counters(name, sep, style))
        })
    }) {
        return Ok(item);
    }
    Err(loc.new_custom_error(crate::error::CssError::parse_error("invalid content item")))
}

/// The ten properties spec.md's "uncommon" record groups together; see the
/// module doc comment.
#[derive(Debug, Clone, PartialEq)]
pub struct Uncommon {
    pub border_spacing: BorderSpacing,
    pub clip: ClipRect,
    pub letter_spacing: LengthOrNormal,
    pub outline_color: OutlineColor,
    pub outline_width: BorderWidth,
    pub word_spacing: LengthOrNormal,
    pub counter_increment: Counters,
    pub counter_reset: Counters,
    pub cursor: Cursor,
    pub content: Content,
}

impl Default for Uncommon {
    fn default() -> Self {
        Uncommon {
            border_spacing: BorderSpacing::default(),
            clip: ClipRect::default(),
            letter_spacing: LengthOrNormal::default(),
            outline_color: OutlineColor::default(),
            outline_width: BorderWidth::default(),
            word_spacing: LengthOrNormal::default(),
            counter_increment: Counters::default(),
            counter_reset: Counters::default(),
            cursor: Cursor::default(),
            content: Content::default(),
        }
    }
}

impl Uncommon {
    /// True once every field is back to its initial value, the point at
    /// which `ComputedStyle` can drop its `Box<Uncommon>` again during
    /// composition from scratch (it never does so in place; this is used by
    /// `compute::initialise` to decide whether a freshly-composed style
    /// still needs the allocation at all).
    pub fn is_initial(&self) -> bool {
        *self == Uncommon::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Parse;

    #[test]
    fn clip_rect_auto() {
        assert_eq!(ClipRect::parse_str("auto").unwrap(), ClipRect::default());
    }

    #[test]
    fn clip_rect_function() {
        let c = ClipRect::parse_str("rect(1px, 2px, 3px, 4px)").unwrap();
        assert!(matches!(c.top, LengthOrAuto::Length(_)));
        assert!(matches!(c.left, LengthOrAuto::Length(_)));
    }

    #[test]
    fn border_spacing_defaults_vertical_to_horizontal() {
        let s = BorderSpacing::parse_str("2px").unwrap();
        assert_eq!(s.horizontal.value(), s.vertical.value());
    }

    #[test]
    fn counters_parse_defaults() {
        let c = Counters::parse_increment(&mut cssparser::Parser::new(&mut cssparser::ParserInput::new("chapter")))
            .unwrap();
        assert_eq!(c.0[0].value, 1);
    }

    #[test]
    fn content_parses_strings_and_counters() {
        let c = Content::parse_str("counter(chapter) \". \"").unwrap();
        match c {
            Content::Items(items) => {
                assert_eq!(items.len(), 2);
                assert!(matches!(items[0], ContentItem::Counter(_, None)));
                assert!(matches!(items[1], ContentItem::String(_)));
            }
            _ => panic!("expected items"),
        }
    }

    #[test]
    fn uncommon_default_is_initial() {
        assert!(Uncommon::default().is_initial());
    }
}
