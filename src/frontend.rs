//! The parser front-end: turning CSS source text into a [`Stylesheet`] (spec
//! §4, §4.5).
//!
//! Grounded on `examples/GNOME-librsvg/rsvg/src/css.rs`'s `DeclParser` /
//! `RuleParser` pair driving `cssparser::StyleSheetParser`: a dummy
//! declaration-only parser feeds `cssparser::RuleBodyParser` inside a
//! qualified rule's block, and a top-level rule parser implements
//! `QualifiedRuleParser`/`AtRuleParser` to drive the whole sheet. The one
//! deliberate departure from the teacher is selector parsing: the teacher
//! leans on `impl selectors::Parser for RuleParser` plus
//! `selectors::parser::SelectorList::parse`; this crate dropped the
//! `selectors` crate (see DESIGN.md), so selector lists are hand-parsed
//! straight off the `cssparser::Parser` token stream into this crate's own
//! `selector::Selector`/`Compound`/`Detail` types.

use cssparser::{
    AtRuleParser, CowRcStr, DeclarationParser, Parser, ParserInput, ParserState,
    QualifiedRuleParser, RuleBodyItemParser, RuleBodyParser, StyleSheetParser, Token,
};

use crate::atom::Atom;
use crate::bytecode::{StyleBlob, Value};
use crate::color::Color;
use crate::error::{CssError, ParseError};
use crate::length::Length;
use crate::media::MediaMask;
use crate::parsers::Parse;
use crate::rule::{Origin, Rule, RuleBody, Stylesheet};
use crate::selector::{Combinator, Compound, Detail, Selector};
use crate::style::compute::ColorOrCurrent;
use crate::style::properties::*;
use crate::style::uncommon::*;
use crate::style::PropertyId;

// ---------------------------------------------------------------------
// Selector-list parsing (hand-rolled, no `selectors` crate).
// ---------------------------------------------------------------------

/// Parses a comma-separated selector list, e.g. the prelude of
/// `foo, .bar > baz { ... }`.
pub fn parse_selector_list<'i, 't>(
    parser: &mut Parser<'i, 't>,
) -> Result<Vec<Selector>, ParseError<'i>> {
    let mut out = Vec::new();
    loop {
        out.push(parse_complex_selector(parser)?);
        if parser.try_parse(|p| p.expect_comma()).is_err() {
            break;
        }
    }
    Ok(out)
}

fn parse_complex_selector<'i, 't>(parser: &mut Parser<'i, 't>) -> Result<Selector, ParseError<'i>> {
    let first = parse_compound(parser)?;
    let mut compounds = vec![Compound { combinator: Combinator::None, details: first }];
    while let Some(combinator) = try_parse_combinator(parser) {
        let details = parse_compound(parser)?;
        compounds.push(Compound { combinator, details });
    }
    if compounds.iter().all(|c| c.details.is_empty()) {
        let loc = parser.current_source_location();
        return Err(loc.new_custom_error(CssError::parse_error("empty selector")));
    }
    Ok(Selector::new(compounds))
}

/// Looks ahead for an explicit `>`/`+` combinator, or an implicit descendant
/// combinator signaled only by whitespace between two compounds. Returns to
/// the pre-lookahead position before returning so the caller's next
/// `parse_compound` sees the right-hand compound's own leading tokens.
fn try_parse_combinator<'i, 't>(parser: &mut Parser<'i, 't>) -> Option<Combinator> {
    let start = parser.state();
    let mut saw_whitespace = false;
    loop {
        match parser.next_including_whitespace() {
            Ok(Token::WhiteSpace(_)) => saw_whitespace = true,
            Ok(Token::Delim('>')) => return Some(Combinator::Child),
            Ok(Token::Delim('+')) => return Some(Combinator::AdjacentSibling),
            _ => {
                parser.reset(&start);
                return if saw_whitespace { Some(Combinator::Descendant) } else { None };
            }
        }
    }
}

/// Parses one compound selector: an optional element name or `*`, followed
/// by any number of class/id/pseudo-class/pseudo-element/attribute details.
fn parse_compound<'i, 't>(parser: &mut Parser<'i, 't>) -> Result<Vec<Detail>, ParseError<'i>> {
    let mut details = Vec::new();

    let before_name = parser.state();
    match parser.next() {
        Ok(Token::Ident(name)) => details.push(Detail::Element(Atom::from_str(name.as_ref()))),
        Ok(Token::Delim('*')) => details.push(Detail::Universal),
        _ => parser.reset(&before_name),
    }

    loop {
        let before_detail = parser.state();
        match parser.next() {
            Ok(Token::Delim('.')) => {
                let class = parser.expect_ident()?.as_ref().to_owned();
                details.push(Detail::Class(Atom::from_str(&class)));
            }
            Ok(Token::IDHash(hash)) => {
                details.push(Detail::Id(Atom::from_str(hash.as_ref())));
            }
            Ok(Token::Colon) => {
                let is_pseudo_element = parser.try_parse(|p| p.expect_colon()).is_ok();
                if !is_pseudo_element {
                    if let Ok(func) =
                        parser.try_parse(|p| p.expect_function().map(|n| n.as_ref().to_owned()))
                    {
                        details.push(parse_functional_pseudo_class(parser, &func)?);
                        continue;
                    }
                }
                let name = parser.expect_ident()?.as_ref().to_owned();
                let lower = name.to_ascii_lowercase();
                if is_pseudo_element
                    || matches!(lower.as_str(), "before" | "after" | "first-line" | "first-letter")
                {
                    details.push(Detail::PseudoElement(Atom::from_str(&lower)));
                } else {
                    details.push(Detail::PseudoClass(Atom::from_str(&lower)));
                }
            }
            Ok(Token::SquareBracketBlock) => {
                let detail = parser.parse_nested_block(parse_attribute_selector)?;
                details.push(detail);
            }
            _ => {
                parser.reset(&before_detail);
                break;
            }
        }
    }

    Ok(details)
}

/// Parses a functional pseudo-class's parenthesized argument list.
/// Currently only `:lang(xx)` (spec §4.4's `node_is_lang`) carries meaning;
/// any other function is recognized syntactically (so a stylesheet using it
/// isn't rejected outright) but never matches anything.
fn parse_functional_pseudo_class<'i, 't>(
    parser: &mut Parser<'i, 't>,
    name: &str,
) -> Result<Detail, ParseError<'i>> {
    let lower = name.to_ascii_lowercase();
    parser.parse_nested_block(|p| {
        if lower == "lang" {
            let lang = p.expect_ident()?.as_ref().to_ascii_lowercase();
            Ok(Detail::PseudoClass(Atom::from_str(&format!("lang({})", lang))))
        } else {
            while p.next().is_ok() {}
            Ok(Detail::PseudoClass(Atom::from_str(&format!("{}()", lower))))
        }
    })
}

fn parse_attribute_selector<'i, 't>(parser: &mut Parser<'i, 't>) -> Result<Detail, ParseError<'i>> {
    let name = Atom::from_str(parser.expect_ident()?.as_ref());
    if parser.is_exhausted() {
        return Ok(Detail::AttributePresent(name));
    }
    let loc = parser.current_source_location();
    let op = parser.next()?.clone();
    let value = match parser.next()?.clone() {
        Token::QuotedString(s) => s.as_ref().to_owned(),
        Token::Ident(s) => s.as_ref().to_owned(),
        t => return Err(loc.new_unexpected_token_error(t)),
    };
    let value = Atom::from_str(&value);
    match op {
        Token::Delim('=') => Ok(Detail::AttributeEquals(name, value)),
        Token::IncludeMatch => Ok(Detail::AttributeIncludes(name, value)),
        Token::DashMatch => Ok(Detail::AttributeDashMatch(name, value)),
        t => Err(loc.new_unexpected_token_error(t)),
    }
}

// ---------------------------------------------------------------------
// Declaration-value dispatch: CSS identifier -> (PropertyId, bytecode Value).
// ---------------------------------------------------------------------

fn encode_keyword<'i, T>(input: &mut Parser<'i, '_>, all: &'static [T]) -> Result<Value, ParseError<'i>>
where
    T: Parse + Copy + PartialEq,
{
    let parsed = T::parse(input)?;
    let idx = all
        .iter()
        .position(|v| *v == parsed)
        .expect("a type's own ALL table must list every variant its Parse impl can produce");
    Ok(Value::Keyword(idx as u8))
}

fn encode_length_or_auto<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match LengthOrAuto::parse(input)? {
        LengthOrAuto::Auto => Value::Auto,
        LengthOrAuto::Length(l) => Value::Length(l),
    })
}

fn encode_length_or_none<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match LengthOrNone::parse(input)? {
        LengthOrNone::None_ => Value::None_,
        LengthOrNone::Length(l) => Value::Length(l),
    })
}

fn encode_length_or_normal<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match LengthOrNormal::parse(input)? {
        LengthOrNormal::Normal => Value::Normal,
        LengthOrNormal::Length(l) => Value::Length(l),
    })
}

fn encode_color<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(Value::Color(Color::parse(input)?))
}

fn encode_color_or_current<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match ColorOrCurrent::parse(input)? {
        ColorOrCurrent::CurrentColor => Value::CurrentColor,
        ColorOrCurrent::Color(c) => Value::Color(c),
    })
}

/// `thin`/`medium`/`thick` are encoded as keyword indices 0/1/2, which the
/// decoder in `crate::bytecode::decode_border_width` maps back the same way
/// (anything that isn't the length discriminant falls through to `Thick`).
fn encode_border_width<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match BorderWidth::parse(input)? {
        BorderWidth::Thin => Value::Keyword(0),
        BorderWidth::Medium => Value::Keyword(1),
        BorderWidth::Thick => Value::Keyword(2),
        BorderWidth::Length(l) => Value::Length(l),
    })
}

fn encode_z_index<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match ZIndex::parse(input)? {
        ZIndex::Auto => Value::Auto,
        ZIndex::Number(n) => Value::Integer(n),
    })
}

fn encode_line_height<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match LineHeight::parse(input)? {
        LineHeight::Normal => Value::Normal,
        LineHeight::Number(n) => Value::Number(n),
        LineHeight::Length(l) => Value::Length(l),
    })
}

fn encode_vertical_align<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match VerticalAlign::parse(input)? {
        VerticalAlign::Keyword(kw) => {
            let idx = VerticalAlignKeyword::ALL.iter().position(|v| *v == kw).unwrap();
            Value::Keyword(idx as u8)
        }
        VerticalAlign::Length(l) => Value::Length(l),
    })
}

fn encode_uri_or_none<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    if input.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
        return Ok(Value::None_);
    }
    let url = input.expect_url()?.as_ref().to_owned();
    Ok(Value::Uri(Atom::from_str(&url)))
}

/// `font-family`'s comma-separated list of `<family-name>`s, where each
/// entry is either a quoted string or a run of one or more idents joined by
/// single spaces (e.g. `Times New Roman`).
fn parse_font_family_list<'i, 't>(input: &mut Parser<'i, 't>) -> Result<Vec<Atom>, ParseError<'i>> {
    input.parse_comma_separated(|p| {
        if let Ok(s) = p.try_parse(|p| p.expect_string().map(|s| s.as_ref().to_owned())) {
            return Ok(Atom::from_str(&s));
        }
        let mut words = vec![p.expect_ident()?.as_ref().to_owned()];
        while let Ok(word) = p.try_parse(|p| p.expect_ident().map(|s| s.as_ref().to_owned())) {
            words.push(word);
        }
        Ok(Atom::from_str(&words.join(" ")))
    })
}

fn encode_quotes<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    if input.try_parse(|p| p.expect_ident_matching("none")).is_ok() {
        return Ok(Value::None_);
    }
    let mut flat = Vec::new();
    loop {
        let open = input.expect_string()?.as_ref().to_owned();
        let close = input.expect_string()?.as_ref().to_owned();
        flat.push(Atom::from_str(&open));
        flat.push(Atom::from_str(&close));
        if input.is_exhausted() {
            break;
        }
    }
    Ok(Value::AtomList(flat))
}

/// Packs the four `text-decoration` flags into the header word's value
/// discriminant itself (bit 0 underline, bit 1 overline, bit 2 line-through,
/// bit 3 blink); `crate::bytecode::apply_decoded` unpacks the same bits.
fn encode_text_decoration<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    let d = TextDecoration::parse(input)?;
    let bits = (d.underline as u8)
        | ((d.overline as u8) << 1)
        | ((d.line_through as u8) << 2)
        | ((d.blink as u8) << 3);
    Ok(Value::Keyword(bits))
}

fn encode_background_position<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    let p = BackgroundPosition::parse(input)?;
    Ok(Value::Pair(p.x, p.y))
}

fn encode_border_spacing<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    let s = BorderSpacing::parse(input)?;
    Ok(Value::SpacingPair(s.horizontal, s.vertical))
}

fn encode_outline_color<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    // `invert` has no color, so it rides on the `currentColor` discriminant
    // purely as an internal "no fixed color" marker; outline-color itself
    // has no currentColor keyword in CSS2.1.
    Ok(match OutlineColor::parse(input)? {
        OutlineColor::Invert => Value::CurrentColor,
        OutlineColor::Color(c) => Value::Color(c),
    })
}

fn encode_counters<'i>(
    input: &mut Parser<'i, '_>,
    parse: fn(&mut Parser<'i, '_>) -> Result<Counters, ParseError<'i>>,
) -> Result<Value, ParseError<'i>> {
    let counters = parse(input)?;
    if counters.0.is_empty() {
        Ok(Value::None_)
    } else {
        Ok(Value::CounterList(counters.0))
    }
}

fn cursor_keyword_str(k: CursorKeyword) -> &'static str {
    match k {
        CursorKeyword::Auto => "auto",
        CursorKeyword::Default => "default",
        CursorKeyword::Crosshair => "crosshair",
        CursorKeyword::Pointer => "pointer",
        CursorKeyword::Move => "move",
        CursorKeyword::Text => "text",
        CursorKeyword::Wait => "wait",
        CursorKeyword::Help => "help",
        CursorKeyword::Progress => "progress",
    }
}

fn encode_cursor<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    let c = Cursor::parse(input)?;
    let mut atoms = c.uris;
    atoms.push(Atom::from_str(cursor_keyword_str(c.keyword)));
    Ok(Value::AtomList(atoms))
}

fn encode_content<'i>(input: &mut Parser<'i, '_>) -> Result<Value, ParseError<'i>> {
    Ok(match Content::parse(input)? {
        Content::Normal => Value::Normal,
        Content::None_ => Value::None_,
        Content::Items(items) => Value::ContentList(items),
    })
}

/// Parses one declaration's value and dispatches it to the right
/// `(PropertyId, Value)` pair. Unknown property names are a parse error,
/// which the caller (inside `RuleBodyParser`) simply drops, per spec §4.5's
/// "unrecognized declarations do not abort the rest of the block."
fn parse_declaration_value<'i, 't>(
    name: &str,
    input: &mut Parser<'i, 't>,
) -> Result<(PropertyId, Value), ParseError<'i>> {
    use PropertyId::*;

    let lower = name.to_ascii_lowercase();
    let pair = match lower.as_str() {
        "display" => (Display, encode_keyword(input, self::Display::ALL)?),
        "position" => (Position, encode_keyword(input, self::Position::ALL)?),
        "float" => (Float, encode_keyword(input, self::Float::ALL)?),
        "clear" => (Clear, encode_keyword(input, self::Clear::ALL)?),
        "visibility" => (Visibility, encode_keyword(input, self::Visibility::ALL)?),
        "overflow" => (Overflow, encode_keyword(input, self::Overflow::ALL)?),
        "table-layout" => (TableLayout, encode_keyword(input, self::TableLayout::ALL)?),
        "caption-side" => (CaptionSide, encode_keyword(input, self::CaptionSide::ALL)?),
        "empty-cells" => (EmptyCells, encode_keyword(input, self::EmptyCells::ALL)?),
        "direction" => (Direction, encode_keyword(input, self::Direction::ALL)?),
        "unicode-bidi" => (UnicodeBidi, encode_keyword(input, self::UnicodeBidi::ALL)?),
        "border-collapse" => (BorderCollapse, encode_keyword(input, self::BorderCollapse::ALL)?),
        "white-space" => (WhiteSpace, encode_keyword(input, self::WhiteSpace::ALL)?),
        "text-align" => (TextAlign, encode_keyword(input, self::TextAlign::ALL)?),
        "text-transform" => (TextTransform, encode_keyword(input, self::TextTransform::ALL)?),
        "list-style-position" => (ListStylePosition, encode_keyword(input, self::ListStylePosition::ALL)?),
        "list-style-type" => (ListStyleType, encode_keyword(input, self::ListStyleType::ALL)?),
        "font-style" => (FontStyle, encode_keyword(input, self::FontStyle::ALL)?),
        "font-variant" => (FontVariant, encode_keyword(input, self::FontVariant::ALL)?),
        "background-attachment" => (BackgroundAttachment, encode_keyword(input, self::BackgroundAttachment::ALL)?),
        "background-repeat" => (BackgroundRepeat, encode_keyword(input, self::BackgroundRepeat::ALL)?),
        "border-top-style" => (BorderTopStyle, encode_keyword(input, BorderStyle::ALL)?),
        "border-right-style" => (BorderRightStyle, encode_keyword(input, BorderStyle::ALL)?),
        "border-bottom-style" => (BorderBottomStyle, encode_keyword(input, BorderStyle::ALL)?),
        "border-left-style" => (BorderLeftStyle, encode_keyword(input, BorderStyle::ALL)?),
        "outline-style" => (OutlineStyle, encode_keyword(input, BorderStyle::ALL)?),
        "font-weight" => (FontWeight, encode_keyword(input, self::FontWeight::ALL)?),

        "color" => (Color, encode_color(input)?),
        "background-color" => (BackgroundColor, encode_color(input)?),
        "border-top-color" => (BorderTopColor, encode_color_or_current(input)?),
        "border-right-color" => (BorderRightColor, encode_color_or_current(input)?),
        "border-bottom-color" => (BorderBottomColor, encode_color_or_current(input)?),
        "border-left-color" => (BorderLeftColor, encode_color_or_current(input)?),

        "border-top-width" => (BorderTopWidth, encode_border_width(input)?),
        "border-right-width" => (BorderRightWidth, encode_border_width(input)?),
        "border-bottom-width" => (BorderBottomWidth, encode_border_width(input)?),
        "border-left-width" => (BorderLeftWidth, encode_border_width(input)?),
        "outline-width" => (OutlineWidth, encode_border_width(input)?),

        "top" => (Top, encode_length_or_auto(input)?),
        "right" => (Right, encode_length_or_auto(input)?),
        "bottom" => (Bottom, encode_length_or_auto(input)?),
        "left" => (Left, encode_length_or_auto(input)?),
        "width" => (Width, encode_length_or_auto(input)?),
        "height" => (Height, encode_length_or_auto(input)?),
        "margin-top" => (MarginTop, encode_length_or_auto(input)?),
        "margin-right" => (MarginRight, encode_length_or_auto(input)?),
        "margin-bottom" => (MarginBottom, encode_length_or_auto(input)?),
        "margin-left" => (MarginLeft, encode_length_or_auto(input)?),

        "max-width" => (MaxWidth, encode_length_or_none(input)?),
        "max-height" => (MaxHeight, encode_length_or_none(input)?),
        "min-width" => (MinWidth, Value::Length(Length::parse(input)?)),
        "min-height" => (MinHeight, Value::Length(Length::parse(input)?)),
        "padding-top" => (PaddingTop, Value::Length(Length::parse(input)?)),
        "padding-right" => (PaddingRight, Value::Length(Length::parse(input)?)),
        "padding-bottom" => (PaddingBottom, Value::Length(Length::parse(input)?)),
        "padding-left" => (PaddingLeft, Value::Length(Length::parse(input)?)),
        "text-indent" => (TextIndent, Value::Length(Length::parse(input)?)),
        "font-size" => (FontSize, Value::Length(Length::parse(input)?)),

        "z-index" => (ZIndex, encode_z_index(input)?),
        "line-height" => (LineHeight, encode_line_height(input)?),
        "vertical-align" => (VerticalAlign, encode_vertical_align(input)?),

        "background-image" => (BackgroundImage, encode_uri_or_none(input)?),
        "list-style-image" => (ListStyleImage, encode_uri_or_none(input)?),
        "font-family" => (FontFamily, Value::AtomList(parse_font_family_list(input)?)),
        "quotes" => (Quotes, encode_quotes(input)?),
        "text-decoration" => (TextDecoration, encode_text_decoration(input)?),
        "background-position" => (BackgroundPosition, encode_background_position(input)?),

        "border-spacing" => (BorderSpacing, encode_border_spacing(input)?),
        "letter-spacing" => (LetterSpacing, encode_length_or_normal(input)?),
        "word-spacing" => (WordSpacing, encode_length_or_normal(input)?),
        "outline-color" => (OutlineColor, encode_outline_color(input)?),
        "clip" => (Clip, Value::ClipRect(ClipRect::parse(input)?)),
        "counter-increment" => (CounterIncrement, encode_counters(input, Counters::parse_increment)?),
        "counter-reset" => (CounterReset, encode_counters(input, Counters::parse_reset)?),
        "cursor" => (Cursor, encode_cursor(input)?),
        "content" => (Content, encode_content(input)?),

        _ => {
            let loc = input.current_source_location();
            return Err(loc.new_custom_error(CssError::parse_error("unsupported property")));
        }
    };
    Ok(pair)
}

// ---------------------------------------------------------------------
// `cssparser` glue: declarations, qualified rules, at-rules, the sheet.
// ---------------------------------------------------------------------

/// Dummy parser required by `cssparser::RuleBodyParser`; it only knows how
/// to parse declarations (`parse_qualified` is false, so nested rules
/// inside a `{ }` block are never attempted), matching the teacher's
/// `DeclParser`.
struct DeclParser;

impl<'i> DeclarationParser<'i> for DeclParser {
    type Declaration = (PropertyId, Value, bool);
    type Error = CssError;

    fn parse_value<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
        _declaration_start: &ParserState,
    ) -> Result<Self::Declaration, ParseError<'i>> {
        let (id, value) = parse_declaration_value(name.as_ref(), input)?;
        let important = input.try_parse(cssparser::parse_important).is_ok();
        Ok((id, value, important))
    }
}

impl<'i> AtRuleParser<'i> for DeclParser {
    type Prelude = ();
    type AtRule = (PropertyId, Value, bool);
    type Error = CssError;
}

impl<'i> QualifiedRuleParser<'i> for DeclParser {
    type Prelude = ();
    type QualifiedRule = (PropertyId, Value, bool);
    type Error = CssError;
}

impl<'i> RuleBodyItemParser<'i, (PropertyId, Value, bool), CssError> for DeclParser {
    fn parse_declarations(&self) -> bool {
        true
    }

    fn parse_qualified(&self) -> bool {
        false
    }
}

fn parse_declaration_block<'i, 't>(input: &mut Parser<'i, 't>) -> StyleBlob {
    let mut blob = StyleBlob::new();
    let mut decl_parser = DeclParser;
    for result in RuleBodyParser::<_, _, CssError>::new(input, &mut decl_parser) {
        if let Ok((id, value, important)) = result {
            blob.push(id, id.inherits_automatically(), important, &value);
        }
    }
    blob
}

fn parse_media_list<'i, 't>(input: &mut Parser<'i, 't>) -> Result<MediaMask, ParseError<'i>> {
    let types = input.parse_comma_separated(|p| {
        let loc = p.current_source_location();
        let ident = p.expect_ident()?.clone();
        MediaMask::from_ident(&ident)
            .ok_or_else(|| loc.new_custom_error(CssError::parse_error("unknown media type")))
    })?;
    Ok(types.into_iter().fold(MediaMask::NONE, MediaMask::union))
}

/// Where we are relative to the `@charset`/`@import` legality window (spec
/// §4.5): `@charset` is only legal as the very first rule, and `@import` is
/// only legal before any rule other than `@charset`/another `@import`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrontState {
    BeforeCharset,
    BeforeRules,
    HadRule,
}

enum AtPrelude {
    Charset(String),
    Import(String, MediaMask),
    Media(MediaMask),
    FontFace,
    Page(Option<String>),
    Unknown,
}

struct RuleParser {
    origin: Origin,
    state: FrontState,
    next_index: usize,
}

impl RuleParser {
    fn next_index(&mut self) -> usize {
        let i = self.next_index;
        self.next_index += 1;
        i
    }
}

impl<'i> AtRuleParser<'i> for RuleParser {
    type Prelude = AtPrelude;
    type AtRule = Rule;
    type Error = CssError;

    fn parse_prelude<'t>(
        &mut self,
        name: CowRcStr<'i>,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::Prelude, ParseError<'i>> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "charset" => {
                if self.state != FrontState::BeforeCharset {
                    return Err(input.new_custom_error(CssError::parse_error(
                        "@charset is only legal as the first rule",
                    )));
                }
                let label = input.expect_string()?.as_ref().to_owned();
                self.state = FrontState::BeforeRules;
                Ok(AtPrelude::Charset(label))
            }
            "import" => {
                if self.state == FrontState::HadRule {
                    return Err(input.new_custom_error(CssError::parse_error(
                        "@import must precede all rules but @charset",
                    )));
                }
                let url = input.expect_url_or_string()?.as_ref().to_owned();
                let media = if input.is_exhausted() { MediaMask::ALL } else { parse_media_list(input)? };
                self.state = FrontState::BeforeRules;
                Ok(AtPrelude::Import(url, media))
            }
            "media" => Ok(AtPrelude::Media(parse_media_list(input)?)),
            "font-face" => Ok(AtPrelude::FontFace),
            "page" => {
                let pseudo = if input.try_parse(|p| p.expect_colon()).is_ok() {
                    Some(input.expect_ident()?.as_ref().to_owned())
                } else {
                    None
                };
                Ok(AtPrelude::Page(pseudo))
            }
            _ => Ok(AtPrelude::Unknown),
        }
    }

    fn rule_without_block(&mut self, prelude: Self::Prelude, _start: &ParserState) -> Result<Self::AtRule, ()> {
        let body = match prelude {
            AtPrelude::Charset(label) => RuleBody::Charset(label),
            AtPrelude::Import(url, media) => RuleBody::Import { url, media },
            AtPrelude::Unknown => RuleBody::Unknown,
            AtPrelude::Media(_) | AtPrelude::FontFace | AtPrelude::Page(_) => return Err(()),
        };
        self.state = FrontState::HadRule;
        let index = self.next_index();
        Ok(Rule { body, origin: self.origin, index })
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::AtRule, ParseError<'i>> {
        self.state = FrontState::HadRule;
        let index = self.next_index();
        let body = match prelude {
            AtPrelude::Media(media) => {
                let rules = StyleSheetParser::new(input, self).filter_map(|r| r.ok()).collect();
                RuleBody::Media { media, rules }
            }
            AtPrelude::FontFace => RuleBody::FontFace(parse_declaration_block(input)),
            AtPrelude::Page(pseudo) => {
                RuleBody::Page { pseudo, declarations: parse_declaration_block(input) }
            }
            AtPrelude::Charset(_) | AtPrelude::Import(..) | AtPrelude::Unknown => RuleBody::Unknown,
        };
        Ok(Rule { body, origin: self.origin, index })
    }
}

impl<'i> QualifiedRuleParser<'i> for RuleParser {
    type Prelude = Vec<Selector>;
    type QualifiedRule = Rule;
    type Error = CssError;

    fn parse_prelude<'t>(&mut self, input: &mut Parser<'i, 't>) -> Result<Self::Prelude, ParseError<'i>> {
        parse_selector_list(input)
    }

    fn parse_block<'t>(
        &mut self,
        prelude: Self::Prelude,
        _start: &ParserState,
        input: &mut Parser<'i, 't>,
    ) -> Result<Self::QualifiedRule, ParseError<'i>> {
        self.state = FrontState::HadRule;
        let index = self.next_index();
        let declarations = parse_declaration_block(input);
        Ok(Rule {
            body: RuleBody::Style { selectors: prelude, declarations },
            origin: self.origin,
            index,
        })
    }
}

/// Parses a complete stylesheet from CSS source text (spec §4.2's top-level
/// entry point). Invalid rules are dropped rather than aborting the parse
/// (spec §4.5); `@import` targets are recorded as `RuleBody::Import` rules
/// for the caller to resolve and load (this crate has no filesystem or
/// network access of its own, see `crate::engine`).
pub fn parse_stylesheet(css: &str, origin: Origin) -> Stylesheet {
    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    let mut rule_parser = RuleParser { origin, state: FrontState::BeforeCharset, next_index: 0 };

    let mut sheet = Stylesheet::new(origin);
    for result in StyleSheetParser::new(&mut parser, &mut rule_parser) {
        if let Ok(rule) = result {
            sheet.push_rule(rule);
        }
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_simple_rule_and_applies_it() {
        let sheet = parse_stylesheet("p { color: red; display: block; }", Origin::Author);
        assert_eq!(sheet.rules.len(), 1);

        let handler = crate::handler::NullSelectionHandler;
        let ctx = crate::select::SelectionContext::new(&handler, vec![&sheet]);
        let style = ctx.select_style(&(), None, false);
        assert_eq!(style.color, Color::from_rgba(255, 0, 0, 255));
        assert_eq!(style.display, self::Display::Block);
    }

    #[test]
    fn compound_selector_with_class_and_id() {
        let selectors = {
            let mut input = ParserInput::new("div.warning#main");
            let mut parser = Parser::new(&mut input);
            parse_selector_list(&mut parser).unwrap()
        };
        assert_eq!(selectors.len(), 1);
        let details = &selectors[0].rightmost().details;
        assert!(details.contains(&Detail::Element(Atom::from_str("div"))));
        assert!(details.contains(&Detail::Class(Atom::from_str("warning"))));
        assert!(details.contains(&Detail::Id(Atom::from_str("main"))));
    }

    #[test]
    fn descendant_and_child_combinators() {
        let mut input = ParserInput::new("ul > li a");
        let mut parser = Parser::new(&mut input);
        let selectors = parse_selector_list(&mut parser).unwrap();
        let sel = &selectors[0];
        assert_eq!(sel.compounds.len(), 3);
        assert_eq!(sel.compounds[1].combinator, Combinator::Child);
        assert_eq!(sel.compounds[2].combinator, Combinator::Descendant);
    }

    #[test]
    fn charset_must_be_first_rule() {
        let sheet = parse_stylesheet("p {} @charset \"utf-8\";", Origin::Author);
        // The misplaced @charset is dropped; only the style rule survives.
        assert_eq!(sheet.rules.len(), 1);
    }

    #[test]
    fn media_block_nests_rules_under_its_mask() {
        let sheet = parse_stylesheet("@media print { p { color: black; } }", Origin::Author);
        assert_eq!(sheet.rules.len(), 1);
        match &sheet.rules[0].body {
            RuleBody::Media { media, rules } => {
                assert_eq!(*media, MediaMask::PRINT);
                assert_eq!(rules.len(), 1);
            }
            _ => panic!("expected a media rule"),
        }
    }

    #[test]
    fn unknown_property_is_dropped_not_fatal() {
        let sheet = parse_stylesheet("p { bogus-property: 1; color: blue; }", Origin::Author);
        let handler = crate::handler::NullSelectionHandler;
        let ctx = crate::select::SelectionContext::new(&handler, vec![&sheet]);
        let style = ctx.select_style(&(), None, false);
        assert_eq!(style.color, Color::from_rgba(0, 0, 255, 255));
    }
}
