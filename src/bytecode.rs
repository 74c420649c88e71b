//! The style bytecode: a linear instruction stream of declarations (spec
//! §3, §4.3).
//!
//! The `opcode | flags | value` word layout has no direct teacher file (no
//! bytecode header ships in the reference pack); it is derived from spec.md's
//! own description of the instruction format. The skip-length walk is
//! grounded on `examples/original_source/libcss/src/parse/important.c`'s
//! `make_style_important`, which walks a compiled declaration block word by
//! word, computing how many operand words to skip from the opcode/value
//! alone (never decoding the operand's actual meaning) so it can flip the
//! `!important` flag bit in place without understanding what each
//! declaration does.
//!
//! A [`StyleBlob`] is the result of compiling one declaration block (one
//! `{ ... }` rule body, spec §4.2). Variable-length data (URIs, lists, quote
//! pairs, counters, content items) is not inlined into the word stream;
//! instead each such declaration stores an index into one of the blob's side
//! pools. This keeps every instruction word fixed-size and `make_important`
//! a pure word-skipping loop, while still letting the bytecode carry
//! arbitrarily long lists.

use crate::atom::Atom;
use crate::color::Color;
use crate::length::{Length, Unit};
use crate::style::compute::{ColorOrCurrent, StyleBuilder};
use crate::style::properties::*;
use crate::style::uncommon::{ClipRect, ContentItem, Content, Counters, Cursor};
use crate::style::PropertyId;

const FLAG_IMPORTANT: u8 = 0b01;
const FLAG_INHERIT: u8 = 0b10;

/// Value-discriminant tags stored in the low byte of a declaration's header
/// word. Keyword-valued properties instead store the property's own keyword
/// index directly (0..DISC_AUTO), since there's no ambiguity: a given opcode
/// only ever pairs with one keyword table.
mod disc {
    pub const AUTO: u8 = 220;
    pub const NORMAL: u8 = 221;
    pub const NONE: u8 = 222;
    pub const CURRENT_COLOR: u8 = 223;
    pub const LENGTH: u8 = 224;
    pub const COLOR: u8 = 225;
    pub const INTEGER: u8 = 226;
    pub const NUMBER: u8 = 227;
    pub const URI: u8 = 228;
    pub const ATOM_LIST: u8 = 229;
    pub const COUNTER_LIST: u8 = 230;
    pub const CONTENT_LIST: u8 = 231;
    pub const CLIP_RECT: u8 = 232;
    pub const POSITION_PAIR: u8 = 233;
    pub const SPACING_PAIR: u8 = 234;
}

/// Number of `u32` operand words that follow a header word with the given
/// value discriminant. This is the single function `make_important` and the
/// decoder both call, so the two never disagree about how far to skip.
fn operand_word_count(value_disc: u8) -> usize {
    match value_disc {
        disc::AUTO | disc::NORMAL | disc::NONE | disc::CURRENT_COLOR => 0,
        disc::LENGTH => 2,
        disc::COLOR => 1,
        disc::INTEGER | disc::NUMBER => 1,
        disc::URI => 1,
        disc::ATOM_LIST | disc::COUNTER_LIST | disc::CONTENT_LIST | disc::SPACING_PAIR => 2,
        disc::CLIP_RECT => 8,
        disc::POSITION_PAIR => 4,
        // Anything below the reserved range is a keyword index: no operands.
        _ => 0,
    }
}

fn header_word(opcode: PropertyId, flags: u8, value_disc: u8) -> u32 {
    ((opcode as u16 as u32) << 16) | ((flags as u32) << 8) | value_disc as u32
}

fn decode_header(word: u32) -> (u16, u8, u8) {
    ((word >> 16) as u16, (word >> 8) as u8, word as u8)
}

/// A compiled declaration block: the word stream plus its side pools.
#[derive(Debug, Clone, Default)]
pub struct StyleBlob {
    words: Vec<u32>,
    atoms: Vec<Atom>,
    counters: Vec<(Atom, i32)>,
    content: Vec<ContentItem>,
}

impl StyleBlob {
    pub fn new() -> Self {
        StyleBlob::default()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    fn push_atoms(&mut self, atoms: impl IntoIterator<Item = Atom>) -> (u32, u32) {
        let start = self.atoms.len() as u32;
        self.atoms.extend(atoms);
        (start, self.atoms.len() as u32 - start)
    }

    /// Appends one declaration to the blob.
    pub fn push(&mut self, opcode: PropertyId, inherit: bool, important: bool, value: &Value) {
        let mut flags = 0u8;
        if inherit {
            flags |= FLAG_INHERIT;
        }
        if important {
            flags |= FLAG_IMPORTANT;
        }

        match value {
            Value::Keyword(idx) => {
                self.words.push(header_word(opcode, flags, *idx));
            }
            Value::Auto => self.words.push(header_word(opcode, flags, disc::AUTO)),
            Value::Normal => self.words.push(header_word(opcode, flags, disc::NORMAL)),
            Value::None_ => self.words.push(header_word(opcode, flags, disc::NONE)),
            Value::CurrentColor => {
                self.words.push(header_word(opcode, flags, disc::CURRENT_COLOR))
            }
            Value::Length(l) => {
                self.words.push(header_word(opcode, flags, disc::LENGTH));
                self.words.push(l.scaled_bits());
                self.words.push(l.unit as u32);
            }
            Value::Color(c) => {
                self.words.push(header_word(opcode, flags, disc::COLOR));
                self.words.push(c.0);
            }
            Value::Integer(i) => {
                self.words.push(header_word(opcode, flags, disc::INTEGER));
                self.words.push(*i as u32);
            }
            Value::Number(n) => {
                self.words.push(header_word(opcode, flags, disc::NUMBER));
                self.words.push(n.to_bits());
            }
            Value::Uri(atom) => {
                self.words.push(header_word(opcode, flags, disc::URI));
                let (start, _) = self.push_atoms([atom.clone()]);
                self.words.push(start);
            }
            Value::AtomList(list) => {
                self.words.push(header_word(opcode, flags, disc::ATOM_LIST));
                let (start, len) = self.push_atoms(list.iter().cloned());
                self.words.push(start);
                self.words.push(len);
            }
            Value::CounterList(entries) => {
                self.words.push(header_word(opcode, flags, disc::COUNTER_LIST));
                let start = self.counters.len() as u32;
                self.counters
                    .extend(entries.iter().map(|e| (e.name.clone(), e.value)));
                self.words.push(start);
                self.words.push(entries.len() as u32);
            }
            Value::ContentList(items) => {
                self.words.push(header_word(opcode, flags, disc::CONTENT_LIST));
                let start = self.content.len() as u32;
                self.content.extend(items.iter().cloned());
                self.words.push(start);
                self.words.push(items.len() as u32);
            }
            Value::ClipRect(r) => {
                self.words.push(header_word(opcode, flags, disc::CLIP_RECT));
                for side in [r.top, r.right, r.bottom, r.left] {
                    match side {
                        LengthOrAuto::Auto => {
                            self.words.push(u32::MAX);
                            self.words.push(0);
                        }
                        LengthOrAuto::Length(l) => {
                            self.words.push(l.scaled_bits());
                            self.words.push(l.unit as u32);
                        }
                    }
                }
            }
            Value::Pair(a, b) => {
                self.words.push(header_word(opcode, flags, disc::POSITION_PAIR));
                self.words.push(a.scaled_bits());
                self.words.push(a.unit as u32);
                self.words.push(b.scaled_bits());
                self.words.push(b.unit as u32);
            }
            Value::SpacingPair(a, b) => {
                self.words.push(header_word(opcode, flags, disc::SPACING_PAIR));
                self.words.push(a.scaled_bits());
                self.words.push(b.scaled_bits());
            }
        }
    }

    /// Counts declarations in the blob via the same skip-length walk as
    /// [`StyleBlob::make_important`], for the `size` query (spec §6).
    pub fn declaration_count(&self) -> usize {
        let mut i = 0;
        let mut count = 0;
        while i < self.words.len() {
            let (_, _, disc) = decode_header(self.words[i]);
            i += 1 + operand_word_count(disc);
            count += 1;
        }
        count
    }

    /// True if any declaration in the blob carries the `!important` flag,
    /// via the same skip-length walk. Used by the cascade (spec §4.4) as a
    /// rule-granularity approximation of importance when sorting candidate
    /// rules; `apply`/`apply_one` below still enforce importance per
    /// declaration when a blob mixes important and non-important entries.
    pub fn has_important(&self) -> bool {
        let mut i = 0;
        while i < self.words.len() {
            let (_, flags, disc) = decode_header(self.words[i]);
            if flags & FLAG_IMPORTANT != 0 {
                return true;
            }
            i += 1 + operand_word_count(disc);
        }
        false
    }

    /// Rewrites every declaration in the blob so its `!important` flag bit
    /// is set, without decoding any operand — the word-skipping walk this
    /// whole module exists to support.
    pub fn make_important(&mut self) {
        let mut i = 0;
        while i < self.words.len() {
            let (opcode, flags, disc) = decode_header(self.words[i]);
            self.words[i] = header_word_raw(opcode, flags | FLAG_IMPORTANT, disc);
            i += 1 + operand_word_count(disc);
        }
    }

    /// Executes every declaration in the blob against `builder`, marking
    /// each touched property explicit. Declarations are applied in stream
    /// order; the caller (spec §4.4's `select_style`) is responsible for
    /// ordering blobs by cascade precedence before calling this per blob.
    pub fn apply(&self, builder: &mut StyleBuilder) {
        let mut i = 0;
        while i < self.words.len() {
            let (opcode_raw, flags, disc) = decode_header(self.words[i]);
            let opcode = property_id_from_u16(opcode_raw);
            let operands = &self.words[i + 1..i + 1 + operand_word_count(disc)];
            self.apply_one(builder, opcode, flags, disc, operands);
            i += 1 + operand_word_count(disc);
        }
    }

    /// Writes one declaration's value, unless `opcode` was already set by an
    /// `!important` declaration earlier in application order and this one
    /// isn't important itself — CSS2.1 §6.4.1's "important declarations
    /// override any other declarations" holds per-property, not per-rule, so
    /// this check is what actually enforces it regardless of how precisely
    /// the caller sorted candidate rules.
    fn apply_one(
        &self,
        builder: &mut StyleBuilder,
        opcode: PropertyId,
        flags: u8,
        disc: u8,
        operands: &[u32],
    ) {
        let important = flags & FLAG_IMPORTANT != 0;
        if builder.is_important(opcode) && !important {
            return;
        }
        builder.mark_explicit(opcode);
        if important {
            builder.mark_important(opcode);
        }
        let style = builder.style_mut();
        apply_decoded(style, opcode, disc, operands, &self.atoms, &self.counters, &self.content);
    }
}

fn header_word_raw(opcode: u16, flags: u8, disc: u8) -> u32 {
    ((opcode as u32) << 16) | ((flags as u32) << 8) | disc as u32
}

fn property_id_from_u16(raw: u16) -> PropertyId {
    // Safety net for a malformed blob: PropertyId is `#[repr(u16)]` and this
    // module is the only place that ever constructs a header word, so any
    // value found here was produced by `header_word` above from a real
    // `PropertyId`.
    unsafe { std::mem::transmute(raw) }
}

fn decode_length(operands: &[u32]) -> Length {
    Length::from_scaled_bits(operands[0], unit_from_u32(operands[1]))
}

fn unit_from_u32(raw: u32) -> Unit {
    const UNITS: [Unit; 16] = [
        Unit::Px,
        Unit::Em,
        Unit::Ex,
        Unit::Percent,
        Unit::Pt,
        Unit::Cm,
        Unit::Mm,
        Unit::In,
        Unit::Pc,
        Unit::Deg,
        Unit::Rad,
        Unit::Grad,
        Unit::Ms,
        Unit::S,
        Unit::Hz,
        Unit::Khz,
    ];
    UNITS[raw as usize]
}

fn decode_length_or_auto(operands: &[u32]) -> LengthOrAuto {
    if operands[1] == u32::MAX {
        LengthOrAuto::Auto
    } else {
        LengthOrAuto::Length(decode_length(operands))
    }
}

/// Writes one decoded declaration's value into the right `ComputedStyle`
/// field. This is the dispatch table spec §4.3 describes as "a handler that
/// decodes operands and writes the result into the computed style being
/// composed."
fn apply_decoded(
    style: &mut crate::style::ComputedStyle,
    opcode: PropertyId,
    disc: u8,
    operands: &[u32],
    atoms: &[Atom],
    counters: &[(Atom, i32)],
    content: &[ContentItem],
) {
    use PropertyId::*;

    macro_rules! kw {
        ($ty:ty) => {{
            let variants: &[$ty] = <$ty>::ALL;
            variants[disc as usize]
        }};
    }

    match opcode {
        Display => style.display = kw!(self::Display),
        Position => style.position = kw!(self::Position),
        Float => style.float = kw!(self::Float),
        Clear => style.clear = kw!(self::Clear),
        Visibility => style.visibility = kw!(self::Visibility),
        Overflow => style.overflow = kw!(self::Overflow),
        TableLayout => style.table_layout = kw!(self::TableLayout),
        CaptionSide => style.caption_side = kw!(self::CaptionSide),
        EmptyCells => style.empty_cells = kw!(self::EmptyCells),
        Direction => style.direction = kw!(self::Direction),
        UnicodeBidi => style.unicode_bidi = kw!(self::UnicodeBidi),
        BorderCollapse => style.border_collapse = kw!(self::BorderCollapse),
        WhiteSpace => style.white_space = kw!(self::WhiteSpace),
        TextAlign => style.text_align = kw!(self::TextAlign),
        TextTransform => style.text_transform = kw!(self::TextTransform),
        ListStylePosition => style.list_style_position = kw!(self::ListStylePosition),
        ListStyleType => style.list_style_type = kw!(self::ListStyleType),
        FontStyle => style.font_style = kw!(self::FontStyle),
        FontVariant => style.font_variant = kw!(self::FontVariant),
        BackgroundAttachment => style.background_attachment = kw!(self::BackgroundAttachment),
        BackgroundRepeat => style.background_repeat = kw!(self::BackgroundRepeat),
        BorderTopStyle => style.border_top_style = kw!(BorderStyle),
        BorderRightStyle => style.border_right_style = kw!(BorderStyle),
        BorderBottomStyle => style.border_bottom_style = kw!(BorderStyle),
        BorderLeftStyle => style.border_left_style = kw!(BorderStyle),
        OutlineStyle => style.outline_style = kw!(BorderStyle),

        FontWeight => {
            const W: [self::FontWeight; 13] = [
                self::FontWeight::Normal,
                self::FontWeight::Bold,
                self::FontWeight::Bolder,
                self::FontWeight::Lighter,
                self::FontWeight::W100,
                self::FontWeight::W200,
                self::FontWeight::W300,
                self::FontWeight::W400,
                self::FontWeight::W500,
                self::FontWeight::W600,
                self::FontWeight::W700,
                self::FontWeight::W800,
                self::FontWeight::W900,
            ];
            style.font_weight = W[disc as usize];
        }

        Color => style.color = decode_color(disc, operands),
        BackgroundColor => style.background_color = decode_color(disc, operands),
        BorderTopColor => style.border_top_color = decode_color_or_current(disc, operands),
        BorderRightColor => style.border_right_color = decode_color_or_current(disc, operands),
        BorderBottomColor => style.border_bottom_color = decode_color_or_current(disc, operands),
        BorderLeftColor => style.border_left_color = decode_color_or_current(disc, operands),

        BorderTopWidth => style.border_top_width = decode_border_width(disc, operands),
        BorderRightWidth => style.border_right_width = decode_border_width(disc, operands),
        BorderBottomWidth => style.border_bottom_width = decode_border_width(disc, operands),
        BorderLeftWidth => style.border_left_width = decode_border_width(disc, operands),
        OutlineWidth => style.uncommon_mut().outline_width = decode_border_width(disc, operands),

        Top => style.top = decode_length_or_auto(operands),
        Right => style.right = decode_length_or_auto(operands),
        Bottom => style.bottom = decode_length_or_auto(operands),
        Left => style.left = decode_length_or_auto(operands),
        Width => style.width = decode_length_or_auto(operands),
        Height => style.height = decode_length_or_auto(operands),
        MarginTop => style.margin_top = decode_length_or_auto(operands),
        MarginRight => style.margin_right = decode_length_or_auto(operands),
        MarginBottom => style.margin_bottom = decode_length_or_auto(operands),
        MarginLeft => style.margin_left = decode_length_or_auto(operands),

        MaxWidth => {
            style.max_width = if disc == disc::NONE {
                LengthOrNone::None_
            } else {
                LengthOrNone::Length(decode_length(operands))
            }
        }
        MaxHeight => {
            style.max_height = if disc == disc::NONE {
                LengthOrNone::None_
            } else {
                LengthOrNone::Length(decode_length(operands))
            }
        }
        MinWidth => style.min_width = decode_length(operands),
        MinHeight => style.min_height = decode_length(operands),
        PaddingTop => style.padding_top = decode_length(operands),
        PaddingRight => style.padding_right = decode_length(operands),
        PaddingBottom => style.padding_bottom = decode_length(operands),
        PaddingLeft => style.padding_left = decode_length(operands),
        TextIndent => style.text_indent = decode_length(operands),
        FontSize => style.font_size = decode_length(operands),

        ZIndex => {
            style.z_index = if disc == disc::AUTO {
                self::ZIndex::Auto
            } else {
                self::ZIndex::Number(operands[0] as i32)
            }
        }

        LineHeight => {
            style.line_height = match disc {
                disc::NORMAL => self::LineHeight::Normal,
                disc::NUMBER => self::LineHeight::Number(f32::from_bits(operands[0])),
                _ => self::LineHeight::Length(decode_length(operands)),
            }
        }

        VerticalAlign => {
            const KW: [VerticalAlignKeyword; 8] = [
                VerticalAlignKeyword::Baseline,
                VerticalAlignKeyword::Sub,
                VerticalAlignKeyword::Super,
                VerticalAlignKeyword::Top,
                VerticalAlignKeyword::TextTop,
                VerticalAlignKeyword::Middle,
                VerticalAlignKeyword::Bottom,
                VerticalAlignKeyword::TextBottom,
            ];
            style.vertical_align = if disc == disc::LENGTH {
                VerticalAlign::Length(decode_length(operands))
            } else {
                VerticalAlign::Keyword(KW[disc as usize])
            };
        }

        BackgroundImage => style.background_image = decode_uri(disc, operands, atoms),
        ListStyleImage => style.list_style_image = decode_uri(disc, operands, atoms),

        FontFamily => style.font_family = decode_atom_list(disc, operands, atoms),

        Quotes => {
            if disc == disc::NONE {
                style.quotes = Vec::new();
            } else {
                let list = decode_atom_list(disc, operands, atoms);
                style.quotes = list.chunks(2).filter(|c| c.len() == 2).map(|c| (c[0].clone(), c[1].clone())).collect();
            }
        }

        TextDecoration => {
            style.text_decoration = self::TextDecoration {
                underline: disc & 0b0001 != 0,
                overline: disc & 0b0010 != 0,
                line_through: disc & 0b0100 != 0,
                blink: disc & 0b1000 != 0,
            };
        }

        BackgroundPosition => {
            style.background_position = self::BackgroundPosition {
                x: decode_length(&operands[0..2]),
                y: decode_length(&operands[2..4]),
            };
        }

        BorderSpacing => {
            let u = style.uncommon_mut();
            u.border_spacing.horizontal = Length::from_scaled_bits(operands[0], Unit::Px);
            u.border_spacing.vertical = Length::from_scaled_bits(operands[1], Unit::Px);
        }

        LetterSpacing => {
            style.uncommon_mut().letter_spacing = if disc == disc::NORMAL {
                crate::style::uncommon::LengthOrNormal::Normal
            } else {
                crate::style::uncommon::LengthOrNormal::Length(decode_length(operands))
            };
        }
        WordSpacing => {
            style.uncommon_mut().word_spacing = if disc == disc::NORMAL {
                crate::style::uncommon::LengthOrNormal::Normal
            } else {
                crate::style::uncommon::LengthOrNormal::Length(decode_length(operands))
            };
        }

        OutlineColor => {
            style.uncommon_mut().outline_color = if disc == disc::CURRENT_COLOR {
                crate::style::uncommon::OutlineColor::Invert
            } else {
                crate::style::uncommon::OutlineColor::Color(decode_color(disc, operands))
            };
        }

        Clip => {
            let u = style.uncommon_mut();
            u.clip = if disc == disc::AUTO {
                ClipRect::default()
            } else {
                ClipRect {
                    top: decode_length_or_auto(&operands[0..2]),
                    right: decode_length_or_auto(&operands[2..4]),
                    bottom: decode_length_or_auto(&operands[4..6]),
                    left: decode_length_or_auto(&operands[6..8]),
                }
            };
        }

        CounterIncrement => {
            style.uncommon_mut().counter_increment = decode_counters(disc, operands, counters);
        }
        CounterReset => {
            style.uncommon_mut().counter_reset = decode_counters(disc, operands, counters);
        }

        Cursor => {
            let u = style.uncommon_mut();
            let start = operands[0] as usize;
            let len = operands[1] as usize;
            if len == 0 {
                u.cursor = Cursor::default();
            } else {
                u.cursor = Cursor {
                    uris: atoms[start..start + len - 1].to_vec(),
                    keyword: cursor_keyword_from_atom(&atoms[start + len - 1]),
                };
            }
        }

        Content => {
            style.uncommon_mut().content = if disc == disc::NORMAL {
                Content::Normal
            } else if disc == disc::NONE {
                Content::None_
            } else {
                let start = operands[0] as usize;
                let len = operands[1] as usize;
                Content::Items(content[start..start + len].to_vec())
            };
        }
    }
}

fn decode_color(disc: u8, operands: &[u32]) -> Color {
    if disc == disc::COLOR {
        Color(operands[0])
    } else {
        Color::BLACK
    }
}

fn decode_color_or_current(disc: u8, operands: &[u32]) -> ColorOrCurrent {
    if disc == disc::CURRENT_COLOR {
        ColorOrCurrent::CurrentColor
    } else {
        ColorOrCurrent::Color(Color(operands[0]))
    }
}

fn decode_border_width(disc: u8, operands: &[u32]) -> BorderWidth {
    match disc {
        disc::LENGTH => BorderWidth::Length(decode_length(operands)),
        0 => BorderWidth::Thin,
        1 => BorderWidth::Medium,
        _ => BorderWidth::Thick,
    }
}

fn decode_uri(disc: u8, operands: &[u32], atoms: &[Atom]) -> Option<Atom> {
    if disc == disc::NONE {
        None
    } else {
        Some(atoms[operands[0] as usize].clone())
    }
}

fn decode_atom_list(disc: u8, operands: &[u32], atoms: &[Atom]) -> Vec<Atom> {
    if disc != disc::ATOM_LIST {
        return Vec::new();
    }
    let start = operands[0] as usize;
    let len = operands[1] as usize;
    atoms[start..start + len].to_vec()
}

/// `cursor`'s keyword travels through the bytecode as the last entry of its
/// atom list (there is no spare operand word for it; see
/// [`crate::frontend`]'s encoding side). This table must stay in sync with
/// the keyword spellings `Cursor::parse` accepts.
fn cursor_keyword_from_atom(atom: &Atom) -> crate::style::uncommon::CursorKeyword {
    use crate::style::uncommon::CursorKeyword::*;
    match atom.as_str() {
        "default" => Default,
        "crosshair" => Crosshair,
        "pointer" => Pointer,
        "move" => Move,
        "text" => Text,
        "wait" => Wait,
        "help" => Help,
        "progress" => Progress,
        _ => Auto,
    }
}

fn decode_counters(disc: u8, operands: &[u32], pool: &[(Atom, i32)]) -> Counters {
    if disc == disc::NONE {
        return Counters::default();
    }
    let start = operands[0] as usize;
    let len = operands[1] as usize;
    Counters(
        pool[start..start + len]
            .iter()
            .map(|(name, value)| crate::style::uncommon::CounterEntry {
                name: name.clone(),
                value: *value,
            })
            .collect(),
    )
}

/// The value side of a to-be-compiled declaration, produced by the parser
/// front-end (spec §4.2) before it is appended to a [`StyleBlob`].
#[derive(Debug, Clone)]
pub enum Value {
    Keyword(u8),
    Auto,
    Normal,
    None_,
    CurrentColor,
    Length(Length),
    Color(Color),
    Integer(i32),
    Number(f32),
    Uri(Atom),
    AtomList(Vec<Atom>),
    CounterList(Vec<crate::style::uncommon::CounterEntry>),
    ContentList(Vec<ContentItem>),
    ClipRect(ClipRect),
    /// Two lengths that travel together, e.g. `background-position`.
    Pair(Length, Length),
    /// Two plain px-space lengths, e.g. `border-spacing`.
    SpacingPair(Length, Length),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::compute::StyleBuilder;

    #[test]
    fn header_word_roundtrips() {
        let w = header_word(PropertyId::Display, FLAG_IMPORTANT, 3);
        let (opcode, flags, disc) = decode_header(w);
        assert_eq!(opcode, PropertyId::Display as u16);
        assert_eq!(flags, FLAG_IMPORTANT);
        assert_eq!(disc, 3);
    }

    #[test]
    fn make_important_sets_flag_without_changing_length() {
        let mut blob = StyleBlob::new();
        blob.push(PropertyId::Display, false, false, &Value::Keyword(1));
        blob.push(PropertyId::Color, false, false, &Value::Color(Color::BLACK));
        let before_len = blob.words.len();

        blob.make_important();

        assert_eq!(blob.words.len(), before_len);
        for &word in &blob.words[..1] {
            let (_, flags, _) = decode_header(word);
            assert_ne!(flags & FLAG_IMPORTANT, 0);
        }
    }

    #[test]
    fn apply_writes_keyword_into_style() {
        let mut blob = StyleBlob::new();
        let block_idx = self::Display::ALL.iter().position(|d| *d == self::Display::Block).unwrap();
        blob.push(PropertyId::Display, false, false, &Value::Keyword(block_idx as u8));

        let mut builder = StyleBuilder::new();
        blob.apply(&mut builder);
        assert!(builder.is_explicit(PropertyId::Display));
        assert_eq!(builder.style_mut().display, self::Display::Block);
    }

    #[test]
    fn apply_writes_length() {
        let mut blob = StyleBlob::new();
        blob.push(
            PropertyId::MarginTop,
            false,
            false,
            &Value::Length(Length::new(10.0, Unit::Px)),
        );
        let mut builder = StyleBuilder::new();
        blob.apply(&mut builder);
        assert_eq!(
            builder.style_mut().margin_top,
            LengthOrAuto::Length(Length::new(10.0, Unit::Px))
        );
    }
}
