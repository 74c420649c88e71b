//! CSS length, angle, and time values (spec §3: "fixed-point length").
//!
//! Unlike the teacher's [`CssLength<N, V>`][len] — which is parameterized by
//! how a length should be normalized against an SVG viewport — this crate
//! has no viewport to normalize against. What spec.md needs instead is a
//! single fixed-point number paired with a unit tag wide enough to cover
//! not just lengths (`px`, `em`, `%`, ...) but the angle and time units that
//! the same bytecode operand shape is reused for (`deg`, `s`, `Hz`, ...).
//!
//! [len]: https://gitlab.gnome.org/GNOME/librsvg

use cssparser::{Parser, Token};

use crate::error::{CssError, ParseError};
use crate::parsers::Parse;

/// Unit tag for a [`Length`]. Stored alongside the numeric value in bytecode
/// operands as "the upper nibble of its bit-slice" per spec §4.1; here it is
/// simply a field of the decoded value.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Unit {
    Px,
    Em,
    Ex,
    Percent,
    Pt,
    Cm,
    Mm,
    In,
    Pc,
    Deg,
    Rad,
    Grad,
    Ms,
    S,
    Hz,
    Khz,
}

/// A 32-bit signed fixed-point number paired with a unit tag.
///
/// The source represents `css_fixed` as a true Q apart from this struct (an
/// integer scaled by 1<<10); we keep the same scaled-integer representation
/// so that arithmetic used during absolute-value resolution (e.g. resolving
/// `1.5em` against a `16px` font-size) is exact and doesn't drift the way
/// repeated `f32` multiplication would.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Length {
    /// Value scaled by `1 << FIXED_SHIFT`.
    scaled: i32,
    pub unit: Unit,
}

const FIXED_SHIFT: i32 = 10;

impl Length {
    pub fn new(value: f32, unit: Unit) -> Self {
        Length {
            scaled: (value * (1 << FIXED_SHIFT) as f32).round() as i32,
            unit,
        }
    }

    /// Zero-length values carry unit px by convention (spec §3).
    pub fn zero() -> Self {
        Length::new(0.0, Unit::Px)
    }

    pub fn value(&self) -> f32 {
        self.scaled as f32 / (1 << FIXED_SHIFT) as f32
    }

    pub fn negate(&self) -> Self {
        Length {
            scaled: -self.scaled,
            unit: self.unit,
        }
    }

    /// The raw scaled-integer representation, as bit-stored in a bytecode
    /// operand word (spec §4.3).
    pub fn scaled_bits(&self) -> u32 {
        self.scaled as u32
    }

    /// Reconstructs a `Length` from a bytecode operand word produced by
    /// [`Length::scaled_bits`].
    pub fn from_scaled_bits(bits: u32, unit: Unit) -> Self {
        Length { scaled: bits as i32, unit }
    }

    /// Resolves a relative length (`em`, `ex`, `%`) against a concrete
    /// font-size / percentage base, producing an absolute pixel length.
    /// Lengths already in an absolute unit (`px`, physical units) pass
    /// through resolved to pixels. Angle and time units are returned
    /// unchanged: they are not subject to font-relative resolution.
    pub fn to_px(&self, font_size_px: f32, percentage_base: Option<f32>) -> Length {
        let px = match self.unit {
            Unit::Px => self.value(),
            Unit::Em => self.value() * font_size_px,
            Unit::Ex => self.value() * font_size_px * 0.5,
            Unit::Percent => self.value() / 100.0 * percentage_base.unwrap_or(font_size_px),
            Unit::Pt => self.value() * 96.0 / 72.0,
            Unit::Pc => self.value() * 16.0,
            Unit::In => self.value() * 96.0,
            Unit::Cm => self.value() * 96.0 / 2.54,
            Unit::Mm => self.value() * 96.0 / 25.4,
            Unit::Deg | Unit::Rad | Unit::Grad | Unit::Ms | Unit::S | Unit::Hz | Unit::Khz => {
                return *self
            }
        };
        Length::new(px, Unit::Px)
    }
}

impl Parse for Length {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Length, ParseError<'i>> {
        let loc = parser.current_source_location();
        match *parser.next()? {
            Token::Dimension { value, ref unit, .. } => {
                let u = match_unit(unit).ok_or_else(|| {
                    loc.new_custom_error(CssError::parse_error("unknown unit"))
                })?;
                Ok(Length::new(value, u))
            }
            Token::Percentage { unit_value, .. } => {
                Ok(Length::new(unit_value * 100.0, Unit::Percent))
            }
            Token::Number { value, .. } if value == 0.0 => Ok(Length::zero()),
            ref t => Err(loc.new_unexpected_token_error(t.clone())),
        }
    }
}

fn match_unit(unit: &str) -> Option<Unit> {
    Some(match_ignore_ascii_case(unit)?)
}

fn match_ignore_ascii_case(unit: &str) -> Option<Unit> {
    let lower = unit.to_ascii_lowercase();
    Some(match lower.as_str() {
        "px" => Unit::Px,
        "em" => Unit::Em,
        "ex" => Unit::Ex,
        "pt" => Unit::Pt,
        "cm" => Unit::Cm,
        "mm" => Unit::Mm,
        "in" => Unit::In,
        "pc" => Unit::Pc,
        "deg" => Unit::Deg,
        "rad" => Unit::Rad,
        "grad" => Unit::Grad,
        "ms" => Unit::Ms,
        "s" => Unit::S,
        "hz" => Unit::Hz,
        "khz" => Unit::Khz,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssparser::ParserInput;

    fn parse_len(s: &str) -> Length {
        let mut input = ParserInput::new(s);
        let mut parser = Parser::new(&mut input);
        Length::parse(&mut parser).unwrap()
    }

    #[test]
    fn parses_px() {
        let l = parse_len("16px");
        assert_eq!(l.unit, Unit::Px);
        assert!((l.value() - 16.0).abs() < 0.01);
    }

    #[test]
    fn parses_percentage() {
        let l = parse_len("50%");
        assert_eq!(l.unit, Unit::Percent);
        assert!((l.value() - 50.0).abs() < 0.01);
    }

    #[test]
    fn zero_is_px() {
        let l = parse_len("0");
        assert_eq!(l.unit, Unit::Px);
        assert_eq!(l.value(), 0.0);
    }

    #[test]
    fn resolves_em_against_font_size() {
        let l = Length::new(1.5, Unit::Em);
        let resolved = l.to_px(16.0, None);
        assert_eq!(resolved.unit, Unit::Px);
        assert!((resolved.value() - 24.0).abs() < 0.01);
    }

    #[test]
    fn negate_flips_sign() {
        let l = Length::new(5.0, Unit::Px);
        assert_eq!(l.negate().value(), -5.0);
    }
}
