//! CSS color values (spec §3: "32-bit RRGGBBAA").

use cssparser::Parser;

use crate::error::{CssError, ParseError};
use crate::parsers::Parse;

/// A resolved 32-bit RGBA color, packed as RRGGBBAA.
///
/// We parse with `cssparser::Color` (which already understands named
/// colors, `#rgb`/`#rrggbbaa`, and `rgb()`/`hsl()` functions) the same way
/// the teacher's `src/color.rs` does, then repack into the RRGGBBAA layout
/// spec.md's bytecode operand expects instead of `cssparser`'s native
/// `RGBA` (which is RGBA but stored as separate `u8` fields, not a packed
/// word).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub fn from_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color(
            (u32::from(r) << 24) | (u32::from(g) << 16) | (u32::from(b) << 8) | u32::from(a),
        )
    }

    pub const BLACK: Color = Color(0x000000ff);
    pub const TRANSPARENT: Color = Color(0x00000000);

    pub fn r(&self) -> u8 {
        (self.0 >> 24) as u8
    }
    pub fn g(&self) -> u8 {
        (self.0 >> 16) as u8
    }
    pub fn b(&self) -> u8 {
        (self.0 >> 8) as u8
    }
    pub fn a(&self) -> u8 {
        self.0 as u8
    }
}

impl Parse for Color {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Color, ParseError<'i>> {
        let loc = parser.current_source_location();
        let c = cssparser::Color::parse(parser)
            .map_err(|_| loc.new_custom_error(CssError::parse_error("invalid color")))?;

        match c {
            cssparser::Color::RGBA(rgba) => {
                Ok(Color::from_rgba(rgba.red, rgba.green, rgba.blue, rgba.alpha))
            }
            cssparser::Color::CurrentColor => {
                Err(loc.new_custom_error(CssError::value_error(
                    "currentColor must be resolved by the caller, not Color::parse",
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssparser::ParserInput;

    fn parse_color(s: &str) -> Color {
        let mut input = ParserInput::new(s);
        let mut parser = Parser::new(&mut input);
        Color::parse(&mut parser).unwrap()
    }

    #[test]
    fn parses_named_color() {
        assert_eq!(parse_color("red"), Color::from_rgba(255, 0, 0, 255));
    }

    #[test]
    fn parses_hex() {
        assert_eq!(parse_color("#ff0000"), Color::from_rgba(255, 0, 0, 255));
    }

    #[test]
    fn packs_rrggbbaa() {
        let c = Color::from_rgba(0x11, 0x22, 0x33, 0x44);
        assert_eq!(c.0, 0x11223344);
        assert_eq!(c.r(), 0x11);
        assert_eq!(c.a(), 0x44);
    }
}
