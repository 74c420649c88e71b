//! The `Parse` trait and small parsing utilities shared by value types.
//!
//! Grounded on the teacher's `src/parsers.rs`: every value type that can
//! appear on the right-hand side of a declaration implements [`Parse`], and
//! `parse_str` is a convenience used by tests and by callers that already
//! have an owned string (for example, an inline `style="..."` attribute).

use cssparser::{Parser, ParserInput};

use crate::error::ParseError;

pub trait Parse: Sized {
    fn parse<'i>(parser: &mut Parser<'i, '_>) -> Result<Self, ParseError<'i>>;

    fn parse_str(s: &str) -> Result<Self, ParseError<'_>> {
        let mut input = ParserInput::new(s);
        let mut parser = Parser::new(&mut input);
        let res = Self::parse(&mut parser)?;
        parser.expect_exhausted()?;
        Ok(res)
    }
}

/// Parses one of a fixed set of case-insensitive identifiers into an
/// arbitrary target, returning a custom parse error naming none of them
/// matched. This is the non-macro equivalent of the teacher's
/// `parse_identifiers!` macro; it is a function here rather than a macro
/// since this crate's property catalog is built from a data table (see
/// `style::properties`) instead of one macro invocation per property.
pub fn parse_keyword<'i, T: Copy>(
    parser: &mut Parser<'i, '_>,
    table: &[(&str, T)],
) -> Result<T, ParseError<'i>> {
    let loc = parser.current_source_location();
    let ident = parser.expect_ident()?.clone();
    for (name, value) in table {
        if ident.eq_ignore_ascii_case(name) {
            return Ok(*value);
        }
    }
    Err(loc.new_unexpected_token_error(cssparser::Token::Ident(ident)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Copy, Clone, PartialEq)]
    enum Foo {
        A,
        B,
    }

    #[test]
    fn keyword_table_matches_case_insensitively() {
        let table: &[(&str, Foo)] = &[("a", Foo::A), ("b", Foo::B)];
        let mut input = ParserInput::new("A");
        let mut parser = Parser::new(&mut input);
        assert_eq!(parse_keyword(&mut parser, table).unwrap(), Foo::A);
    }

    #[test]
    fn keyword_table_rejects_unknown() {
        let table: &[(&str, Foo)] = &[("a", Foo::A)];
        let mut input = ParserInput::new("z");
        let mut parser = Parser::new(&mut input);
        assert!(parse_keyword(&mut parser, table).is_err());
    }
}
