//! Error types.

use std::error;
use std::fmt;

use cssparser::{BasicParseError, BasicParseErrorKind};

/// A short-lived error.
///
/// The lifetime of the error is the same as the `cssparser::ParserInput` that
/// was used to create a `cssparser::Parser`.  That is, it is the lifetime of
/// the string data that is being parsed.
pub type ParseError<'i> = cssparser::ParseError<'i, CssError>;

/// The single error taxonomy used throughout this crate.
///
/// Every fallible operation in this crate returns one of these variants
/// rather than a per-module error type, matching the source's single
/// `css_error` enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CssError {
    /// An allocation could not be satisfied. This crate never allocates a
    /// fallible buffer directly, but the variant is kept so that an embedder
    /// plugging in its own allocator behind [`crate::handler::SelectionHandler`]
    /// has somewhere to report failure.
    NoMem,

    /// A null or out-of-range argument was passed to an API entry point.
    BadParam,

    /// The operation is semantically illegal in the current state: a
    /// double-`combine`, a pseudo-element appended somewhere other than the
    /// rightmost compound, `register_import` with nothing pending, etc.
    Invalid,

    /// The parser needs more input before it can make progress.
    NeedData,

    /// The declared or detected charset could not be honored.
    BadCharset,

    /// End of stream reached unexpectedly by a lower-level lexer signal.
    Eof,

    /// `data_done` cannot complete until all `@import` rules are resolved.
    ImportsPending,

    /// A selector or cascade query was made for a property that the style
    /// does not carry a value for.
    PropertyNotSet,

    /// The value could not be parsed.
    Parse(String),

    /// The value parsed, but its contents are invalid for the property.
    Value(String),
}

impl CssError {
    pub fn parse_error(s: &str) -> CssError {
        CssError::Parse(s.to_string())
    }

    pub fn value_error(s: &str) -> CssError {
        CssError::Value(s.to_string())
    }
}

impl fmt::Display for CssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            CssError::NoMem => write!(f, "out of memory"),
            CssError::BadParam => write!(f, "bad parameter"),
            CssError::Invalid => write!(f, "invalid operation for current state"),
            CssError::NeedData => write!(f, "parser needs more data"),
            CssError::BadCharset => write!(f, "unsupported or unresolvable charset"),
            CssError::Eof => write!(f, "unexpected end of input"),
            CssError::ImportsPending => write!(f, "imports are still pending"),
            CssError::PropertyNotSet => write!(f, "property is not set"),
            CssError::Parse(ref s) => write!(f, "parse error: {}", s),
            CssError::Value(ref s) => write!(f, "invalid value: {}", s),
        }
    }
}

impl error::Error for CssError {}

impl<'a> From<BasicParseError<'a>> for CssError {
    fn from(e: BasicParseError<'_>) -> CssError {
        let BasicParseError { kind, .. } = e;

        let msg = match kind {
            BasicParseErrorKind::UnexpectedToken(_) => "unexpected token",
            BasicParseErrorKind::EndOfInput => "unexpected end of input",
            BasicParseErrorKind::AtRuleInvalid(_) => "invalid @-rule",
            BasicParseErrorKind::AtRuleBodyInvalid => "invalid @-rule body",
            BasicParseErrorKind::QualifiedRuleInvalid => "invalid qualified rule",
        };

        CssError::parse_error(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_messages() {
        assert_eq!(format!("{}", CssError::NoMem), "out of memory");
        assert_eq!(
            format!("{}", CssError::parse_error("oops")),
            "parse error: oops"
        );
    }
}
