//! Charset alias resolution (SPEC_FULL.md §A.4).
//!
//! `@charset` declares a label, not necessarily a canonical encoding name;
//! grounded on the teacher's own reliance on `encoding_rs` for label
//! resolution (`rsvg/src/css.rs`'s stylesheet loading goes through
//! `glib::convert` for non-UTF8 input, but `encoding_rs::Encoding::for_label`
//! is the idiomatic crate for exactly this lookup and is what the other
//! example repos in the pack reach for when resolving a charset label from
//! network or file metadata).

use encoding_rs::Encoding;

/// Resolves a charset label (from `@charset "label";`, an HTTP
/// `Content-Type` parameter, or a BOM sniff) to the `encoding_rs` encoding
/// it names, per the WHATWG Encoding Standard's alias table.
pub fn resolve_charset(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_common_aliases() {
        assert_eq!(resolve_charset("utf-8"), Some(encoding_rs::UTF_8));
        assert_eq!(resolve_charset("iso-8859-1"), Some(encoding_rs::WINDOWS_1252));
        assert_eq!(resolve_charset("latin1"), Some(encoding_rs::WINDOWS_1252));
    }

    #[test]
    fn rejects_unknown_label() {
        assert_eq!(resolve_charset("not-a-real-charset"), None);
    }
}
