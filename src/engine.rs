//! The library instance (SPEC_FULL.md §A.3): the entry point embedders use
//! to create and grow stylesheets (spec §6's Stylesheet API).
//!
//! Spec §9's Design Notes call for encapsulating "the encoding-aliases
//! registry behind an explicit library instance passed to stylesheet
//! creation rather than a singleton." `CssEngine` is that instance. Its
//! alias table is `encoding_rs`'s own static label table (§A.4) rather than
//! a mutable per-instance one — there is no `aliases_file` to load in this
//! crate the way spec §5 describes — but callers still go through
//! `CssEngine` rather than a bare free function, so a future embedder that
//! *does* need a customizable table has one seam to extend instead of many.

use crate::alias;
use crate::error::CssError;
use crate::frontend;
use crate::rule::{Origin, RuleBody, Stylesheet};
use crate::session::Session;

/// A library instance. Cheap to construct; an embedder typically keeps one
/// around for the lifetime of a document load.
pub struct CssEngine {
    session: Session,
}

impl CssEngine {
    pub fn new() -> Self {
        CssEngine { session: Session::new() }
    }

    /// Creates an empty stylesheet with the given identity metadata (spec
    /// §6's `create`). `level` and `alloc`/`resolve` from the spec's
    /// signature have no counterpart here: this crate supports one CSS
    /// level and uses the host's ordinary allocator.
    pub fn create_stylesheet(
        &self,
        origin: Origin,
        url: Option<String>,
        title: Option<String>,
        allow_quirks: bool,
    ) -> Stylesheet {
        let mut sheet = Stylesheet::new(origin);
        sheet.url = url;
        sheet.title = title;
        sheet.quirks_allowed = allow_quirks;
        sheet
    }

    /// Decodes `bytes` (honoring a leading `@charset` per spec §3's "Import
    /// resolution state" neighbor, charset declarations) and parses the
    /// result into `sheet`'s rule list (spec §6's `append_data`).
    ///
    /// This crate's front-end parses a complete string in one pass rather
    /// than incrementally tokenizing a byte stream, so unlike the source
    /// this does not need to be called more than once per sheet; a host
    /// that receives the document in chunks should buffer them and call
    /// this once with the concatenated bytes.
    pub fn append_data(&self, sheet: &mut Stylesheet, bytes: &[u8]) -> Result<(), CssError> {
        let css = self.decode(bytes);
        let parsed = frontend::parse_stylesheet(&css, sheet.origin);
        for rule in parsed.rules {
            if let RuleBody::Charset(label) = &rule.body {
                if alias::resolve_charset(label).is_none() {
                    self.session
                        .on_rule_discarded(&format!("unresolvable @charset label {:?}", label));
                }
            }
            sheet.push_rule(rule);
        }
        Ok(())
    }

    /// Signals end-of-stream (spec §6's `data_done`). Returns
    /// `Err(CssError::ImportsPending)` — the `IMPORTS_PENDING` sentinel —
    /// if the sheet still has `@import` rules the host hasn't resolved via
    /// [`Stylesheet::register_import`].
    pub fn data_done(&self, sheet: &Stylesheet) -> Result<(), CssError> {
        if sheet.has_pending_imports() {
            Err(CssError::ImportsPending)
        } else {
            Ok(())
        }
    }

    fn decode(&self, bytes: &[u8]) -> String {
        if let Some(label) = sniff_charset_label(bytes) {
            if let Some(encoding) = alias::resolve_charset(&label) {
                let (text, _, _) = encoding.decode(bytes);
                return text.into_owned();
            }
            self.session
                .on_rule_discarded(&format!("unresolvable @charset label {:?}", label));
        }
        let (text, _, _) = encoding_rs::UTF_8.decode(bytes);
        text.into_owned()
    }
}

impl Default for CssEngine {
    fn default() -> Self {
        CssEngine::new()
    }
}

/// Sniffs a leading `@charset "label";` without a full CSS parse, since the
/// charset governs how the rest of the bytes should even be decoded into
/// text. CSS requires this to be the literal first bytes of the file, so a
/// simple prefix match is sufficient (CSS2.1 Appendix G).
fn sniff_charset_label(bytes: &[u8]) -> Option<String> {
    let prefix = b"@charset \"";
    if !bytes.starts_with(prefix) {
        return None;
    }
    let rest = &bytes[prefix.len()..];
    let end = rest.iter().position(|&b| b == b'"')?;
    std::str::from_utf8(&rest[..end]).ok().map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_data_and_parses_rules() {
        let engine = CssEngine::new();
        let mut sheet = engine.create_stylesheet(Origin::Author, None, None, false);
        engine.append_data(&mut sheet, b"p { color: red; }").unwrap();
        assert_eq!(sheet.rules.len(), 1);
        assert!(engine.data_done(&sheet).is_ok());
    }

    #[test]
    fn data_done_reports_pending_imports() {
        let engine = CssEngine::new();
        let mut sheet = engine.create_stylesheet(Origin::Author, None, None, false);
        engine
            .append_data(&mut sheet, b"@import url(\"other.css\") screen;")
            .unwrap();
        assert_eq!(engine.data_done(&sheet), Err(CssError::ImportsPending));

        let (url, media) = sheet.next_pending_import().unwrap();
        assert_eq!(url, "other.css");
        assert!(media.intersects(crate::media::MediaMask::SCREEN));

        sheet.register_import(engine.create_stylesheet(Origin::Author, None, None, false)).unwrap();
        assert!(engine.data_done(&sheet).is_ok());
    }

    #[test]
    fn decodes_declared_charset() {
        let engine = CssEngine::new();
        let mut bytes = b"@charset \"utf-8\";\n".to_vec();
        bytes.extend_from_slice("p { content: \"\u{2603}\"; }".as_bytes());
        let mut sheet = engine.create_stylesheet(Origin::Author, None, None, false);
        engine.append_data(&mut sheet, &bytes).unwrap();
        assert_eq!(sheet.rules.len(), 2);
    }
}
