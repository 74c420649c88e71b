//! Tracks metadata for a parsing/selection session.

use crate::log;

/// Metadata for a parsing/selection session.
///
/// When a caller first creates a [`crate::engine::CssEngine`] there is no
/// context yet where this crate's code can log diagnostics or report
/// rule-ordering violations. This struct provides that context; it is
/// cheap to construct and is threaded through parsing and selection calls.
#[derive(Clone)]
pub struct Session {
    log_enabled: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            log_enabled: log::log_enabled(),
        }
    }

    /// Reports a discarded rule (an at-rule ordering violation, or a
    /// declaration that failed to parse). Per spec, these are logged but
    /// never abort parsing.
    pub fn on_rule_discarded(&self, msg: &str) {
        if self.log_enabled {
            println!("{}", msg);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
