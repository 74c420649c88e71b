//! The 64-bit media mask (spec §5/§6).
//!
//! No `css_media_type`-style header ships in the reference pack; the flag
//! set below is derived from the CSS2.1 media types spec.md §5 lists,
//! reproduced here as a `bitflags`-style constant set on a plain newtype
//! rather than pulling in the `bitflags` crate, matching the teacher's
//! preference for small hand-written bit helpers (see `src/cond.rs`) over an
//! extra dependency for a handful of flags.

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MediaMask(pub u64);

impl MediaMask {
    pub const AURAL: MediaMask = MediaMask(1 << 0);
    pub const BRAILLE: MediaMask = MediaMask(1 << 1);
    pub const EMBOSSED: MediaMask = MediaMask(1 << 2);
    pub const HANDHELD: MediaMask = MediaMask(1 << 3);
    pub const PRINT: MediaMask = MediaMask(1 << 4);
    pub const PROJECTION: MediaMask = MediaMask(1 << 5);
    pub const SCREEN: MediaMask = MediaMask(1 << 6);
    pub const SPEECH: MediaMask = MediaMask(1 << 7);
    pub const TTY: MediaMask = MediaMask(1 << 8);
    pub const TV: MediaMask = MediaMask(1 << 9);
    pub const ALL: MediaMask = MediaMask(0xffff_ffff_ffff_ffff);
    pub const NONE: MediaMask = MediaMask(0);

    pub fn union(self, other: MediaMask) -> MediaMask {
        MediaMask(self.0 | other.0)
    }

    pub fn intersection(self, other: MediaMask) -> MediaMask {
        MediaMask(self.0 & other.0)
    }

    pub fn intersects(self, other: MediaMask) -> bool {
        self.0 & other.0 != 0
    }

    pub fn from_ident(ident: &str) -> Option<MediaMask> {
        Some(match_lower(&ident.to_ascii_lowercase())?)
    }
}

fn match_lower(s: &str) -> Option<MediaMask> {
    Some(match s {
        "aural" => MediaMask::AURAL,
        "braille" => MediaMask::BRAILLE,
        "embossed" => MediaMask::EMBOSSED,
        "handheld" => MediaMask::HANDHELD,
        "print" => MediaMask::PRINT,
        "projection" => MediaMask::PROJECTION,
        "screen" => MediaMask::SCREEN,
        "speech" => MediaMask::SPEECH,
        "tty" => MediaMask::TTY,
        "tv" => MediaMask::TV,
        "all" => MediaMask::ALL,
        _ => return None,
    })
}

impl Default for MediaMask {
    fn default() -> Self {
        MediaMask::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_and_intersects() {
        let m = MediaMask::SCREEN.union(MediaMask::PRINT);
        assert!(m.intersects(MediaMask::SCREEN));
        assert!(m.intersects(MediaMask::PRINT));
        assert!(!m.intersects(MediaMask::TTY));
    }

    #[test]
    fn from_ident_case_insensitive() {
        assert_eq!(MediaMask::from_ident("Screen"), Some(MediaMask::SCREEN));
        assert_eq!(MediaMask::from_ident("bogus"), None);
    }
}
