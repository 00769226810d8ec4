//! Pattern values
//!
//! Patterns compile through the `regex` crate. Offsets (including
//! `last_index`) are byte offsets into the haystack, not UTF-16 indices.

use crate::error::ValueError;
use regex::{Regex, RegexBuilder};
use std::cell::Cell;
use std::ops::Range;

/// Flags in the order the `flags` getter reports them
const CANONICAL_FLAGS: &str = "dgimsuvy";

/// Parsed pattern flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegExpFlags {
    /// `d`
    pub has_indices: bool,
    /// `g`
    pub global: bool,
    /// `i`
    pub ignore_case: bool,
    /// `m`
    pub multiline: bool,
    /// `s`
    pub dot_all: bool,
    /// `u`
    pub unicode: bool,
    /// `v`
    pub unicode_sets: bool,
    /// `y`
    pub sticky: bool,
}

impl RegExpFlags {
    /// Parse a flag string, rejecting unknown and repeated flags
    pub fn parse(flags: &str) -> Result<Self, ValueError> {
        let mut parsed = Self::default();
        for ch in flags.chars() {
            let slot = match ch {
                'd' => &mut parsed.has_indices,
                'g' => &mut parsed.global,
                'i' => &mut parsed.ignore_case,
                'm' => &mut parsed.multiline,
                's' => &mut parsed.dot_all,
                'u' => &mut parsed.unicode,
                'v' => &mut parsed.unicode_sets,
                'y' => &mut parsed.sticky,
                _ => return Err(ValueError::InvalidFlags(flags.to_string())),
            };
            if *slot {
                return Err(ValueError::InvalidFlags(flags.to_string()));
            }
            *slot = true;
        }
        if parsed.unicode && parsed.unicode_sets {
            return Err(ValueError::InvalidFlags(flags.to_string()));
        }
        Ok(parsed)
    }

    fn is_set(&self, flag: char) -> bool {
        match flag {
            'd' => self.has_indices,
            'g' => self.global,
            'i' => self.ignore_case,
            'm' => self.multiline,
            's' => self.dot_all,
            'u' => self.unicode,
            'v' => self.unicode_sets,
            'y' => self.sticky,
            _ => false,
        }
    }
}

impl std::fmt::Display for RegExpFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for flag in CANONICAL_FLAGS.chars().filter(|c| self.is_set(*c)) {
            write!(f, "{}", flag)?;
        }
        Ok(())
    }
}

/// A compiled pattern with its source text, flags and match cursor
#[derive(Debug)]
pub struct JsRegExp {
    source: String,
    flags: RegExpFlags,
    last_index: Cell<usize>,
    native_regex: Regex,
}

impl JsRegExp {
    /// Compile `source` with the given flag string
    pub fn new(source: &str, flags: &str) -> Result<Self, ValueError> {
        let flags = RegExpFlags::parse(flags)?;
        let native_regex = RegexBuilder::new(source)
            .case_insensitive(flags.ignore_case)
            .multi_line(flags.multiline)
            .dot_matches_new_line(flags.dot_all)
            .build()
            .map_err(|e| ValueError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self {
            source: source.to_string(),
            flags,
            last_index: Cell::new(0),
            native_regex,
        })
    }

    /// A fresh pattern with the same source and flags, cursor at zero.
    ///
    /// The compiled program is immutable, so it is shared rather than rebuilt.
    pub fn duplicate(&self) -> Self {
        Self {
            source: self.source.clone(),
            flags: self.flags,
            last_index: Cell::new(0),
            native_regex: self.native_regex.clone(),
        }
    }

    /// Pattern source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed flags
    pub fn flags(&self) -> RegExpFlags {
        self.flags
    }

    /// Flags in canonical order
    pub fn flags_string(&self) -> String {
        self.flags.to_string()
    }

    /// Current match cursor
    pub fn last_index(&self) -> usize {
        self.last_index.get()
    }

    /// Move the match cursor
    pub fn set_last_index(&self, index: usize) {
        self.last_index.set(index);
    }

    /// Find the next match, honoring `lastIndex` for global and sticky patterns
    pub fn exec(&self, haystack: &str) -> Option<Range<usize>> {
        let stateful = self.flags.global || self.flags.sticky;
        let start = if stateful { self.last_index.get() } else { 0 };

        if start > haystack.len() || !haystack.is_char_boundary(start) {
            self.last_index.set(0);
            return None;
        }

        let found = self
            .native_regex
            .find_at(haystack, start)
            .filter(|m| !self.flags.sticky || m.start() == start);

        match found {
            Some(m) => {
                if stateful {
                    self.last_index.set(m.end());
                }
                Some(m.range())
            }
            None => {
                if stateful {
                    self.last_index.set(0);
                }
                None
            }
        }
    }

    /// Whether `haystack` contains a match (`test`)
    pub fn test(&self, haystack: &str) -> bool {
        self.exec(haystack).is_some()
    }
}

impl std::fmt::Display for JsRegExp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_canonical_order() {
        let re = JsRegExp::new("ab+", "yig").unwrap();
        assert_eq!(re.flags_string(), "giy");
        assert_eq!(re.to_string(), "/ab+/giy");
    }

    #[test]
    fn test_invalid_flags() {
        assert!(matches!(
            JsRegExp::new("a", "gg"),
            Err(ValueError::InvalidFlags(_))
        ));
        assert!(matches!(
            JsRegExp::new("a", "x"),
            Err(ValueError::InvalidFlags(_))
        ));
        assert!(matches!(
            JsRegExp::new("a", "uv"),
            Err(ValueError::InvalidFlags(_))
        ));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = JsRegExp::new("(", "").unwrap_err();
        assert!(matches!(err, ValueError::InvalidPattern { ref pattern, .. } if pattern == "("));
    }

    #[test]
    fn test_ignore_case() {
        let re = JsRegExp::new("ab+", "i").unwrap();
        assert!(re.test("xxABBB"));
        assert_eq!(re.last_index(), 0);
    }

    #[test]
    fn test_global_advances_last_index() {
        let re = JsRegExp::new("a", "g").unwrap();
        assert_eq!(re.exec("banana"), Some(1..2));
        assert_eq!(re.last_index(), 2);
        assert_eq!(re.exec("banana"), Some(3..4));
        assert_eq!(re.exec("banana"), Some(5..6));
        assert_eq!(re.exec("banana"), None);
        assert_eq!(re.last_index(), 0);
    }

    #[test]
    fn test_sticky_requires_match_at_cursor() {
        let re = JsRegExp::new("a", "y").unwrap();
        assert!(!re.test("ba"));
        re.set_last_index(1);
        assert!(re.test("ba"));
        assert_eq!(re.last_index(), 2);
    }

    #[test]
    fn test_duplicate_resets_cursor() {
        let re = JsRegExp::new("a", "g").unwrap();
        re.set_last_index(3);
        let copy = re.duplicate();
        assert_eq!(copy.source(), "a");
        assert_eq!(copy.flags(), re.flags());
        assert_eq!(copy.last_index(), 0);
        assert_eq!(re.last_index(), 3);
    }
}
