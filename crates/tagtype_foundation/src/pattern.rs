//! Regex constraints for string fields.
//!
//! Patterns are written in literal form, `/source/flags`, inside field-type
//! specs. The source and flags are kept verbatim so a parsed spec prints back
//! exactly as written.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use regex::{Regex, RegexBuilder};

use crate::{Error, Result};

/// Flags accepted after the closing slash.
///
/// `g`, `y`, `d` and `v` have no meaning for a whole-value test and are kept
/// only so the literal round-trips.
const KNOWN_FLAGS: &str = "dgimsuvy";

/// A compiled regex together with the literal it came from.
#[derive(Clone)]
pub struct Pattern {
    source: Arc<str>,
    flags: Arc<str>,
    regex: Regex,
}

impl Pattern {
    /// Compiles a pattern from its source and flag letters.
    ///
    /// # Errors
    ///
    /// Returns a grammar error if a flag is unknown or repeated, or if the
    /// source is not a valid regex.
    pub fn new(source: &str, flags: &str) -> Result<Self> {
        let literal = format!("/{source}/{flags}");
        let mut builder = RegexBuilder::new(source);
        for (i, flag) in flags.char_indices() {
            if !KNOWN_FLAGS.contains(flag) {
                return Err(Error::grammar(literal, format!("unknown regex flag {flag:?}")));
            }
            if flags[..i].contains(flag) {
                return Err(Error::grammar(literal, format!("repeated regex flag {flag:?}")));
            }
            match flag {
                'i' => {
                    builder.case_insensitive(true);
                }
                'm' => {
                    builder.multi_line(true);
                }
                's' => {
                    builder.dot_matches_new_line(true);
                }
                _ => {}
            }
        }
        let regex = builder
            .build()
            .map_err(|e| Error::grammar(literal, format!("invalid regex: {e}")))?;
        Ok(Self {
            source: source.into(),
            flags: flags.into(),
            regex,
        })
    }

    /// Parses a `/source/flags` literal.
    ///
    /// Returns `Ok(None)` when `literal` is not in regex-literal form at all.
    ///
    /// # Errors
    ///
    /// Returns a grammar error if the literal is well-formed but does not compile.
    pub fn parse_literal(literal: &str) -> Result<Option<Self>> {
        let Some(body) = literal.strip_prefix('/') else {
            return Ok(None);
        };
        let Some(close) = body.rfind('/') else {
            return Ok(None);
        };
        Self::new(&body[..close], &body[close + 1..]).map(Some)
    }

    /// The pattern source between the slashes.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The flag letters after the closing slash.
    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    /// Tests a string against the pattern.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.source.hash(state);
        self.flags.hash(state);
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}
