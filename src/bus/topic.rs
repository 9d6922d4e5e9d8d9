//! Validated wildcard subscription pattern and routing-key matching.
//!
//! Grounded on `util/events/topic.go`. Grammar:
//! `'*' | WORD ('.' ('#' | WORD))* ('.' '*')?` where `#` matches exactly
//! one segment and a trailing `*` matches one or more trailing segments.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::LazyLock;

// Layer 2: Third-party crate imports
use regex::Regex;

// Layer 3: Internal module imports
use super::routing_key::RoutingKey;

const WORD: &str = "[A-Za-z0-9_][A-Za-z0-9_-]*";
const MATCH_ALL: &str = "*";
const MATCH_PART: &str = "#";
const SEPARATOR: char = '.';

#[allow(clippy::unwrap_used)]
static TOPIC_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(\*|{WORD}(\.(#|{WORD}))*(\.\*)?)$")).unwrap()
});

/// A validated subscriber-supplied pattern that may match many routing keys.
///
/// Two topic strings that would compile to the same matching regex are
/// still distinct registry buckets: topic equality is plain string
/// equality, so callers must unsubscribe using the exact string they
/// subscribed with.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Topic(String);

impl Topic {
    /// Validate and wrap `s` as a topic.
    pub fn new(s: impl Into<String>) -> Result<Self, crate::bus::BusError> {
        let s = s.into();
        if Self::grammar_matches(&s) {
            Ok(Self(s))
        } else {
            Err(crate::bus::BusError::InvalidTopic)
        }
    }

    /// True iff `s` matches the topic grammar.
    pub fn is_valid_str(s: &str) -> bool {
        Self::grammar_matches(s)
    }

    fn grammar_matches(s: &str) -> bool {
        TOPIC_PATTERN.is_match(s)
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this topic's pattern matches a (validated) routing key.
    ///
    /// Checks cheapest-first: an invalid routing key never matches; `"*"`
    /// matches everything; an exact string match short-circuits; a topic
    /// with neither `#` nor `*` can only match by exact string; everything
    /// else falls through to the derived regex.
    pub fn matches(&self, routing_key: &RoutingKey) -> bool {
        if !RoutingKey::is_valid_str(routing_key.as_str()) {
            return false;
        }

        if self.0 == MATCH_ALL {
            return true;
        }

        if self.0 == routing_key.as_str() {
            return true;
        }

        if !self.0.contains(MATCH_PART) && !self.0.contains(MATCH_ALL) {
            return false;
        }

        self.to_regex().is_match(routing_key.as_str())
    }

    /// Compile this topic into the regular expression used by `matches`.
    ///
    /// Escapes `.` separators, replaces each `#` with a single non-dot
    /// segment class, and — if `*` appears — truncates the pattern at the
    /// first `*` and replaces the remainder with `.*`, anchoring the
    /// whole expression.
    pub fn to_regex(&self) -> Regex {
        let mut pattern = self.0.replace(SEPARATOR, &format!("\\{SEPARATOR}"));
        pattern = pattern.replace(MATCH_PART, "[^.]+");

        if let Some(star_idx) = pattern.find('*') {
            pattern.truncate(star_idx);
            pattern.push_str(".*");
        }

        let anchored = format!("^{pattern}$");
        // `grammar_matches` guarantees this compiles; fall back to a
        // never-matching pattern rather than panic if it somehow doesn't.
        Regex::new(&anchored).unwrap_or_else(|_| {
            #[allow(clippy::unwrap_used)]
            Regex::new("$^").unwrap()
        })
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
