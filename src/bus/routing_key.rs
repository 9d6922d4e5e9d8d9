//! Validated, dotted publisher identifier.
//!
//! Grounded on `util/events/routingKey.go`. Grammar:
//! `WORD('.'WORD)*` where `WORD = [A-Za-z0-9_][A-Za-z0-9_-]*`.

// Layer 1: Standard library imports
use std::fmt;
use std::sync::LazyLock;

// Layer 2: Third-party crate imports
use regex::Regex;

const WORD: &str = "[A-Za-z0-9_][A-Za-z0-9_-]*";

#[allow(clippy::unwrap_used)]
static ROUTING_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^{WORD}(\.{WORD})*$")).unwrap());

/// A validated, non-empty, dotted identifier used by publishers.
///
/// Case-sensitive, immutable, and never contains wildcards. Construct via
/// [`RoutingKey::new`], which validates eagerly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutingKey(String);

impl RoutingKey {
    /// Validate and wrap `s` as a routing key.
    pub fn new(s: impl Into<String>) -> Result<Self, crate::bus::BusError> {
        let s = s.into();
        if Self::grammar_matches(&s) {
            Ok(Self(s))
        } else {
            Err(crate::bus::BusError::InvalidRoutingKey(s))
        }
    }

    /// True iff `s` matches the routing-key grammar.
    pub fn is_valid_str(s: &str) -> bool {
        Self::grammar_matches(s)
    }

    fn grammar_matches(s: &str) -> bool {
        ROUTING_KEY_PATTERN.is_match(s)
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RoutingKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_single_word() {
        assert!(RoutingKey::new("foo").is_ok());
    }

    #[test]
    fn accepts_dotted_segments() {
        assert!(RoutingKey::new("foo.bar.baz").is_ok());
    }

    #[test]
    fn accepts_hyphen_and_underscore() {
        assert!(RoutingKey::new("foo-bar_baz.qux-1").is_ok());
    }

    #[test]
    fn rejects_empty_string() {
        assert!(RoutingKey::new("").is_err());
    }

    #[test]
    fn rejects_wildcards() {
        assert!(RoutingKey::new("foo.*.bar").is_err());
        assert!(RoutingKey::new("foo.#.bar").is_err());
    }

    #[test]
    fn rejects_consecutive_separators() {
        assert!(RoutingKey::new("foo..bar").is_err());
    }

    #[test]
    fn rejects_leading_separator() {
        assert!(RoutingKey::new(".foo").is_err());
    }

    #[test]
    fn rejects_leading_hyphen_in_segment() {
        assert!(RoutingKey::new("-foo").is_err());
    }

    #[test]
    fn error_message_contains_invalid_value() {
        let err = RoutingKey::new("foo.*.bar").unwrap_err();
        assert!(err.to_string().contains("foo.*.bar"));
    }
}
