//! The encoded log record carried as a log event's payload.
//!
//! Grounded on `modules/EventBus/logger.go`'s `LogEventBuffer`, a `[]byte`
//! alias for the zap-encoded entry. We encode with a small hand-rolled
//! logfmt-style visitor instead of zap's encoder, since this crate doesn't
//! carry a full formatting subscriber as a dependency, and keep the same
//! "it's just bytes" shape so IO subscribers can write it without knowing
//! its structure.

// Layer 1: Standard library imports
use std::fmt::{self, Write as _};

// Layer 2: Third-party crate imports
use chrono::Utc;
use tracing::field::{Field, Visit};
use tracing::Level;

/// An encoded log entry, ready to be written to a byte sink.
#[derive(Debug, Clone)]
pub struct LogRecord(pub Vec<u8>);

impl LogRecord {
    /// Wrap a plain diagnostic string as a log record (used when the log
    /// bridge itself needs to report a write failure back onto the bus).
    pub fn text(line: impl Into<String>) -> Self {
        let mut line = line.into();
        if !line.ends_with('\n') {
            line.push('\n');
        }
        Self(line.into_bytes())
    }

    /// Encode a `tracing` event into a single log line.
    pub(crate) fn from_event(level: Level, target: &str, event: &tracing::Event<'_>) -> Self {
        let mut visitor = LineVisitor::default();
        event.record(&mut visitor);

        let mut line = format!("{} {:<5} {target}:", Utc::now().to_rfc3339(), level.as_str());
        if !visitor.message.is_empty() {
            let _ = write!(line, " {}", visitor.message);
        }
        for (key, value) in &visitor.fields {
            let _ = write!(line, " {key}={value}");
        }
        line.push('\n');

        Self(line.into_bytes())
    }
}

impl AsRef<[u8]> for LogRecord {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Default)]
struct LineVisitor {
    message: String,
    fields: Vec<(&'static str, String)>,
}

impl Visit for LineVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.fields.push((field.name(), value.to_string()));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{value:?}");
        } else {
            self.fields.push((field.name(), format!("{value:?}")));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_appends_trailing_newline() {
        let record = LogRecord::text("boom");
        assert!(record.0.ends_with(b"\n"));
    }

    #[test]
    fn text_does_not_double_newline() {
        let record = LogRecord::text("boom\n");
        assert_eq!(record.0, b"boom\n");
    }
}
