use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNKNOWN_LEVEL: &str = "UNKNOWN";

/// One structured log entry. `message` may span several input lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub level: String,
    pub message: String,
}

impl LogRecord {
    pub fn new(timestamp: impl Into<String>, level: impl Into<String>, message: impl Into<String>) -> Self {
        Self { timestamp: timestamp.into(), level: level.into(), message: message.into() }
    }

    /// Record for content seen before any header.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new("", UNKNOWN_LEVEL, message)
    }

    pub fn append_line(&mut self, line: &str) {
        self.message.push('\n');
        self.message.push_str(line);
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.timestamp, self.level, self.message)
    }
}
