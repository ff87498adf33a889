//! Log records handed to the log sink port

use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a log record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        };
        write!(f, "{}", s)
    }
}

/// A single structured event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    /// Subsystem that emitted the record (e.g. `Root`, `Shell`)
    pub tag: String,
    pub message: String,
    pub metadata: BTreeMap<String, String>,
}

impl LogRecord {
    /// Creates a record stamped with the current time and no metadata
    pub fn new(level: LogLevel, tag: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            level,
            tag: tag.into(),
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Adds a metadata entry
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.metadata.insert(key.into(), value.to_string());
        self
    }

    /// Formats the record as a single log line
    ///
    /// `2024-01-01 12:00:00.000 [INFO] Root: Video synced {dest=/x}`
    pub fn to_line(&self) -> String {
        let mut line = format!(
            "{} [{}] {}: {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S%.3f"),
            self.level,
            self.tag,
            self.message
        );
        if !self.metadata.is_empty() {
            let pairs: Vec<String> = self
                .metadata
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            line.push_str(&format!(" {{{}}}", pairs.join(", ")));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_line_without_metadata() {
        let record = LogRecord::new(LogLevel::Info, "Root", "Video selected");
        let line = record.to_line();
        assert!(line.ends_with("[INFO] Root: Video selected"));
    }

    #[test]
    fn test_to_line_with_sorted_metadata() {
        let record = LogRecord::new(LogLevel::Debug, "Shell", "ran")
            .with("exit_code", 0)
            .with("duration_ms", 12);
        assert!(record
            .to_line()
            .ends_with("[DEBUG] Shell: ran {duration_ms=12, exit_code=0}"));
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
    }
}
