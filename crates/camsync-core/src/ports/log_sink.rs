//! Log sink port (driven/secondary port)
//!
//! A narrow "record an event" interface. Recording is synchronous and
//! infallible from the caller's point of view: sinks must never block the
//! orchestrator or surface their own failures.

use std::collections::BTreeMap;

use crate::domain::log::{LogLevel, LogRecord};

/// Port trait for structured event recording
pub trait ILogSink: Send + Sync {
    /// Records one event
    fn record(&self, record: LogRecord);

    /// Convenience wrapper building a [`LogRecord`] from parts
    fn log(&self, level: LogLevel, tag: &str, message: &str, metadata: BTreeMap<String, String>) {
        let mut record = LogRecord::new(level, tag, message);
        record.metadata = metadata;
        self.record(record);
    }
}

/// Sink that discards every record
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogSink;

impl ILogSink for NullLogSink {
    fn record(&self, _record: LogRecord) {}
}
