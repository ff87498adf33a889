//! Bounded in-memory sink for displaying recent records

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use camsync_core::domain::log::LogRecord;
use camsync_core::ports::log_sink::ILogSink;

/// Default number of records kept
pub const DEFAULT_CAPACITY: usize = 500;

/// Keeps the newest `capacity` records, oldest first
#[derive(Debug)]
pub struct MemoryLogSink {
    capacity: usize,
    records: Mutex<VecDeque<LogRecord>>,
}

impl MemoryLogSink {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Copy of the retained records, oldest first
    pub fn snapshot(&self) -> Vec<LogRecord> {
        self.lock().iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<LogRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryLogSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ILogSink for MemoryLogSink {
    fn record(&self, record: LogRecord) {
        let mut records = self.lock();
        while records.len() >= self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }
}

#[cfg(test)]
mod tests {
    use camsync_core::domain::log::LogLevel;

    use super::*;

    #[test]
    fn test_keeps_newest_records() {
        let sink = MemoryLogSink::with_capacity(3);
        for i in 0..5 {
            sink.record(LogRecord::new(LogLevel::Info, "Test", format!("msg {i}")));
        }
        let messages: Vec<_> = sink.snapshot().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["msg 2", "msg 3", "msg 4"]);
    }

    #[test]
    fn test_clear() {
        let sink = MemoryLogSink::new();
        sink.record(LogRecord::new(LogLevel::Debug, "Test", "x"));
        assert_eq!(sink.len(), 1);
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let sink = MemoryLogSink::with_capacity(0);
        sink.record(LogRecord::new(LogLevel::Debug, "Test", "a"));
        sink.record(LogRecord::new(LogLevel::Debug, "Test", "b"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.snapshot()[0].message, "b");
    }
}
