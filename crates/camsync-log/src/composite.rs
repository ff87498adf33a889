//! Fan-out sink

use std::sync::Arc;

use camsync_core::domain::log::LogRecord;
use camsync_core::ports::log_sink::ILogSink;

/// Forwards every record to each inner sink, in order
#[derive(Clone, Default)]
pub struct CompositeLogSink {
    sinks: Vec<Arc<dyn ILogSink>>,
}

impl CompositeLogSink {
    pub fn new(sinks: Vec<Arc<dyn ILogSink>>) -> Self {
        Self { sinks }
    }

    /// Adds another sink
    pub fn with(mut self, sink: Arc<dyn ILogSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

impl std::fmt::Debug for CompositeLogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeLogSink")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl ILogSink for CompositeLogSink {
    fn record(&self, record: LogRecord) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.record(record.clone());
            }
            last.record(record);
        }
    }
}

#[cfg(test)]
mod tests {
    use camsync_core::domain::log::LogLevel;

    use super::*;
    use crate::memory::MemoryLogSink;

    #[test]
    fn test_fans_out_to_every_sink() {
        let a = Arc::new(MemoryLogSink::new());
        let b = Arc::new(MemoryLogSink::new());
        let composite = CompositeLogSink::new(vec![a.clone()]).with(b.clone());

        composite.record(LogRecord::new(LogLevel::Info, "Root", "hello"));

        assert_eq!(a.snapshot()[0].message, "hello");
        assert_eq!(b.snapshot()[0].message, "hello");
    }

    #[test]
    fn test_empty_composite_is_noop() {
        CompositeLogSink::default().record(LogRecord::new(LogLevel::Info, "Root", "x"));
    }
}
