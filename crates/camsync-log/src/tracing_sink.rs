//! Bridge from the log sink port to `tracing`

use camsync_core::domain::log::{LogLevel, LogRecord};
use camsync_core::ports::log_sink::ILogSink;

/// Emits each record as a `tracing` event at the matching level
///
/// Metadata is rendered into a single `metadata` field so the installed
/// subscriber (human or JSON) decides the layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogSink;

impl ILogSink for TracingLogSink {
    fn record(&self, record: LogRecord) {
        let metadata = format!("{:?}", record.metadata);
        let tag = record.tag.as_str();
        let message = record.message.as_str();
        match record.level {
            LogLevel::Debug => tracing::debug!(tag, metadata = %metadata, "{message}"),
            LogLevel::Info => tracing::info!(tag, metadata = %metadata, "{message}"),
            LogLevel::Warn => tracing::warn!(tag, metadata = %metadata, "{message}"),
            LogLevel::Error => tracing::error!(tag, metadata = %metadata, "{message}"),
        }
    }
}
