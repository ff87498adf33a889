//! Camsync Log - Log sink adapters
//!
//! Implementations of the [`ILogSink`](camsync_core::ports::ILogSink) port:
//!
//! - [`file`] - Appends records to the debug log file through a writer task
//! - [`memory`] - Keeps the most recent records for display
//! - [`composite`] - Fans out every record to several sinks
//! - [`tracing_sink`] - Forwards records to the `tracing` subscriber
//!
//! Every sink is fire-and-forget: recording never blocks on I/O and never
//! returns an error to the caller.

pub mod composite;
pub mod file;
pub mod memory;
pub mod tracing_sink;

pub use composite::CompositeLogSink;
pub use file::{FileLogSink, FileLogWriter};
pub use memory::MemoryLogSink;
pub use tracing_sink::TracingLogSink;
