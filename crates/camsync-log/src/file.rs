//! Debug log file sink.
//!
//! Provides `FileLogSink` to append log lines to the debug log file. Writes are
//! queued on an unbounded channel and performed by a single `FileLogWriter`
//! task, so recording never blocks the caller on disk I/O.
//!
//! # Example
//!
//! ```ignore
//! let (sink, writer) = FileLogSink::new(config.logging.file.clone());
//! tokio::spawn(writer.run());
//! sink.record(LogRecord::new(LogLevel::Info, "Root", "Video synced"));
//! sink.flush().await;
//! ```

use std::path::{Path, PathBuf};

use camsync_core::domain::log::LogRecord;
use camsync_core::ports::log_sink::ILogSink;
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};

/// Commands processed by the writer task
#[derive(Debug)]
enum WriterCommand {
    /// Append one formatted line
    Line(String),
    /// Truncate the log file
    Clear,
    /// Reply once every earlier command has been processed
    Flush(oneshot::Sender<()>),
}

// ============================================================================
// FileLogSink
// ============================================================================

/// Handle that queues records for the writer task
///
/// Cloneable; all clones feed the same writer.
#[derive(Debug, Clone)]
pub struct FileLogSink {
    path: PathBuf,
    tx: mpsc::UnboundedSender<WriterCommand>,
}

impl FileLogSink {
    /// Creates a sink and the writer task that drains it
    ///
    /// The caller must spawn the writer by calling `run()`.
    pub fn new(path: PathBuf) -> (Self, FileLogWriter) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            path: path.clone(),
            tx,
        };
        (sink, FileLogWriter { path, rx })
    }

    /// Creates a sink and spawns its writer on the current runtime
    pub fn spawn(path: PathBuf) -> (Self, tokio::task::JoinHandle<()>) {
        let (sink, writer) = Self::new(path);
        let handle = tokio::spawn(writer.run());
        (sink, handle)
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Truncates the log file once queued lines are written
    pub fn clear(&self) {
        let _ = self.tx.send(WriterCommand::Clear);
    }

    /// Waits until every record queued so far is on disk
    ///
    /// Returns immediately if the writer has stopped.
    pub async fn flush(&self) {
        let (reply, done) = oneshot::channel();
        if self.tx.send(WriterCommand::Flush(reply)).is_ok() {
            let _ = done.await;
        }
    }
}

impl ILogSink for FileLogSink {
    fn record(&self, record: LogRecord) {
        // A stopped writer means the process is shutting down; drop the line.
        let _ = self.tx.send(WriterCommand::Line(record.to_line()));
    }
}

// ============================================================================
// FileLogWriter
// ============================================================================

/// Task that appends queued lines to the log file
///
/// Runs until every `FileLogSink` clone has been dropped.
pub struct FileLogWriter {
    path: PathBuf,
    rx: mpsc::UnboundedReceiver<WriterCommand>,
}

impl FileLogWriter {
    /// Runs the writer loop
    ///
    /// I/O failures are reported through `tracing::warn!` and the loop
    /// continues with the next command.
    pub async fn run(mut self) {
        tracing::debug!(path = %self.path.display(), "Log writer task started");

        while let Some(command) = self.rx.recv().await {
            match command {
                WriterCommand::Line(line) => {
                    if let Err(e) = self.append(&line).await {
                        tracing::warn!(error = %e, path = %self.path.display(), "Failed to write log line");
                    }
                }
                WriterCommand::Clear => {
                    if let Err(e) = self.truncate().await {
                        tracing::warn!(error = %e, path = %self.path.display(), "Failed to clear log file");
                    }
                }
                WriterCommand::Flush(reply) => {
                    let _ = reply.send(());
                }
            }
        }

        tracing::debug!("Log writer task stopped (all senders dropped)");
    }

    async fn append(&self, line: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.write_all(b"\n").await?;
        file.flush().await
    }

    async fn truncate(&self) -> std::io::Result<()> {
        match tokio::fs::metadata(&self.path).await {
            Ok(_) => tokio::fs::write(&self.path, b"").await,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}
