//! Root shell adapter (secondary/driven adapter)
//!
//! Implements [`IPrivilegedShell`] by spawning `<su> -c <command>` with
//! `tokio::process`. Every invocation is a fresh process; nothing is kept
//! alive between commands.
//!
//! ## Design Decisions
//!
//! - **Never fails at the Rust level**: spawn errors and timeouts become a
//!   failed [`ShellOutput`] with exit code `-1`.
//! - **Timeouts**: the child is created with `kill_on_drop`, so abandoning the
//!   wait after the configured timeout also kills the process.
//! - **Diagnostics**: `run` emits one log record per command; `probe` emits
//!   none.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use camsync_core::config::ShellConfig;
use camsync_core::domain::log::{LogLevel, LogRecord};
use camsync_core::ports::log_sink::ILogSink;
use camsync_core::ports::privileged_shell::{IPrivilegedShell, ShellOutput, NO_EXIT_CODE};
use tokio::process::Command;
use tracing::{debug, instrument};

/// Log tag for shell records
const TAG: &str = "Shell";

/// Stderr is cut to this many characters in failure records
const MAX_LOGGED_STDERR: usize = 512;

/// Quotes a string as a single POSIX shell word
///
/// Wraps the value in single quotes and rewrites each embedded `'` as
/// `'\''`, so the shell sees the exact original bytes.
#[must_use]
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "'\\''"))
}

/// Quotes a path as a single POSIX shell word
#[must_use]
pub fn quote_path(path: &Path) -> String {
    shell_quote(&path.to_string_lossy())
}

/// Runs commands through the `su` binary
pub struct SuShell {
    su_binary: String,
    timeout: Duration,
    log_sink: Arc<dyn ILogSink>,
}

impl SuShell {
    pub fn new(su_binary: impl Into<String>, timeout: Duration, log_sink: Arc<dyn ILogSink>) -> Self {
        Self {
            su_binary: su_binary.into(),
            timeout,
            log_sink,
        }
    }

    /// Builds a shell from the `shell` configuration section
    pub fn from_config(config: &ShellConfig, log_sink: Arc<dyn ILogSink>) -> Self {
        Self::new(
            config.su_binary.clone(),
            Duration::from_secs(config.timeout_secs),
            log_sink,
        )
    }

    /// Whether `path` is a regular file, as seen by the root shell
    pub async fn file_exists(&self, path: &Path) -> bool {
        self.execute(&format!("test -f {}", quote_path(path)))
            .await
            .success
    }

    /// Spawns the process and waits for it, without logging
    async fn execute(&self, command: &str) -> ShellOutput {
        let child = Command::new(&self.su_binary)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn();

        let child = match child {
            Ok(child) => child,
            Err(e) => return ShellOutput::spawn_failed(e.to_string()),
        };

        match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            // Dropping the wait future drops the child, which kills it.
            Err(_) => ShellOutput::timed_out(timeout_secs(self.timeout)),
            Ok(Err(e)) => ShellOutput::spawn_failed(e.to_string()),
            Ok(Ok(output)) => ShellOutput::exited(
                exit_code(&output.status),
                String::from_utf8_lossy(&output.stdout).trim(),
                String::from_utf8_lossy(&output.stderr).trim(),
            ),
        }
    }
}

#[async_trait::async_trait]
impl IPrivilegedShell for SuShell {
    async fn probe(&self) -> bool {
        let output = self.execute("id").await;
        output.success && output.stdout.contains("uid=0")
    }

    #[instrument(skip(self), level = "debug")]
    async fn run(&self, command: &str) -> ShellOutput {
        let started = Instant::now();
        let output = self.execute(command).await;
        let duration_ms = started.elapsed().as_millis();

        debug!(
            exit_code = output.exit_code,
            duration_ms = duration_ms as u64,
            "Privileged command finished"
        );

        let record = if output.success {
            LogRecord::new(LogLevel::Debug, TAG, "Privileged command succeeded")
        } else {
            LogRecord::new(LogLevel::Error, TAG, "Privileged command failed")
                .with("stderr", truncate_chars(&output.stderr, MAX_LOGGED_STDERR))
        };
        self.log_sink.record(
            record
                .with("command", command)
                .with("duration_ms", duration_ms)
                .with("exit_code", output.exit_code)
                .with("stdout_bytes", output.stdout.len())
                .with("stderr_bytes", output.stderr.len()),
        );

        output
    }
}

/// Exit code of a finished process
///
/// Signal deaths map to `128 + signal`, like a POSIX shell reports them.
fn exit_code(status: &std::process::ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    NO_EXIT_CODE
}

/// Whole seconds for the timeout message, rounded up
fn timeout_secs(timeout: Duration) -> u64 {
    let secs = timeout.as_secs();
    if timeout.subsec_nanos() > 0 {
        secs + 1
    } else {
        secs
    }
}

fn truncate_chars(value: &str, max: usize) -> String {
    match value.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &value[..idx]),
        None => value.to_string(),
    }
}
