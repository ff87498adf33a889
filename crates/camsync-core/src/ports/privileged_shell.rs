//! Privileged shell port (driven/secondary port)
//!
//! This module defines the interface for executing shell command strings
//! with superuser privileges.
//!
//! ## Design Notes
//!
//! - Implementations never fail at the Rust level: spawn errors and timeouts
//!   are folded into a failed [`ShellOutput`] with exit code `-1`.
//! - One call spawns exactly one process; the caller is suspended until it
//!   exits. Command strings are fully formed by the caller, with every
//!   dynamic argument already quoted.
//! - `probe` must not emit per-invocation diagnostics.

use crate::domain::errors::OrchestratorError;

/// Exit code reported when no process exit status is available
pub const NO_EXIT_CODE: i32 = -1;

/// Outcome of one privileged command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// True only when the process exited with status zero
    pub success: bool,
    /// Captured standard output, trimmed
    pub stdout: String,
    /// Captured standard error, trimmed (or the spawn failure reason)
    pub stderr: String,
    /// Process exit code, or [`NO_EXIT_CODE`]
    pub exit_code: i32,
    /// Set when the command was killed after exceeding its timeout
    pub timed_out_secs: Option<u64>,
}

impl ShellOutput {
    /// A process that ran to completion
    pub fn exited(exit_code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            success: exit_code == 0,
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
            timed_out_secs: None,
        }
    }

    /// A process that could not be started
    pub fn spawn_failed(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: reason.into(),
            exit_code: NO_EXIT_CODE,
            timed_out_secs: None,
        }
    }

    /// A process that was killed after `seconds`
    pub fn timed_out(seconds: u64) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: format!("timed out after {seconds}s"),
            exit_code: NO_EXIT_CODE,
            timed_out_secs: Some(seconds),
        }
    }

    /// Classify a failed outcome into the orchestrator error taxonomy
    ///
    /// Returns `None` for a successful command.
    #[must_use]
    pub fn error(&self) -> Option<OrchestratorError> {
        if self.success {
            return None;
        }
        if let Some(seconds) = self.timed_out_secs {
            return Some(OrchestratorError::ShellTimedOut { seconds });
        }
        if self.exit_code == NO_EXIT_CODE {
            return Some(OrchestratorError::ProcessSpawnFailed(self.stderr.clone()));
        }
        Some(OrchestratorError::ShellCommandFailed {
            exit_code: self.exit_code,
            stderr: self.stderr.clone(),
        })
    }
}

/// Port trait for root-elevated command execution
#[async_trait::async_trait]
pub trait IPrivilegedShell: Send + Sync {
    /// Runs a trivial identity command and reports superuser capability
    ///
    /// True only if the command exits zero and reports uid 0. Never logs.
    async fn probe(&self) -> bool;

    /// Runs one fully formed command string with elevated privileges
    async fn run(&self, command: &str) -> ShellOutput;
}
