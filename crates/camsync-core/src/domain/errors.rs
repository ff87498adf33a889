//! Domain error types
//!
//! This module defines the validation errors raised by domain newtypes, the
//! failure taxonomy of orchestrator operations, and the staging failures
//! reported by the media staging service.

use thiserror::Error;

use super::media::MediaKind;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid content locator
    #[error("Invalid content reference: {0}")]
    InvalidContentRef(String),

    /// Invalid target application package identifier
    #[error("Invalid target package: {0}")]
    InvalidPackage(String),

    /// Unknown marker key
    #[error("Unknown marker: {0}")]
    UnknownMarker(String),

    /// Unknown media kind
    #[error("Unknown media kind: {0}")]
    UnknownMediaKind(String),
}

/// Failures of orchestrator operations
///
/// Every variant is recovered locally by the orchestrator into a status
/// message; none of them is fatal and every operation can be retried.
/// The `Display` text is the user-facing message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum OrchestratorError {
    /// The privileged shell could not confirm superuser identity
    #[error("Root not available")]
    RootUnavailable,

    /// No media of the requested kind has been selected
    #[error("No {0} selected")]
    NoSelection(MediaKind),

    /// Private per-app directory mode is on but no target app is set
    #[error("Select a target app for private dir")]
    PrivateModeRequiresTarget,

    /// The selected content could not be copied into scratch storage
    #[error("Unable to read {kind}: {reason}")]
    StagingFailed {
        /// Kind of media being staged
        kind: MediaKind,
        /// Underlying failure description
        reason: String,
    },

    /// The privileged command ran and exited non-zero
    #[error("Shell command failed (exit {exit_code}): {stderr}")]
    ShellCommandFailed {
        /// Process exit code
        exit_code: i32,
        /// Captured standard error
        stderr: String,
    },

    /// The privileged process could not be started at all
    #[error("Unable to start privileged shell: {0}")]
    ProcessSpawnFailed(String),

    /// The privileged command exceeded the configured timeout
    #[error("Privileged command timed out after {seconds}s")]
    ShellTimedOut {
        /// Configured timeout in seconds
        seconds: u64,
    },
}

/// Failures while staging content into scratch storage
#[derive(Debug, Error)]
pub enum StagingError {
    /// The content locator does not point to readable content
    #[error("Content not found: {0}")]
    MissingSource(String),

    /// The content locator uses a scheme no resolver understands
    #[error("Unsupported content locator: {0}")]
    UnsupportedLocator(String),

    /// Copying into the scratch file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The content resolver reported an adapter-specific failure
    #[error("Content resolver failed: {0}")]
    Resolver(String),
}
