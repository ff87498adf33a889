//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. The orchestrator depends on these interfaces;
//! their implementations live in adapter crates or in the embedding
//! application.
//!
//! ## Ports Overview
//!
//! - [`IPrivilegedShell`] - Root-elevated shell command execution
//! - [`IContentResolver`] - Opening opaque content locators for staging
//! - [`IPreferenceStore`] - Persisted media selections
//! - [`ITargetAppProvider`] - The currently selected target application
//! - [`IRootStatusListener`] - Consumers of root availability
//! - [`ILogSink`] - Fire-and-forget structured event recording

pub mod content_resolver;
pub mod log_sink;
pub mod preference_store;
pub mod privileged_shell;
pub mod root_status;
pub mod target_app;

pub use content_resolver::{ContentReader, IContentResolver};
pub use log_sink::{ILogSink, NullLogSink};
pub use preference_store::{IPreferenceStore, MediaPreferences};
pub use privileged_shell::{IPrivilegedShell, ShellOutput};
pub use root_status::{IRootStatusListener, NoopRootStatusListener};
pub use target_app::ITargetAppProvider;
