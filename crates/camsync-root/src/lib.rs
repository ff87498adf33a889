//! camsync-root - Privileged sync orchestration
//!
//! This crate drives the root shell on behalf of the user:
//! - `shell`: root shell adapter and argument quoting
//! - `staging`: scratch copies of user-selected content
//! - `content`: local file content resolver
//! - `markers`: marker file commands and probing
//! - `broadcaster`: observable orchestrator state
//! - `orchestrator`: the operations exposed to front-ends
//! - `settings`: YAML-backed selection and target persistence

pub mod broadcaster;
pub mod content;
pub mod markers;
pub mod orchestrator;
pub mod settings;
pub mod shell;
pub mod staging;

pub use broadcaster::StateBroadcaster;
pub use content::LocalContentResolver;
pub use markers::MarkerRegistry;
pub use orchestrator::{OperationResult, OrchestratorPorts, SyncOrchestrator};
pub use settings::YamlSettingsStore;
pub use shell::{shell_quote, SuShell};
pub use staging::{MediaStagingService, ScratchFile, SCRATCH_PREFIX};
