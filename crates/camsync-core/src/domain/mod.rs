//! Domain entities and business logic
//!
//! This module contains the core domain types for camsync:
//! - Newtypes for validated identifiers (`ContentRef`, `TargetPackage`)
//! - Marker file definitions
//! - Picked and synced media records
//! - Active directory derivation
//! - The orchestrator state record
//! - Log records consumed by the log sink port
//! - Domain-specific error types

pub mod directory;
pub mod errors;
pub mod log;
pub mod marker;
pub mod media;
pub mod newtypes;
pub mod state;

// Re-export commonly used types
pub use directory::{resolve_active_directory, CameraDirectoryConfig};
pub use errors::{DomainError, OrchestratorError, StagingError};
pub use log::{LogLevel, LogRecord};
pub use marker::{Marker, MarkerStates};
pub use media::{MediaKind, PickedMedia, SyncedMedia};
pub use newtypes::{ContentRef, TargetApp, TargetPackage};
pub use state::{DirectoryChange, OrchestratorState, RootStatus, StatusMessage};
