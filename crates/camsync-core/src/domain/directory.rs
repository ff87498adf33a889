//! Active camera directory derivation
//!
//! The active directory is never stored independently of its inputs. It is
//! always the output of [`resolve_active_directory`] applied to the current
//! [`CameraDirectoryConfig`].

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::newtypes::TargetPackage;

/// Inputs to active directory derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraDirectoryConfig {
    /// Process-wide base directory the hook reads from
    pub base: PathBuf,
    /// Whether media lives in a per-target-app subdirectory
    pub private_mode_enabled: bool,
    /// Currently selected target application, if any
    pub target_package: Option<TargetPackage>,
}

impl CameraDirectoryConfig {
    /// Config with private mode off and no target
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            private_mode_enabled: false,
            target_package: None,
        }
    }

    /// The directory derived from this config
    #[must_use]
    pub fn active_directory(&self) -> PathBuf {
        resolve_active_directory(self)
    }
}

/// Map a directory config to the single active directory
///
/// `base/<target>` when private mode is on and a target is set, otherwise
/// `base`. Pure: no I/O, no state.
#[must_use]
pub fn resolve_active_directory(config: &CameraDirectoryConfig) -> PathBuf {
    match (&config.target_package, config.private_mode_enabled) {
        (Some(target), true) => config.base.join(target.as_str()),
        _ => config.base.clone(),
    }
}
