//! Marker file registry
//!
//! Builds the privileged commands that create, delete and probe marker
//! files, and knows which directory each marker lives in.
//!
//! Directory-input markers (the private-directory marker) always live in the
//! base directory, since they decide what the active directory is. Every
//! other marker lives in the active directory.

use std::path::{Path, PathBuf};

use camsync_core::domain::directory::{resolve_active_directory, CameraDirectoryConfig};
use camsync_core::domain::marker::{Marker, MarkerStates};
use camsync_core::ports::privileged_shell::IPrivilegedShell;
use tracing::debug;

use crate::shell::quote_path;

/// Stateless helpers for marker files
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkerRegistry;

impl MarkerRegistry {
    /// Directory a marker file lives in for the given inputs
    #[must_use]
    pub fn marker_directory(marker: Marker, config: &CameraDirectoryConfig) -> PathBuf {
        if marker.is_directory_input() {
            config.base.clone()
        } else {
            resolve_active_directory(config)
        }
    }

    /// Full path of a marker file inside `dir`
    #[must_use]
    pub fn marker_path(marker: Marker, dir: &Path) -> PathBuf {
        dir.join(marker.file_name())
    }

    /// Command that creates or deletes a marker file
    ///
    /// Creation makes the directory, touches the file and sets mode 644.
    /// Deletion is `rm -f`, so removing an absent marker succeeds.
    #[must_use]
    pub fn build_toggle_command(marker: Marker, enabled: bool, dir: &Path) -> String {
        let path = quote_path(&Self::marker_path(marker, dir));
        if enabled {
            format!(
                "mkdir -p {} && touch {path} && chmod 644 {path}",
                quote_path(dir)
            )
        } else {
            format!("rm -f {path}")
        }
    }

    /// Command that exits zero when the marker file exists
    #[must_use]
    pub fn build_probe_command(marker: Marker, dir: &Path) -> String {
        format!("test -f {}", quote_path(&Self::marker_path(marker, dir)))
    }

    /// Probes one marker in `dir`
    pub async fn probe(shell: &dyn IPrivilegedShell, marker: Marker, dir: &Path) -> bool {
        shell
            .run(&Self::build_probe_command(marker, dir))
            .await
            .success
    }

    /// Probes every marker
    ///
    /// Directory-input markers are probed first in the base directory; the
    /// remaining markers are then probed in the active directory those
    /// results imply.
    pub async fn refresh_all(
        shell: &dyn IPrivilegedShell,
        config: &CameraDirectoryConfig,
    ) -> MarkerStates {
        let mut states = MarkerStates::new();

        for marker in Marker::ALL.into_iter().filter(|m| m.is_directory_input()) {
            states.set(marker, Self::probe(shell, marker, &config.base).await);
        }

        let effective = CameraDirectoryConfig {
            base: config.base.clone(),
            private_mode_enabled: states.get(Marker::PrivatePerAppDirectory),
            target_package: config.target_package.clone(),
        };
        let active = resolve_active_directory(&effective);

        for marker in Marker::ALL.into_iter().filter(|m| !m.is_directory_input()) {
            states.set(marker, Self::probe(shell, marker, &active).await);
        }

        debug!(active = %active.display(), "Marker states refreshed");
        states
    }
}
