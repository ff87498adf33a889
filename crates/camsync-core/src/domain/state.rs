//! Orchestrator state record
//!
//! A single aggregate describing everything observers may display: root
//! capability, the camera directory inputs and the derived active directory,
//! the current selections, marker presence, the busy flag, the last status
//! message, and the last synced record.
//!
//! ## Invariants
//!
//! - `active_directory` is private and only changes through
//!   [`OrchestratorState::reconcile_active_directory`], which recomputes it
//!   from the current inputs. The state container calls it after every
//!   mutation, before publishing, so observers never see a stale value.
//! - The private-mode flag has exactly one home: the marker map.
//! - Presence bits of markers stored in the active directory describe the
//!   current active directory. Inputs that move it go through
//!   [`OrchestratorState::invalidate_moved_markers`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use super::directory::{resolve_active_directory, CameraDirectoryConfig};
use super::marker::{Marker, MarkerStates};
use super::media::{MediaKind, PickedMedia, SyncedMedia};
use super::newtypes::{TargetApp, TargetPackage};

/// Cached result of the root probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RootStatus {
    /// Not probed yet
    #[default]
    Unknown,
    /// Last probe failed
    Unavailable,
    /// Last probe or privileged command succeeded
    Available,
}

impl RootStatus {
    /// Maps a probe outcome to a status
    #[must_use]
    pub fn from_probe(available: bool) -> Self {
        if available {
            RootStatus::Available
        } else {
            RootStatus::Unavailable
        }
    }

    #[must_use]
    pub fn is_available(self) -> bool {
        matches!(self, RootStatus::Available)
    }
}

/// The most recent user-facing status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// A change of the active directory, reported once per actual change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryChange {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Aggregate state owned by the orchestrator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrchestratorState {
    pub root: RootStatus,
    base_directory: PathBuf,
    active_directory: PathBuf,
    pub target_app: Option<TargetApp>,
    pub video: Option<PickedMedia>,
    pub image: Option<PickedMedia>,
    pub markers: MarkerStates,
    pub busy: bool,
    pub message: Option<StatusMessage>,
    pub last_synced: Option<SyncedMedia>,
}

impl OrchestratorState {
    /// Startup state: root unknown, nothing selected, all markers absent
    pub fn new(base_directory: impl Into<PathBuf>) -> Self {
        let base_directory = base_directory.into();
        Self {
            root: RootStatus::Unknown,
            active_directory: base_directory.clone(),
            base_directory,
            target_app: None,
            video: None,
            image: None,
            markers: MarkerStates::new(),
            busy: false,
            message: None,
            last_synced: None,
        }
    }

    /// The fixed base directory
    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// The directory derived from the current inputs
    #[must_use]
    pub fn active_directory(&self) -> &Path {
        &self.active_directory
    }

    #[must_use]
    pub fn private_mode_enabled(&self) -> bool {
        self.markers.get(Marker::PrivatePerAppDirectory)
    }

    #[must_use]
    pub fn target_package(&self) -> Option<&TargetPackage> {
        self.target_app.as_ref().map(|t| &t.package)
    }

    /// The current inputs to directory derivation
    #[must_use]
    pub fn directory_config(&self) -> CameraDirectoryConfig {
        CameraDirectoryConfig {
            base: self.base_directory.clone(),
            private_mode_enabled: self.private_mode_enabled(),
            target_package: self.target_package().cloned(),
        }
    }

    /// Current selection for a media kind
    #[must_use]
    pub fn picked(&self, kind: MediaKind) -> Option<&PickedMedia> {
        match kind {
            MediaKind::Video => self.video.as_ref(),
            MediaKind::Image => self.image.as_ref(),
        }
    }

    /// Replace the selection for a media kind
    pub fn set_picked(&mut self, kind: MediaKind, media: Option<PickedMedia>) {
        match kind {
            MediaKind::Video => self.video = media,
            MediaKind::Image => self.image = media,
        }
    }

    /// Recompute the active directory from the current inputs
    ///
    /// Returns the change only when the derived value differs from the
    /// previous one.
    pub fn reconcile_active_directory(&mut self) -> Option<DirectoryChange> {
        let resolved = resolve_active_directory(&self.directory_config());
        if resolved == self.active_directory {
            return None;
        }
        let from = std::mem::replace(&mut self.active_directory, resolved.clone());
        Some(DirectoryChange { from, to: resolved })
    }

    /// Resets markers stored in the active directory when their directory moves
    ///
    /// Call after changing the directory inputs and before the state is
    /// published. Returns whether the active directory is about to change;
    /// the reset markers stay absent until probed in the new location.
    pub fn invalidate_moved_markers(&mut self) -> bool {
        if resolve_active_directory(&self.directory_config()) == self.active_directory {
            return false;
        }
        for marker in Marker::ALL.into_iter().filter(|m| !m.is_directory_input()) {
            self.markers.set(marker, false);
        }
        true
    }

    /// The selection a session uses: the video when one is picked, else the image
    #[must_use]
    pub fn preferred_selection(&self) -> Option<(MediaKind, &PickedMedia)> {
        self.video
            .as_ref()
            .map(|media| (MediaKind::Video, media))
            .or_else(|| self.image.as_ref().map(|media| (MediaKind::Image, media)))
    }

    /// Whether the last sync no longer matches the preferred selection
    ///
    /// True when nothing has been synced yet, when the preferred selection
    /// differs in kind or content from the synced one, or when private mode
    /// is on and the last sync was bound to a different target.
    #[must_use]
    pub fn needs_resync(&self) -> bool {
        let Some(synced) = &self.last_synced else {
            return true;
        };
        let selection_changed = self
            .preferred_selection()
            .is_some_and(|(kind, media)| kind != synced.kind || media.content != synced.content);
        let target_changed =
            self.private_mode_enabled() && synced.target_package.as_ref() != self.target_package();
        selection_changed || target_changed
    }
}
