//! Picked and synced media records
//!
//! `PickedMedia` is the user's current selection for a media kind; it is only
//! ever replaced wholesale. `SyncedMedia` is the immutable provenance record
//! created by a successful sync.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{ContentRef, TargetPackage};

/// The two kinds of media that can be synced into the camera directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Video,
    Image,
}

impl MediaKind {
    /// Both kinds, in sync-preference order
    pub const ALL: [MediaKind; 2] = [MediaKind::Video, MediaKind::Image];

    /// Suffix of the scratch file used while staging this kind
    #[must_use]
    pub const fn staging_suffix(self) -> &'static str {
        match self {
            MediaKind::Video => ".mp4",
            MediaKind::Image => ".bmp",
        }
    }

    /// Fixed filename the external hook reads inside the active directory
    #[must_use]
    pub const fn destination_file_name(self) -> &'static str {
        match self {
            MediaKind::Video => "virtual.mp4",
            MediaKind::Image => "1000.bmp",
        }
    }

    /// Capitalized name for status messages
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            MediaKind::Video => "Video",
            MediaKind::Image => "Image",
        }
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            MediaKind::Video => "video",
            MediaKind::Image => "image",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MediaKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "video" => Ok(MediaKind::Video),
            "image" => Ok(MediaKind::Image),
            other => Err(DomainError::UnknownMediaKind(other.to_string())),
        }
    }
}

/// A user-selected piece of content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickedMedia {
    /// Opaque locator handed to the content resolver when staging
    pub content: ContentRef,
    /// Name shown to the user, if known
    pub display_name: Option<String>,
}

impl PickedMedia {
    /// Create a selection, dropping blank display names
    pub fn new(content: ContentRef, display_name: Option<String>) -> Self {
        let display_name = display_name.filter(|name| !name.trim().is_empty());
        Self {
            content,
            display_name,
        }
    }
}

/// Provenance of the most recent successful sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncedMedia {
    pub kind: MediaKind,
    /// Locator of the selection that was copied
    pub content: ContentRef,
    pub display_name: Option<String>,
    pub synced_at: DateTime<Utc>,
    /// Absolute path of the file written inside the active directory
    pub destination_path: PathBuf,
    /// Target package that was selected when the sync ran
    pub target_package: Option<TargetPackage>,
}
