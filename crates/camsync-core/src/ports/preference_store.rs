//! Preference store port (driven/secondary port)
//!
//! Persists the last picked video and image, and the record of the last
//! successful sync, so they survive restarts. The orchestrator reads the
//! stored selections through a `watch` stream and writes through the save
//! methods when the user selects new media or a sync completes.

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::domain::media::{MediaKind, PickedMedia, SyncedMedia};

/// Persisted media selections
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaPreferences {
    pub video: Option<PickedMedia>,
    pub image: Option<PickedMedia>,
}

impl MediaPreferences {
    /// The stored selection for a media kind
    #[must_use]
    pub fn get(&self, kind: MediaKind) -> Option<&PickedMedia> {
        match kind {
            MediaKind::Video => self.video.as_ref(),
            MediaKind::Image => self.image.as_ref(),
        }
    }
}

/// Port trait for persisted media selections
#[async_trait::async_trait]
pub trait IPreferenceStore: Send + Sync {
    /// The currently stored selections
    fn load(&self) -> MediaPreferences;

    /// A stream of stored selections, updated on every save
    fn subscribe(&self) -> watch::Receiver<MediaPreferences>;

    /// Persists the video selection
    async fn save_video(&self, media: &PickedMedia) -> anyhow::Result<()>;

    /// Persists the image selection
    async fn save_image(&self, media: &PickedMedia) -> anyhow::Result<()>;

    /// The stored record of the last successful sync
    fn last_synced(&self) -> Option<SyncedMedia>;

    /// Replaces the stored record of the last successful sync
    async fn save_last_synced(&self, synced: &SyncedMedia) -> anyhow::Result<()>;

    /// Persists the selection for `kind`
    async fn save(&self, kind: MediaKind, media: &PickedMedia) -> anyhow::Result<()> {
        match kind {
            MediaKind::Video => self.save_video(media).await,
            MediaKind::Image => self.save_image(media).await,
        }
    }
}
