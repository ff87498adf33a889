//! YAML settings store (secondary/driven adapter)
//!
//! Persists the picked media, the last sync record and the target
//! application to one YAML file, and implements both [`IPreferenceStore`] and
//! [`ITargetAppProvider`] on top of it. Each save rewrites the whole file
//! through a temporary file and a rename, then pushes the new value to
//! subscribers.

use std::path::{Path, PathBuf};

use anyhow::Context;
use camsync_core::domain::media::{PickedMedia, SyncedMedia};
use camsync_core::domain::newtypes::TargetApp;
use camsync_core::ports::preference_store::{IPreferenceStore, MediaPreferences};
use camsync_core::ports::target_app::ITargetAppProvider;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};
use tracing::{debug, instrument};

/// On-disk layout of the settings file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredSettings {
    pub video: Option<PickedMedia>,
    pub image: Option<PickedMedia>,
    pub last_synced: Option<SyncedMedia>,
    pub target: Option<TargetApp>,
}

impl StoredSettings {
    fn preferences(&self) -> MediaPreferences {
        MediaPreferences {
            video: self.video.clone(),
            image: self.image.clone(),
        }
    }
}

/// Selection and target persistence backed by a YAML file
pub struct YamlSettingsStore {
    path: PathBuf,
    settings: Mutex<StoredSettings>,
    prefs_tx: watch::Sender<MediaPreferences>,
    synced_tx: watch::Sender<Option<SyncedMedia>>,
    target_tx: watch::Sender<Option<TargetApp>>,
}

impl YamlSettingsStore {
    /// Opens the store, reading the file if it exists
    ///
    /// A missing file starts empty; a malformed one is an error.
    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let settings = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
            if content.trim().is_empty() {
                StoredSettings::default()
            } else {
                serde_yaml::from_str(&content)
                    .with_context(|| format!("Failed to parse settings file: {}", path.display()))?
            }
        } else {
            StoredSettings::default()
        };

        let (prefs_tx, _) = watch::channel(settings.preferences());
        let (synced_tx, _) = watch::channel(settings.last_synced.clone());
        let (target_tx, _) = watch::channel(settings.target.clone());

        Ok(Self {
            path,
            settings: Mutex::new(settings),
            prefs_tx,
            synced_tx,
            target_tx,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `mutate` to the stored settings and writes them out
    ///
    /// Subscribers are only notified after the file is written.
    async fn modify(&self, mutate: impl FnOnce(&mut StoredSettings)) -> anyhow::Result<StoredSettings> {
        let mut guard = self.settings.lock().await;
        let mut next = guard.clone();
        mutate(&mut next);
        self.persist(&next).await?;
        *guard = next.clone();
        Ok(next)
    }

    #[instrument(skip(self, settings), fields(path = %self.path.display()))]
    async fn persist(&self, settings: &StoredSettings) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(settings).context("Failed to serialize settings")?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, yaml)
            .await
            .with_context(|| format!("Failed to write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        debug!("Settings saved");
        Ok(())
    }
}

#[async_trait::async_trait]
impl IPreferenceStore for YamlSettingsStore {
    fn load(&self) -> MediaPreferences {
        self.prefs_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<MediaPreferences> {
        self.prefs_tx.subscribe()
    }

    async fn save_video(&self, media: &PickedMedia) -> anyhow::Result<()> {
        let media = media.clone();
        let saved = self.modify(|s| s.video = Some(media)).await?;
        self.prefs_tx.send_replace(saved.preferences());
        Ok(())
    }

    async fn save_image(&self, media: &PickedMedia) -> anyhow::Result<()> {
        let media = media.clone();
        let saved = self.modify(|s| s.image = Some(media)).await?;
        self.prefs_tx.send_replace(saved.preferences());
        Ok(())
    }

    fn last_synced(&self) -> Option<SyncedMedia> {
        self.synced_tx.borrow().clone()
    }

    async fn save_last_synced(&self, synced: &SyncedMedia) -> anyhow::Result<()> {
        let synced = synced.clone();
        let saved = self.modify(|s| s.last_synced = Some(synced)).await?;
        self.synced_tx.send_replace(saved.last_synced);
        Ok(())
    }
}

#[async_trait::async_trait]
impl ITargetAppProvider for YamlSettingsStore {
    fn current(&self) -> Option<TargetApp> {
        self.target_tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<TargetApp>> {
        self.target_tx.subscribe()
    }

    async fn set_target(&self, target: Option<TargetApp>) -> anyhow::Result<()> {
        let saved = self.modify(|s| s.target = target).await?;
        self.target_tx.send_replace(saved.target);
        Ok(())
    }
}
