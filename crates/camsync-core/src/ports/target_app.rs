//! Target application provider port (driven/secondary port)
//!
//! Supplies the application the synced media is bound to. The orchestrator
//! subscribes to the stream and recomputes the active directory on every
//! change.

use tokio::sync::watch;

use crate::domain::newtypes::TargetApp;

/// Port trait for the selected target application
#[async_trait::async_trait]
pub trait ITargetAppProvider: Send + Sync {
    /// The currently selected target, if any
    fn current(&self) -> Option<TargetApp>;

    /// A stream of target selections
    fn subscribe(&self) -> watch::Receiver<Option<TargetApp>>;

    /// Selects a new target, or clears it with `None`
    async fn set_target(&self, target: Option<TargetApp>) -> anyhow::Result<()>;
}
