//! Sync command - Copy the selected media into the camera directory
//!
//! Provides `camsync sync video|image|auto`. Root and the marker states are
//! refreshed first so the private per-app directory is honoured. `auto`
//! syncs the video when one is selected, otherwise the image.

use std::path::Path;

use anyhow::Result;
use clap::{Args, ValueEnum};
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct SyncCommand {
    /// What to sync
    #[arg(value_enum)]
    pub what: SyncWhat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SyncWhat {
    Video,
    Image,
    Auto,
}

impl SyncCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let ctx = AppContext::open(config_path)?;
        let result = self.run(&ctx, format).await;
        ctx.shutdown().await;
        result
    }

    async fn run(&self, ctx: &AppContext, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        ctx.prepare().await?;

        info!(what = ?self.what, "Starting sync");
        let message = match self.what {
            SyncWhat::Video => ctx.orchestrator.sync_video().await?,
            SyncWhat::Image => ctx.orchestrator.sync_image().await?,
            SyncWhat::Auto => ctx.orchestrator.ensure_synced().await?,
        };

        let state = ctx.orchestrator.snapshot();
        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "message": message.text,
                "synced": state.last_synced,
            }));
        } else {
            formatter.status(&message);
            if let Some(synced) = &state.last_synced {
                formatter.field("Destination", &synced.destination_path.display().to_string());
            }
        }
        Ok(())
    }
}
