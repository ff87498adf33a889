//! Status command - Display orchestrator state
//!
//! Provides the `camsync status` CLI command which:
//! 1. Optionally probes root (and with it every marker file)
//! 2. Shows the base and active camera directories and the target app
//! 3. Shows the current video and image selections
//! 4. Lists marker presence

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use camsync_core::domain::media::PickedMedia;
use camsync_core::domain::state::{OrchestratorState, RootStatus};
use tracing::info;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Probe root and marker files before reporting
    #[arg(long)]
    pub probe: bool,
}

impl StatusCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let ctx = AppContext::open(config_path)?;
        let result = self.run(&ctx, format, formatter.as_ref()).await;
        ctx.shutdown().await;
        result
    }

    async fn run(
        &self,
        ctx: &AppContext,
        format: OutputFormat,
        formatter: &dyn OutputFormatter,
    ) -> Result<()> {
        if self.probe {
            // Unavailable root is part of the report, not a command failure.
            if let Err(e) = ctx.orchestrator.refresh_root_status().await {
                info!(error = %e, "Root probe failed");
            }
        }

        let state = ctx.orchestrator.snapshot();
        if format.is_json() {
            let json = serde_json::to_value(&state).context("Failed to serialize state")?;
            formatter.print_json(&json);
        } else {
            print_state(&state, self.probe, formatter);
        }
        Ok(())
    }
}

fn print_state(state: &OrchestratorState, probed: bool, formatter: &dyn OutputFormatter) {
    match state.root {
        RootStatus::Available => formatter.success("Root available"),
        RootStatus::Unavailable => formatter.warn("Root not available"),
        RootStatus::Unknown => formatter.info("Root not probed (use --probe)"),
    }

    formatter.field("Base directory", &state.base_directory().display().to_string());
    formatter.field(
        "Active directory",
        &state.active_directory().display().to_string(),
    );
    formatter.field(
        "Target app",
        &state
            .target_app
            .as_ref()
            .map_or_else(|| "none".to_string(), |t| format!("{} ({})", t.label, t.package)),
    );
    formatter.field("Video", &describe(state.video.as_ref()));
    formatter.field("Image", &describe(state.image.as_ref()));

    if let Some(synced) = &state.last_synced {
        formatter.field(
            "Last synced",
            &format!(
                "{} -> {} at {}",
                synced.kind,
                synced.destination_path.display(),
                synced.synced_at.format("%Y-%m-%d %H:%M:%S")
            ),
        );
    }

    if probed {
        formatter.info("");
        formatter.info("Markers:");
        for (marker, present) in state.markers.iter() {
            let mark = if present { "\u{2713}" } else { "-" };
            formatter.info(&format!("  {mark} {:<22} {}", marker.key(), marker.file_name()));
        }
    }

    if let Some(message) = &state.message {
        if message.is_error {
            formatter.warn(&message.text);
        }
    }
}

fn describe(media: Option<&PickedMedia>) -> String {
    match media {
        None => "none".to_string(),
        Some(m) => match &m.display_name {
            Some(name) => format!("{name} ({})", m.content),
            None => m.content.to_string(),
        },
    }
}
