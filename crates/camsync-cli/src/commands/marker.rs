//! Marker command - Inspect and toggle marker files
//!
//! Provides the `camsync marker` CLI command which:
//! 1. Lists every marker with its file name and location
//! 2. Probes the marker files through the root shell
//! 3. Creates or removes one marker file

use std::path::Path;

use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use camsync_core::domain::marker::{Marker, MarkerStates};

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat, OutputFormatter};

#[derive(Debug, Subcommand)]
pub enum MarkerCommand {
    /// List the known markers
    List,
    /// Probe which marker files exist
    Refresh,
    /// Create or remove a marker file
    Set {
        /// Marker key (e.g. "suppress-toasts") or file name (e.g. "no_toast.jpg")
        marker: Marker,
        /// New state
        #[arg(value_enum)]
        state: Switch,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

impl MarkerCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        if let MarkerCommand::List = self {
            list_markers(format, formatter.as_ref());
            return Ok(());
        }

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
        match self {
            MarkerCommand::List => Ok(()),
            MarkerCommand::Refresh => {
                ctx.orchestrator.refresh_markers().await?;
                print_states(&ctx.orchestrator.snapshot().markers, format, formatter);
                Ok(())
            }
            MarkerCommand::Set { marker, state } => {
                // Marker location depends on the private-directory marker.
                ctx.prepare().await?;
                let message = ctx
                    .orchestrator
                    .set_marker(*marker, *state == Switch::On)
                    .await?;
                formatter.status(&message);
                Ok(())
            }
        }
    }
}

fn location(marker: Marker) -> &'static str {
    if marker.is_directory_input() {
        "base"
    } else {
        "active"
    }
}

fn list_markers(format: OutputFormat, formatter: &dyn OutputFormatter) {
    if format.is_json() {
        let markers: Vec<_> = Marker::ALL
            .into_iter()
            .map(|m| {
                serde_json::json!({
                    "key": m.key(),
                    "file": m.file_name(),
                    "label": m.label(),
                    "description": m.description(),
                    "directory": location(m),
                })
            })
            .collect();
        formatter.print_json(&serde_json::Value::Array(markers));
        return;
    }

    for marker in Marker::ALL {
        formatter.info(&format!(
            "{:<22} {:<16} {:<7} {}",
            marker.key(),
            marker.file_name(),
            location(marker),
            marker.description()
        ));
    }
}

fn print_states(states: &MarkerStates, format: OutputFormat, formatter: &dyn OutputFormatter) {
    if format.is_json() {
        let json = serde_json::to_value(states).unwrap_or_default();
        formatter.print_json(&json);
        return;
    }

    for (marker, present) in states.iter() {
        let state = if present { "on" } else { "off" };
        formatter.field(marker.label(), state);
    }
}
