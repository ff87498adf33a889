//! Target command - Choose the target application
//!
//! Provides `camsync target set <package> [--label]` and
//! `camsync target clear`. The target decides the private per-app
//! directory when the private-directory marker is on. Changing it never
//! syncs; run `camsync sync auto` afterwards.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;
use camsync_core::domain::newtypes::{TargetApp, TargetPackage};
use camsync_core::ports::target_app::ITargetAppProvider;
use camsync_root::YamlSettingsStore;
use tracing::info;

use crate::context::load_config;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum TargetCommand {
    /// Set the target application
    Set {
        /// Package identifier (e.g. "com.example.app")
        package: TargetPackage,
        /// Human-readable label (defaults to the package)
        #[arg(long)]
        label: Option<String>,
    },
    /// Clear the target application
    Clear,
}

impl TargetCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let config = load_config(config_path)?;
        let store = YamlSettingsStore::open(config.settings.file.clone())
            .context("Failed to open settings store")?;

        match self {
            TargetCommand::Set { package, label } => {
                let app = match label {
                    Some(label) => TargetApp::new(package.clone(), label.clone()),
                    None => TargetApp::from_package(package.clone()),
                };
                info!(package = %package, "Setting target app");
                store.set_target(Some(app)).await?;
                formatter.success(&format!("Target app set to {package}"));
            }
            TargetCommand::Clear => {
                store.set_target(None).await?;
                formatter.success("Target app cleared");
            }
        }
        Ok(())
    }
}
