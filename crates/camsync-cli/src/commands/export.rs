//! Export-logs command - Publish the debug log
//!
//! Provides `camsync export-logs`, which copies the debug log file to the
//! configured export directory through the root shell.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Args)]
pub struct ExportLogsCommand {}

impl ExportLogsCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format);
        let ctx = AppContext::open(config_path)?;

        ctx.flush_logs().await;
        let result = ctx.orchestrator.export_logs().await;
        ctx.shutdown().await;

        formatter.status(&result?);
        Ok(())
    }
}
