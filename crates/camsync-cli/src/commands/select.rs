//! Select command - Choose the media to sync
//!
//! Provides `camsync select video|image <content> [--name]`. Plain paths are
//! made absolute against the working directory; URIs are kept as given.
//! The selection is stored in the settings file and used by later syncs.

use std::path::Path;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use camsync_core::domain::media::MediaKind;
use camsync_core::domain::newtypes::ContentRef;

use crate::context::AppContext;
use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum SelectCommand {
    /// Select the video synced as virtual.mp4
    Video(SelectArgs),
    /// Select the image synced as 1000.bmp
    Image(SelectArgs),
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// File path or file:// URI
    pub content: String,
    /// Display name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,
}

impl SelectCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let (kind, args) = match self {
            SelectCommand::Video(args) => (MediaKind::Video, args),
            SelectCommand::Image(args) => (MediaKind::Image, args),
        };
        let formatter = get_formatter(format);

        let content = content_ref(&args.content)?;
        let name = args.name.clone().or_else(|| default_name(&content));

        let ctx = AppContext::open(config_path)?;
        let result = ctx.orchestrator.select(kind, content, name).await;
        ctx.shutdown().await;

        formatter.status(&result?);
        Ok(())
    }
}

/// Builds a content reference, resolving relative paths
fn content_ref(raw: &str) -> Result<ContentRef> {
    if raw.contains("://") || Path::new(raw).is_absolute() {
        return Ok(ContentRef::new(raw)?);
    }
    let absolute = std::env::current_dir()
        .context("Failed to read working directory")?
        .join(raw);
    Ok(ContentRef::new(absolute.to_string_lossy())?)
}

fn default_name(content: &ContentRef) -> Option<String> {
    content
        .as_str()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
