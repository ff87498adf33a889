//! camsync CLI - Command-line front-end for the privileged sync orchestrator
//!
//! Provides commands for:
//! - Checking root and marker status
//! - Selecting the video and image to sync
//! - Syncing media into the camera directory
//! - Toggling marker files
//! - Choosing the target application
//! - Exporting the debug log

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod context;
mod output;

use camsync_core::config::Config;
use commands::{
    config::ConfigCommand, export::ExportLogsCommand, marker::MarkerCommand,
    select::SelectCommand, status::StatusCommand, sync::SyncCommand, target::TargetCommand,
};
use output::{get_formatter, OutputFormat};

#[derive(Debug, Parser)]
#[command(
    name = "camsync",
    version,
    about = "Sync media and marker files into the virtual camera directory"
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Use alternate config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show root, directory, selection and marker status
    Status(StatusCommand),
    /// Select the video or image to sync
    #[command(subcommand)]
    Select(SelectCommand),
    /// Copy the selected media into the camera directory
    Sync(SyncCommand),
    /// List, refresh or toggle marker files
    #[command(subcommand)]
    Marker(MarkerCommand),
    /// Choose the target application
    #[command(subcommand)]
    Target(TargetCommand),
    /// Copy the debug log to the export directory
    ExportLogs(ExportLogsCommand),
    /// View and validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let config_path = cli.config.unwrap_or_else(Config::default_path);

    let result = match cli.command {
        Commands::Status(cmd) => cmd.execute(&config_path, format).await,
        Commands::Select(cmd) => cmd.execute(&config_path, format).await,
        Commands::Sync(cmd) => cmd.execute(&config_path, format).await,
        Commands::Marker(cmd) => cmd.execute(&config_path, format).await,
        Commands::Target(cmd) => cmd.execute(&config_path, format).await,
        Commands::ExportLogs(cmd) => cmd.execute(&config_path, format).await,
        Commands::Config(cmd) => cmd.execute(&config_path, format).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            get_formatter(format).error(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
