//! Config command - View and validate camsync configuration
//!
//! Provides the `camsync config` CLI command which:
//! 1. Shows the effective configuration (YAML or JSON)
//! 2. Validates the configuration file and reports every error
//! 3. Prints the configuration file path

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use camsync_core::config::Config;
use tracing::info;

use crate::output::{get_formatter, OutputFormat};

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display the effective configuration
    Show,
    /// Validate the configuration file
    Validate,
    /// Print the configuration file path
    Path,
}

impl ConfigCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => execute_show(config_path, format),
            ConfigCommand::Validate => execute_validate(config_path, format),
            ConfigCommand::Path => {
                let formatter = get_formatter(format);
                if format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "path": config_path.display().to_string(),
                        "exists": config_path.exists(),
                    }));
                } else {
                    println!("{}", config_path.display());
                }
                Ok(())
            }
        }
    }
}

fn execute_show(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);
    let config = Config::load_or_default(config_path);

    info!(config_path = %config_path.display(), "Showing configuration");

    if format.is_json() {
        let json =
            serde_json::to_value(&config).context("Failed to serialize configuration to JSON")?;
        formatter.print_json(&json);
    } else {
        formatter.success(&format!("Configuration ({})", config_path.display()));
        if !config_path.exists() {
            formatter.info("(file not found, showing defaults)");
        }
        formatter.info("");

        let yaml =
            serde_yaml::to_string(&config).context("Failed to serialize configuration to YAML")?;
        for line in yaml.lines() {
            formatter.info(line);
        }
    }
    Ok(())
}

fn execute_validate(config_path: &Path, format: OutputFormat) -> Result<()> {
    let formatter = get_formatter(format);

    if !config_path.exists() {
        bail!("Configuration file not found: {}", config_path.display());
    }
    let config = Config::load(config_path)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    let errors = config.validate();

    if format.is_json() {
        let list: Vec<_> = errors
            .iter()
            .map(|e| serde_json::json!({"field": e.field, "message": e.message}))
            .collect();
        formatter.print_json(&serde_json::json!({
            "valid": errors.is_empty(),
            "path": config_path.display().to_string(),
            "errors": list,
        }));
    } else if errors.is_empty() {
        formatter.success(&format!("Configuration is valid ({})", config_path.display()));
    } else {
        for error in &errors {
            formatter.info(&format!("{}: {}", error.field, error.message));
        }
    }

    if !errors.is_empty() {
        bail!("{} configuration error(s)", errors.len());
    }
    Ok(())
}
