//! Adapter wiring shared by the commands
//!
//! Loads and validates the configuration, starts the debug log writer and
//! builds a [`SyncOrchestrator`] over the real adapters.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use camsync_core::config::Config;
use camsync_core::ports::log_sink::ILogSink;
use camsync_core::ports::root_status::NoopRootStatusListener;
use camsync_log::{CompositeLogSink, FileLogSink, TracingLogSink};
use camsync_root::{
    LocalContentResolver, OrchestratorPorts, SuShell, SyncOrchestrator,
    YamlSettingsStore,
};
use tokio::task::JoinHandle;
use tracing::debug;

/// Loads the configuration at `path`, or defaults when the file is absent
///
/// Fails on unreadable or malformed files and on validation errors.
pub fn load_config(path: &Path) -> Result<Config> {
    let config = if path.exists() {
        Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?
    } else {
        debug!(path = %path.display(), "No configuration file, using defaults");
        Config::default()
    };

    let errors = config.validate();
    if !errors.is_empty() {
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration: {}", messages.join("; "));
    }
    Ok(config)
}

/// Everything a command needs to run orchestrator operations
pub struct AppContext {
    pub config: Config,
    pub orchestrator: Arc<SyncOrchestrator>,
    pub settings: Arc<YamlSettingsStore>,
    file_log: FileLogSink,
    writer: JoinHandle<()>,
}

impl AppContext {
    pub fn open(config_path: &Path) -> Result<Self> {
        let config = load_config(config_path)?;

        let (file_log, writer) = FileLogSink::spawn(config.logging.file.clone());
        let log_sink: Arc<dyn ILogSink> = Arc::new(CompositeLogSink::new(vec![
            Arc::new(file_log.clone()),
            Arc::new(TracingLogSink),
        ]));

        let settings = Arc::new(
            YamlSettingsStore::open(config.settings.file.clone())
                .context("Failed to open settings store")?,
        );

        let orchestrator = SyncOrchestrator::new(
            OrchestratorPorts {
                shell: Arc::new(SuShell::from_config(&config.shell, Arc::clone(&log_sink))),
                resolver: Arc::new(LocalContentResolver::new()),
                preferences: settings.clone(),
                targets: settings.clone(),
                root_listener: Arc::new(NoopRootStatusListener),
                log_sink,
            },
            &config,
        );

        Ok(Self {
            config,
            orchestrator: Arc::new(orchestrator),
            settings,
            file_log,
            writer,
        })
    }

    /// Confirms root and loads the marker states
    ///
    /// Sync and marker commands need the private-directory marker to know
    /// where to write, so they call this first.
    pub async fn prepare(&self) -> Result<()> {
        self.orchestrator.refresh_root_status().await?;
        Ok(())
    }

    /// Waits until every queued log line is on disk
    pub async fn flush_logs(&self) {
        self.file_log.flush().await;
    }

    /// Flushes the debug log and stops the writer
    pub async fn shutdown(self) {
        self.file_log.flush().await;
        self.writer.abort();
    }
}

