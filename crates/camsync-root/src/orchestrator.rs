//! Sync orchestrator
//!
//! Sequences the privileged shell, the staging service and the marker
//! registry into the operations front-ends call: root probing, media
//! selection, the two sync workflows, marker toggles and log export.
//!
//! ## Concurrency
//!
//! Every operation that runs privileged commands holds `op_lock` for its
//! whole duration, so at most one privileged command sequence runs at a
//! time and `busy` reflects exclusive ownership. Selection, root probing and
//! pushed updates do not take the lock.
//!
//! ## Results
//!
//! Operations return `Result<StatusMessage, OrchestratorError>`. Mutating
//! operations also publish their outcome as `state.message`; read-only
//! refreshes only publish failures.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use camsync_core::config::Config;
use camsync_core::domain::directory::resolve_active_directory;
use camsync_core::domain::errors::OrchestratorError;
use camsync_core::domain::log::{LogLevel, LogRecord};
use camsync_core::domain::marker::Marker;
use camsync_core::domain::media::{MediaKind, PickedMedia, SyncedMedia};
use camsync_core::domain::newtypes::{ContentRef, TargetApp};
use camsync_core::domain::state::{OrchestratorState, RootStatus, StatusMessage};
use camsync_core::ports::content_resolver::IContentResolver;
use camsync_core::ports::log_sink::ILogSink;
use camsync_core::ports::preference_store::{IPreferenceStore, MediaPreferences};
use camsync_core::ports::privileged_shell::{IPrivilegedShell, ShellOutput};
use camsync_core::ports::root_status::IRootStatusListener;
use camsync_core::ports::target_app::ITargetAppProvider;
use chrono::Utc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{info, instrument, warn};

use crate::broadcaster::StateBroadcaster;
use crate::markers::MarkerRegistry;
use crate::shell::quote_path;
use crate::staging::MediaStagingService;

/// Log tag for orchestrator records
const TAG: &str = "Root";

/// Outcome of one orchestrator operation
pub type OperationResult = Result<StatusMessage, OrchestratorError>;

/// External collaborators of the orchestrator
pub struct OrchestratorPorts {
    pub shell: Arc<dyn IPrivilegedShell>,
    pub resolver: Arc<dyn IContentResolver>,
    pub preferences: Arc<dyn IPreferenceStore>,
    pub targets: Arc<dyn ITargetAppProvider>,
    pub root_listener: Arc<dyn IRootStatusListener>,
    pub log_sink: Arc<dyn ILogSink>,
}

/// Owner of the orchestrator state and its privileged operations
pub struct SyncOrchestrator {
    shell: Arc<dyn IPrivilegedShell>,
    staging: MediaStagingService,
    preferences: Arc<dyn IPreferenceStore>,
    targets: Arc<dyn ITargetAppProvider>,
    root_listener: Arc<dyn IRootStatusListener>,
    log_sink: Arc<dyn ILogSink>,
    state: StateBroadcaster,
    op_lock: Mutex<()>,
    log_file: PathBuf,
    export_destination: PathBuf,
}

impl SyncOrchestrator {
    /// Creates an orchestrator seeded with the stored selections and target
    pub fn new(ports: OrchestratorPorts, config: &Config) -> Self {
        let prefs = ports.preferences.load();
        let mut initial = OrchestratorState::new(config.camera.base_dir.clone());
        initial.video = prefs.video;
        initial.image = prefs.image;
        initial.last_synced = ports.preferences.last_synced();
        initial.target_app = ports.targets.current();

        Self {
            shell: ports.shell,
            staging: MediaStagingService::new(config.staging.scratch_dir.clone(), ports.resolver),
            preferences: ports.preferences,
            targets: ports.targets,
            root_listener: ports.root_listener,
            state: StateBroadcaster::new(initial, Arc::clone(&ports.log_sink)),
            log_sink: ports.log_sink,
            op_lock: Mutex::new(()),
            log_file: config.logging.file.clone(),
            export_destination: config.export_destination(),
        }
    }

    /// A receiver that observes every published state
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> {
        self.state.subscribe()
    }

    /// A copy of the current state
    pub fn snapshot(&self) -> OrchestratorState {
        self.state.snapshot()
    }

    /// Subscribes to pushed preference and target updates, then probes root
    ///
    /// The spawned tasks end when the corresponding store drops its sender.
    pub fn start(self: Arc<Self>) -> Vec<JoinHandle<()>> {
        let mut handles = Vec::with_capacity(3);

        let mut prefs_rx = self.preferences.subscribe();
        let this = Arc::clone(&self);
        handles.push(tokio::spawn(async move {
            while prefs_rx.changed().await.is_ok() {
                let prefs = prefs_rx.borrow_and_update().clone();
                this.apply_preferences(prefs);
            }
        }));

        let mut target_rx = self.targets.subscribe();
        let this = Arc::clone(&self);
        handles.push(tokio::spawn(async move {
            while target_rx.changed().await.is_ok() {
                let target = target_rx.borrow_and_update().clone();
                this.follow_target(target).await;
            }
        }));

        let this = Arc::clone(&self);
        handles.push(tokio::spawn(async move {
            let _ = this.refresh_root_status().await;
        }));

        handles
    }

    // ------------------------------------------------------------------
    // Root
    // ------------------------------------------------------------------

    /// Probes root and, when available, refreshes every marker
    ///
    /// Never sets `busy`.
    #[instrument(skip(self))]
    pub async fn refresh_root_status(&self) -> OperationResult {
        if !self.probe_root().await {
            return self.fail(OrchestratorError::RootUnavailable);
        }
        let _op = self.op_lock.lock().await;
        self.reload_markers().await;
        Ok(StatusMessage::info("Root available"))
    }

    /// Runs one probe and records the result
    async fn probe_root(&self) -> bool {
        let available = self.shell.probe().await;
        self.state.update(|s| s.root = RootStatus::from_probe(available));
        self.root_listener.set_root_available(available);
        self.log(LogRecord::new(LogLevel::Debug, TAG, "Root probe finished").with("available", available));
        available
    }

    /// Fails with `RootUnavailable` unless root is confirmed or a fresh probe succeeds
    async fn ensure_root(&self) -> Result<(), OrchestratorError> {
        if self.state.snapshot().root.is_available() || self.probe_root().await {
            return Ok(());
        }
        self.log(LogRecord::new(LogLevel::Warn, TAG, "Root not available"));
        Err(self.publish_error(OrchestratorError::RootUnavailable))
    }

    // ------------------------------------------------------------------
    // Selection and pushed updates
    // ------------------------------------------------------------------

    /// Replaces the video selection and persists it
    pub async fn select_video(&self, content: ContentRef, display_name: Option<String>) -> OperationResult {
        self.select(MediaKind::Video, content, display_name).await
    }

    /// Replaces the image selection and persists it
    pub async fn select_image(&self, content: ContentRef, display_name: Option<String>) -> OperationResult {
        self.select(MediaKind::Image, content, display_name).await
    }

    /// Replaces the selection for `kind`
    ///
    /// No privileged work. A persistence failure is logged; the in-memory
    /// selection stands.
    #[instrument(skip(self, content, display_name), fields(content = %content))]
    pub async fn select(&self, kind: MediaKind, content: ContentRef, display_name: Option<String>) -> OperationResult {
        let media = PickedMedia::new(content, display_name);
        let message = StatusMessage::info(format!("{} selected", kind.title()));

        let selected = media.clone();
        let published = message.clone();
        self.state.update(move |s| {
            s.set_picked(kind, Some(selected));
            s.message = Some(published);
        });
        self.log(
            LogRecord::new(LogLevel::Info, TAG, format!("{} selected", kind.title()))
                .with("content", &media.content)
                .with("name", media.display_name.as_deref().unwrap_or("")),
        );

        if let Err(e) = self.preferences.save(kind, &media).await {
            warn!(error = %e, "Failed to persist selection");
            self.log(
                LogRecord::new(LogLevel::Warn, TAG, "Failed to persist selection")
                    .with("kind", kind)
                    .with("error", format!("{e:#}")),
            );
        }
        Ok(message)
    }

    /// Applies stored selections pushed by the preference store
    pub fn apply_preferences(&self, prefs: MediaPreferences) {
        self.state.update(move |s| {
            s.video = prefs.video;
            s.image = prefs.image;
        });
    }

    /// Applies a target change pushed by the target provider
    ///
    /// Recomputes the active directory; never triggers a sync. When the
    /// directory moves, the markers stored in it read as absent until they
    /// are probed again. Returns whether the directory moved.
    pub fn apply_target(&self, target: Option<TargetApp>) -> bool {
        let package = target
            .as_ref()
            .map_or_else(|| "none".to_string(), |t| t.package.to_string());
        let mut moved = false;
        self.state.update(|s| {
            s.target_app = target;
            moved = s.invalidate_moved_markers();
        });
        self.log(
            LogRecord::new(LogLevel::Debug, TAG, "Target app updated")
                .with("target", package)
                .with("directory_moved", moved),
        );
        moved
    }

    /// Applies a pushed target and re-probes the markers of a moved directory
    ///
    /// The probe only runs while root is confirmed.
    async fn follow_target(&self, target: Option<TargetApp>) {
        if !self.apply_target(target) {
            return;
        }
        let _op = self.op_lock.lock().await;
        if self.state.snapshot().root.is_available() {
            self.reload_markers().await;
        }
    }

    // ------------------------------------------------------------------
    // Sync
    // ------------------------------------------------------------------

    pub async fn sync_video(&self) -> OperationResult {
        self.sync_media(MediaKind::Video).await
    }

    pub async fn sync_image(&self) -> OperationResult {
        self.sync_media(MediaKind::Image).await
    }

    /// Copies the selected media of `kind` into the active directory
    #[instrument(skip(self))]
    pub async fn sync_media(&self, kind: MediaKind) -> OperationResult {
        let _op = self.op_lock.lock().await;
        self.ensure_root().await?;

        let media = match self.state.snapshot().picked(kind).cloned() {
            Some(media) => media,
            None => return self.fail(OrchestratorError::NoSelection(kind)),
        };

        let busy = BusyGuard::acquire(&self.state);
        let snapshot = self.state.snapshot();

        if snapshot.private_mode_enabled() && snapshot.target_app.is_none() {
            busy.release();
            self.log(LogRecord::new(LogLevel::Warn, TAG, "Private dir enabled without target app"));
            return self.fail(OrchestratorError::PrivateModeRequiresTarget);
        }

        let active = resolve_active_directory(&snapshot.directory_config());
        let destination = active.join(kind.destination_file_name());
        self.log(
            LogRecord::new(LogLevel::Debug, TAG, format!("Sync {kind} requested"))
                .with("content", &media.content)
                .with("dest_dir", active.display())
                .with("private_dir", snapshot.private_mode_enabled()),
        );

        let scratch = match self.staging.stage(&media.content, kind.staging_suffix()).await {
            Ok(scratch) => scratch,
            Err(e) => {
                busy.release();
                self.log(
                    LogRecord::new(LogLevel::Error, TAG, format!("Unable to stage {kind}"))
                        .with("error", &e),
                );
                return self.fail(OrchestratorError::StagingFailed {
                    kind,
                    reason: e.to_string(),
                });
            }
        };

        let command = build_copy_command(&active, scratch.path(), &destination);
        let output = self.shell.run(&command).await;
        let size = scratch.size();
        scratch.discard().await;
        busy.release();

        self.log(
            LogRecord::new(LogLevel::Debug, TAG, format!("Sync {kind} finished"))
                .with("dest", destination.display())
                .with("size_bytes", size)
                .with("success", output.success),
        );

        match output.error() {
            None => {
                let synced = SyncedMedia {
                    kind,
                    content: media.content,
                    display_name: media.display_name,
                    synced_at: Utc::now(),
                    destination_path: destination.clone(),
                    target_package: snapshot.target_package().cloned(),
                };
                let message = StatusMessage::info(format!("{} synced", kind.title()));
                let published = message.clone();
                let recorded = synced.clone();
                self.state.update(move |s| {
                    s.root = RootStatus::Available;
                    s.last_synced = Some(recorded);
                    s.message = Some(published);
                });
                info!(dest = %destination.display(), "Media synced");

                if let Err(e) = self.preferences.save_last_synced(&synced).await {
                    warn!(error = %e, "Failed to persist sync record");
                    self.log(
                        LogRecord::new(LogLevel::Warn, TAG, "Failed to persist sync record")
                            .with("error", format!("{e:#}")),
                    );
                }
                Ok(message)
            }
            Some(err) => {
                self.log_shell_failure(&format!("{} sync failed", kind.title()), &output);
                self.publish(StatusMessage::error(format!("{} sync failed: {err}", kind.title())));
                Err(err)
            }
        }
    }

    /// Syncs again when the last sync no longer matches the selection
    ///
    /// Prefers the video, then the image. Reports the current record
    /// without shell work when the preferred selection, and in private mode
    /// the target, are unchanged since the recorded sync.
    #[instrument(skip(self))]
    pub async fn ensure_synced(&self) -> OperationResult {
        let snapshot = self.state.snapshot();
        if !snapshot.needs_resync() {
            if let Some(synced) = &snapshot.last_synced {
                return Ok(StatusMessage::info(format!(
                    "{} already synced to {}",
                    synced.kind.title(),
                    synced.destination_path.display()
                )));
            }
        }

        match snapshot.preferred_selection() {
            Some((kind, _)) => self.sync_media(kind).await,
            None => self.fail(OrchestratorError::NoSelection(MediaKind::Video)),
        }
    }

    // ------------------------------------------------------------------
    // Markers
    // ------------------------------------------------------------------

    /// Creates or removes a marker file
    ///
    /// The presence map changes only after the shell command succeeds. When
    /// the toggle moves the active directory, the other markers are probed
    /// again in the new location before the lock is released.
    #[instrument(skip(self))]
    pub async fn set_marker(&self, marker: Marker, enabled: bool) -> OperationResult {
        let _op = self.op_lock.lock().await;
        self.ensure_root().await?;

        let busy = BusyGuard::acquire(&self.state);
        let snapshot = self.state.snapshot();

        if marker.is_directory_input() && enabled && snapshot.target_app.is_none() {
            busy.release();
            self.log(LogRecord::new(LogLevel::Warn, TAG, "Private dir requested without target app"));
            return self.fail(OrchestratorError::PrivateModeRequiresTarget);
        }

        let dir = MarkerRegistry::marker_directory(marker, &snapshot.directory_config());
        let command = MarkerRegistry::build_toggle_command(marker, enabled, &dir);
        let output = self.shell.run(&command).await;
        busy.release();

        match output.error() {
            None => {
                let state_word = if enabled { "enabled" } else { "disabled" };
                let message = StatusMessage::info(format!("{} {state_word}", marker.label()));
                let published = message.clone();
                let mut moved = false;
                self.state.update(|s| {
                    s.root = RootStatus::Available;
                    s.markers.set(marker, enabled);
                    moved = s.invalidate_moved_markers();
                    s.message = Some(published);
                });
                self.log(
                    LogRecord::new(LogLevel::Info, TAG, "Marker updated")
                        .with("marker", marker)
                        .with("enabled", enabled)
                        .with("path", MarkerRegistry::marker_path(marker, &dir).display()),
                );
                if moved {
                    self.reload_markers().await;
                }
                Ok(message)
            }
            Some(err) => {
                self.log_shell_failure("Marker update failed", &output);
                self.publish(StatusMessage::error(format!(
                    "Failed to update {}: {err}",
                    marker.label()
                )));
                Err(err)
            }
        }
    }

    /// Probes every marker and replaces the presence map
    ///
    /// Never sets `busy`.
    #[instrument(skip(self))]
    pub async fn refresh_markers(&self) -> OperationResult {
        let _op = self.op_lock.lock().await;
        self.ensure_root().await?;
        self.reload_markers().await;
        Ok(StatusMessage::info("Markers refreshed"))
    }

    /// Caller holds `op_lock`
    async fn reload_markers(&self) {
        let config = self.state.snapshot().directory_config();
        let markers = MarkerRegistry::refresh_all(self.shell.as_ref(), &config).await;
        self.state.update(move |s| s.markers = markers);
    }

    // ------------------------------------------------------------------
    // Logs
    // ------------------------------------------------------------------

    /// Copies the debug log file to the export destination
    #[instrument(skip(self))]
    pub async fn export_logs(&self) -> OperationResult {
        let _op = self.op_lock.lock().await;
        self.ensure_root().await?;

        let command = build_export_command(&self.log_file, &self.export_destination);
        let output = self.shell.run(&command).await;

        match output.error() {
            None => {
                let message = StatusMessage::info(format!(
                    "Logs exported to {}",
                    self.export_destination.display()
                ));
                self.publish(message.clone());
                Ok(message)
            }
            Some(err) => {
                self.log_shell_failure("Log export failed", &output);
                self.publish(StatusMessage::error(format!("Log export failed: {err}")));
                Err(err)
            }
        }
    }

    // ------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------

    fn publish(&self, message: StatusMessage) {
        self.state.update(move |s| s.message = Some(message));
    }

    fn publish_error(&self, err: OrchestratorError) -> OrchestratorError {
        self.publish(StatusMessage::error(err.to_string()));
        err
    }

    fn fail(&self, err: OrchestratorError) -> OperationResult {
        Err(self.publish_error(err))
    }

    fn log(&self, record: LogRecord) {
        self.log_sink.record(record);
    }

    fn log_shell_failure(&self, message: &str, output: &ShellOutput) {
        self.log(
            LogRecord::new(LogLevel::Error, TAG, message)
                .with("exit_code", output.exit_code)
                .with("stderr", &output.stderr),
        );
    }
}

/// Keeps `busy` set while alive
///
/// Clears the flag on `release` or drop, whichever comes first.
struct BusyGuard<'a> {
    state: &'a StateBroadcaster,
    active: bool,
}

impl<'a> BusyGuard<'a> {
    fn acquire(state: &'a StateBroadcaster) -> Self {
        state.update(|s| s.busy = true);
        Self {
            state,
            active: true,
        }
    }

    fn release(mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        if self.active {
            self.active = false;
            self.state.update(|s| s.busy = false);
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// `mkdir -p <dir> && cp -f <scratch> <dest> && chmod 644 <dest>`
pub fn build_copy_command(dir: &Path, scratch: &Path, destination: &Path) -> String {
    let dest = quote_path(destination);
    format!(
        "mkdir -p {} && cp -f {} {dest} && chmod 644 {dest}",
        quote_path(dir),
        quote_path(scratch)
    )
}

/// `cp -f <log> <dest> && chmod 644 <dest>`
pub fn build_export_command(log_file: &Path, destination: &Path) -> String {
    let dest = quote_path(destination);
    format!("cp -f {} {dest} && chmod 644 {dest}", quote_path(log_file))
}
