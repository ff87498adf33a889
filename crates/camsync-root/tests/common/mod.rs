//! Shared fixtures for orchestrator integration tests
//!
//! The scripted shell records every command, keeps an in-memory set of
//! existing paths that `touch` and `rm -f` update and marker probes read,
//! and can be told to fail the next command or to hold each command for a
//! while.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use camsync_core::config::{Config, ConfigBuilder};
use camsync_core::domain::log::LogRecord;
use camsync_core::domain::media::{PickedMedia, SyncedMedia};
use camsync_core::domain::newtypes::{ContentRef, TargetApp, TargetPackage};
use camsync_core::ports::content_resolver::{ContentReader, IContentResolver};
use camsync_core::ports::preference_store::{IPreferenceStore, MediaPreferences};
use camsync_core::ports::privileged_shell::{IPrivilegedShell, ShellOutput};
use camsync_core::ports::root_status::IRootStatusListener;
use camsync_core::ports::target_app::ITargetAppProvider;
use camsync_log::MemoryLogSink;
use camsync_root::{OrchestratorPorts, SyncOrchestrator};
use tempfile::TempDir;
use tokio::sync::watch;

pub const BASE: &str = "/sdcard/DCIM/Camera1";
pub const VIDEO_REF: &str = "content://media/video/1";
pub const OTHER_VIDEO_REF: &str = "content://media/video/2";
pub const IMAGE_REF: &str = "content://media/image/1";

// ============================================================================
// ScriptedShell
// ============================================================================

#[derive(Default)]
pub struct ScriptedShell {
    root: AtomicBool,
    probes: AtomicUsize,
    commands: Mutex<Vec<String>>,
    next_results: Mutex<VecDeque<ShellOutput>>,
    existing: Mutex<HashSet<PathBuf>>,
    delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedShell {
    pub fn new(root: bool) -> Self {
        let shell = Self::default();
        shell.root.store(root, Ordering::SeqCst);
        shell
    }

    pub fn set_root(&self, root: bool) {
        self.root.store(root, Ordering::SeqCst);
    }

    /// Every non-probe command, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands.lock().unwrap().clone()
    }

    pub fn clear_commands(&self) {
        self.commands.lock().unwrap().clear();
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    /// The next command returns `output` instead of succeeding
    pub fn fail_next(&self, output: ShellOutput) {
        self.next_results.lock().unwrap().push_back(output);
    }

    /// Makes `test -f <path>` succeed
    pub fn add_file(&self, path: impl Into<PathBuf>) {
        self.existing.lock().unwrap().insert(path.into());
    }

    /// Deletes a file behind the orchestrator's back
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.existing.lock().unwrap().remove(path.as_ref());
    }

    pub fn has_file(&self, path: impl AsRef<Path>) -> bool {
        self.existing.lock().unwrap().contains(path.as_ref())
    }

    /// Holds every command for `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Highest number of commands that were running at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IPrivilegedShell for ScriptedShell {
    async fn probe(&self) -> bool {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.root.load(Ordering::SeqCst)
    }

    async fn run(&self, command: &str) -> ShellOutput {
        self.commands.lock().unwrap().push(command.to_string());

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(running, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(output) = self.next_results.lock().unwrap().pop_front() {
            return output;
        }
        if let Some(rest) = command.strip_prefix("test -f ") {
            let path = PathBuf::from(rest.trim_matches('\''));
            let exists = self.existing.lock().unwrap().contains(&path);
            return ShellOutput::exited(if exists { 0 } else { 1 }, "", "");
        }
        if let Some(path) = argument_after(command, "touch ") {
            self.existing.lock().unwrap().insert(path);
        } else if let Some(path) = argument_after(command, "rm -f ") {
            self.existing.lock().unwrap().remove(&path);
        }
        ShellOutput::exited(0, "", "")
    }
}

/// The quoted argument following `verb` in a command
fn argument_after(command: &str, verb: &str) -> Option<PathBuf> {
    let start = command.find(&format!("{verb}'"))? + verb.len() + 1;
    let rest = &command[start..];
    rest.find('\'').map(|end| PathBuf::from(&rest[..end]))
}

/// Arguments of a command that were wrapped in single quotes
///
/// Only valid for arguments without embedded quotes.
pub fn quoted_args(command: &str) -> Vec<String> {
    command
        .split('\'')
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect()
}

// ============================================================================
// In-memory collaborators
// ============================================================================

#[derive(Default)]
pub struct MemoryResolver {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryResolver {
    pub fn with(mut self, locator: &str, bytes: &[u8]) -> Self {
        self.files.insert(locator.to_string(), bytes.to_vec());
        self
    }
}

#[async_trait::async_trait]
impl IContentResolver for MemoryResolver {
    async fn open(&self, content: &ContentRef) -> anyhow::Result<ContentReader> {
        match self.files.get(content.as_str()) {
            Some(bytes) => Ok(Box::pin(std::io::Cursor::new(bytes.clone()))),
            None => anyhow::bail!("permission revoked for {content}"),
        }
    }
}

pub struct MemoryPreferenceStore {
    tx: watch::Sender<MediaPreferences>,
    synced: Mutex<Option<SyncedMedia>>,
}

impl MemoryPreferenceStore {
    pub fn new(initial: MediaPreferences) -> Self {
        Self {
            tx: watch::channel(initial).0,
            synced: Mutex::new(None),
        }
    }

    /// Simulates an update coming from outside the orchestrator
    pub fn push(&self, prefs: MediaPreferences) {
        self.tx.send_replace(prefs);
    }
}

#[async_trait::async_trait]
impl IPreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> MediaPreferences {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<MediaPreferences> {
        self.tx.subscribe()
    }

    async fn save_video(&self, media: &PickedMedia) -> anyhow::Result<()> {
        self.tx.send_modify(|p| p.video = Some(media.clone()));
        Ok(())
    }

    async fn save_image(&self, media: &PickedMedia) -> anyhow::Result<()> {
        self.tx.send_modify(|p| p.image = Some(media.clone()));
        Ok(())
    }

    fn last_synced(&self) -> Option<SyncedMedia> {
        self.synced.lock().unwrap().clone()
    }

    async fn save_last_synced(&self, synced: &SyncedMedia) -> anyhow::Result<()> {
        *self.synced.lock().unwrap() = Some(synced.clone());
        Ok(())
    }
}

pub struct MemoryTargetProvider {
    tx: watch::Sender<Option<TargetApp>>,
}

impl MemoryTargetProvider {
    pub fn new(initial: Option<TargetApp>) -> Self {
        Self {
            tx: watch::channel(initial).0,
        }
    }
}

#[async_trait::async_trait]
impl ITargetAppProvider for MemoryTargetProvider {
    fn current(&self) -> Option<TargetApp> {
        self.tx.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<TargetApp>> {
        self.tx.subscribe()
    }

    async fn set_target(&self, target: Option<TargetApp>) -> anyhow::Result<()> {
        self.tx.send_replace(target);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRootListener {
    values: Mutex<Vec<bool>>,
}

impl RecordingRootListener {
    pub fn values(&self) -> Vec<bool> {
        self.values.lock().unwrap().clone()
    }
}

impl IRootStatusListener for RecordingRootListener {
    fn set_root_available(&self, available: bool) {
        self.values.lock().unwrap().push(available);
    }
}

// ============================================================================
// Harness
// ============================================================================

pub fn target(pkg: &str) -> TargetApp {
    TargetApp::from_package(TargetPackage::new(pkg).unwrap())
}

pub fn base() -> PathBuf {
    PathBuf::from(BASE)
}

pub struct Harness {
    pub orchestrator: Arc<SyncOrchestrator>,
    pub shell: Arc<ScriptedShell>,
    pub prefs: Arc<MemoryPreferenceStore>,
    pub targets: Arc<MemoryTargetProvider>,
    pub root_listener: Arc<RecordingRootListener>,
    pub log: Arc<MemoryLogSink>,
    pub config: Config,
    _tmp: TempDir,
}

impl Harness {
    pub fn new(root: bool) -> Self {
        Self::with_shell(Arc::new(ScriptedShell::new(root)), None)
    }

    pub fn with_target(root: bool, pkg: &str) -> Self {
        Self::with_shell(Arc::new(ScriptedShell::new(root)), Some(target(pkg)))
    }

    pub fn with_shell(shell: Arc<ScriptedShell>, initial_target: Option<TargetApp>) -> Self {
        let tmp = TempDir::new().unwrap();
        let config = ConfigBuilder::new()
            .camera_base_dir(base())
            .staging_scratch_dir(tmp.path().join("scratch"))
            .logging_file(tmp.path().join("camsync_debug.log"))
            .export_destination_dir(PathBuf::from("/sdcard/Download"))
            .build();

        let prefs = Arc::new(MemoryPreferenceStore::new(MediaPreferences::default()));
        let targets = Arc::new(MemoryTargetProvider::new(initial_target));
        let root_listener = Arc::new(RecordingRootListener::default());
        let log = Arc::new(MemoryLogSink::new());

        Self {
            orchestrator: Arc::new(SyncOrchestrator::new(
                Self::ports(&shell, &prefs, &targets, &root_listener, &log),
                &config,
            )),
            shell,
            prefs,
            targets,
            root_listener,
            log,
            config,
            _tmp: tmp,
        }
    }

    fn ports(
        shell: &Arc<ScriptedShell>,
        prefs: &Arc<MemoryPreferenceStore>,
        targets: &Arc<MemoryTargetProvider>,
        root_listener: &Arc<RecordingRootListener>,
        log: &Arc<MemoryLogSink>,
    ) -> OrchestratorPorts {
        let resolver = MemoryResolver::default()
            .with(VIDEO_REF, b"video-bytes")
            .with(OTHER_VIDEO_REF, b"other-video-bytes")
            .with(IMAGE_REF, b"image-bytes");
        OrchestratorPorts {
            shell: shell.clone(),
            resolver: Arc::new(resolver),
            preferences: prefs.clone(),
            targets: targets.clone(),
            root_listener: root_listener.clone(),
            log_sink: log.clone(),
        }
    }

    /// A fresh orchestrator over the same shell, stores and config
    ///
    /// Stands in for a new process that starts from persisted settings.
    pub fn restart(&self) -> Arc<SyncOrchestrator> {
        Arc::new(SyncOrchestrator::new(
            Self::ports(
                &self.shell,
                &self.prefs,
                &self.targets,
                &self.root_listener,
                &self.log,
            ),
            &self.config,
        ))
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.config.staging.scratch_dir
    }

    /// Number of files currently in the scratch directory
    pub fn scratch_files(&self) -> usize {
        std::fs::read_dir(self.scratch_dir())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn select_video(&self) {
        self.orchestrator
            .select_video(ContentRef::new(VIDEO_REF).unwrap(), Some("clip.mp4".into()))
            .await
            .unwrap();
    }

    pub async fn select_image(&self) {
        self.orchestrator
            .select_image(ContentRef::new(IMAGE_REF).unwrap(), Some("frame.bmp".into()))
            .await
            .unwrap();
    }

    /// Log records with the given message
    pub fn records(&self, message: &str) -> Vec<LogRecord> {
        self.log
            .snapshot()
            .into_iter()
            .filter(|r| r.message == message)
            .collect()
    }
}
