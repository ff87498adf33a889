//! Observable orchestrator state
//!
//! Wraps a `tokio::sync::watch` channel holding the [`OrchestratorState`].
//! Every mutation goes through [`StateBroadcaster::update`], which
//! recomputes the active directory before the new value is published, so
//! subscribers never observe inputs and derived directory out of step.
//!
//! A directory change emits exactly one diagnostic record.

use std::sync::Arc;

use camsync_core::domain::log::{LogLevel, LogRecord};
use camsync_core::domain::state::OrchestratorState;
use camsync_core::ports::log_sink::ILogSink;
use tokio::sync::watch;

const TAG: &str = "Root";

/// Single-writer, multi-reader state container
pub struct StateBroadcaster {
    tx: watch::Sender<OrchestratorState>,
    log_sink: Arc<dyn ILogSink>,
}

impl StateBroadcaster {
    pub fn new(mut initial: OrchestratorState, log_sink: Arc<dyn ILogSink>) -> Self {
        initial.reconcile_active_directory();
        let (tx, _rx) = watch::channel(initial);
        Self { tx, log_sink }
    }

    /// A receiver that sees every published state
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> {
        self.tx.subscribe()
    }

    /// A copy of the current state
    pub fn snapshot(&self) -> OrchestratorState {
        self.tx.borrow().clone()
    }

    /// Applies `mutate`, reconciles the active directory, then publishes
    pub fn update(&self, mutate: impl FnOnce(&mut OrchestratorState)) {
        let mut diagnostic = None;

        self.tx.send_modify(|state| {
            mutate(state);
            if let Some(change) = state.reconcile_active_directory() {
                let target = state
                    .target_package()
                    .map_or_else(|| "none".to_string(), ToString::to_string);
                diagnostic = Some(
                    LogRecord::new(LogLevel::Info, TAG, "Camera directory changed")
                        .with("from", change.from.display())
                        .with("to", change.to.display())
                        .with("private_dir", state.private_mode_enabled())
                        .with("target", target),
                );
            }
        });

        // Recorded outside the channel lock.
        if let Some(record) = diagnostic {
            self.log_sink.record(record);
        }
    }
}
