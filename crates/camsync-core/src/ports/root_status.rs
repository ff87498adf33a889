//! Root availability listener port
//!
//! Components outside the orchestrator (e.g. an anti-detection status
//! holder) that need to know whether root is available. The orchestrator
//! pushes the result of every probe.

/// Port trait for consumers of root availability
pub trait IRootStatusListener: Send + Sync {
    fn set_root_available(&self, available: bool);
}

/// Listener that ignores every update
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRootStatusListener;

impl IRootStatusListener for NoopRootStatusListener {
    fn set_root_available(&self, _available: bool) {}
}
