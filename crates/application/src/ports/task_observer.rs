//! Task progress observer port

use vcd_domain::{TaskOutcome, TaskProgress};

/// Receives progress while a task is being awaited.
///
/// Observers must not block: they run inline in the poll loop.
pub trait TaskObserver: Send + Sync {
    /// Called after every non-terminal poll.
    fn on_progress(&self, progress: &TaskProgress);

    /// Called once when waiting ends.
    fn on_finished(&self, href: &str, outcome: &TaskOutcome) {
        let _ = (href, outcome);
    }
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl TaskObserver for SilentObserver {
    fn on_progress(&self, _progress: &TaskProgress) {}
}
