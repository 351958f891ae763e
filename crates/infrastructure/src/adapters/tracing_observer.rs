//! Task observer that reports progress through `tracing`.

use tracing::{info, warn};
use vcd_application::ports::TaskObserver;
use vcd_domain::{TaskOutcome, TaskProgress};

/// Logs every poll at `info` and the final outcome at `info` or `warn`.
///
/// Logs go wherever the subscriber writes them (stderr for the `vcd`
/// binary), so stdout only carries results.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TracingObserver {
    /// Creates a new observer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TaskObserver for TracingObserver {
    fn on_progress(&self, progress: &TaskProgress) {
        match progress.percent {
            Some(percent) => info!(
                task = %progress.href,
                status = %progress.status,
                poll = progress.poll,
                remaining_secs = progress.remaining.as_secs(),
                percent,
                "task in progress"
            ),
            None => info!(
                task = %progress.href,
                status = %progress.status,
                poll = progress.poll,
                remaining_secs = progress.remaining.as_secs(),
                "task in progress"
            ),
        }
    }

    fn on_finished(&self, href: &str, outcome: &TaskOutcome) {
        if outcome.succeeded() {
            info!(task = href, %outcome, "task finished");
        } else {
            warn!(task = href, %outcome, "task did not succeed");
        }
    }
}
