//! Invoker settings

use std::time::Duration;

/// Interval between task polls unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default budget for waiting on a task.
pub const DEFAULT_TASK_TIMEOUT: Duration = Duration::from_secs(600);

/// Tunables shared by every invocation of one invoker.
///
/// The poll interval is never zero: every constructor substitutes
/// [`DEFAULT_POLL_INTERVAL`] for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokerSettings {
    poll_interval: Duration,
}

impl InvokerSettings {
    /// Settings with a custom poll interval. A zero interval falls back to
    /// the default so the poll loop always makes progress on its budget.
    #[must_use]
    pub fn with_poll_interval(poll_interval: Duration) -> Self {
        Self {
            poll_interval: if poll_interval.is_zero() {
                DEFAULT_POLL_INTERVAL
            } else {
                poll_interval
            },
        }
    }

    /// Sleep between task polls; also the amount deducted from the task
    /// budget after each non-terminal poll.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
}

impl Default for InvokerSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
