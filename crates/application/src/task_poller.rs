//! Task Poller
//!
//! Re-fetches a task resource until the server reports a terminal status
//! or the task budget is used up.
//!
//! Budget accounting: after every non-terminal poll the poll interval is
//! deducted from the remaining budget, and the loop sleeps that same
//! interval before the next poll. A budget of `T` therefore allows at most
//! `ceil(T / interval)` polls. Running out of budget yields
//! [`TaskOutcome::TimedOut`], which is never confused with a server-side
//! `error`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use vcd_domain::request::{Headers, OutgoingRequest};
use vcd_domain::{DEFAULT_POLL_INTERVAL, InvokerSettings, TaskOutcome, TaskProgress, TaskSnapshot, TaskStatus};

use crate::error::{VcdError, VcdResult};
use crate::ports::{HttpClient, SilentObserver, TaskObserver};

/// Everything needed to fetch one task, fixed for the whole wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskPoll {
    /// Task href.
    pub href: String,
    /// Authentication and accept headers of the originating request.
    pub headers: Headers,
    /// Timeout of each individual poll.
    pub api_timeout: Duration,
    /// Skip TLS certificate validation.
    pub skip_cert_check: bool,
}

/// Waits for tasks to finish.
pub struct TaskPoller<C: HttpClient> {
    client: Arc<C>,
    settings: InvokerSettings,
    observer: Arc<dyn TaskObserver>,
}

impl<C: HttpClient> Clone for TaskPoller<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            settings: self.settings,
            observer: Arc::clone(&self.observer),
        }
    }
}

impl<C: HttpClient> TaskPoller<C> {
    /// Creates a poller that reports progress nowhere.
    pub fn new(client: Arc<C>, settings: InvokerSettings) -> Self {
        Self {
            client,
            settings,
            observer: Arc::new(SilentObserver),
        }
    }

    /// Replaces the progress observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Polls `task.href` until a terminal status or until `task_timeout`
    /// is exhausted.
    ///
    /// # Errors
    ///
    /// A failed poll ends the wait: [`VcdError::RequestFailed`] for a
    /// transport failure or non-2xx status, [`VcdError::InvalidDocument`] for
    /// a response that is not a task with a status.
    pub async fn poll_until_done(&self, task: &TaskPoll, task_timeout: Duration) -> VcdResult<TaskOutcome> {
        let interval = match self.settings.poll_interval() {
            zero if zero.is_zero() => DEFAULT_POLL_INTERVAL,
            interval => interval,
        };
        let mut remaining = task_timeout;
        let mut polls: u32 = 0;
        let mut last_status = None;

        info!(href = %task.href, timeout_secs = task_timeout.as_secs(), "waiting for task");

        while !remaining.is_zero() {
            polls += 1;
            let snapshot = self.fetch(task).await?;

            match &snapshot.status {
                TaskStatus::Success => {
                    info!(href = %task.href, polls, "task completed successfully");
                    return Ok(self.finish(task, TaskOutcome::Succeeded));
                }
                status @ (TaskStatus::Error | TaskStatus::Canceled | TaskStatus::Aborted) => {
                    warn!(href = %task.href, status = %status, polls, "task did not complete");
                    return Ok(self.finish(task, TaskOutcome::Failed(status.clone())));
                }
                TaskStatus::Unknown(raw) => {
                    warn!(href = %task.href, status = %raw, "unrecognized task status, still polling");
                }
                TaskStatus::Queued | TaskStatus::PreRunning | TaskStatus::Running => {
                    debug!(href = %task.href, status = %snapshot.status, progress = ?snapshot.progress, "task in progress");
                }
            }

            remaining = remaining.saturating_sub(interval);
            self.observer.on_progress(&TaskProgress {
                href: task.href.clone(),
                status: snapshot.status.clone(),
                poll: polls,
                remaining,
                percent: snapshot.progress,
            });
            last_status = Some(snapshot.status);

            if !remaining.is_zero() {
                tokio::time::sleep(interval).await;
            }
        }

        warn!(href = %task.href, polls, "task timeout exceeded, final state unknown");
        Ok(self.finish(task, TaskOutcome::TimedOut { last_status, polls }))
    }

    async fn fetch(&self, task: &TaskPoll) -> VcdResult<TaskSnapshot> {
        let request = OutgoingRequest {
            headers: task.headers.clone(),
            ..OutgoingRequest::get(task.href.clone(), task.api_timeout)
        }
        .skip_cert_check(task.skip_cert_check);

        let response = self
            .client
            .execute(&request)
            .await
            .map_err(|e| VcdError::transport(&e, task.href.clone()))?;

        if !response.is_success() {
            return Err(VcdError::http_status(&response, task.href.clone()));
        }

        let document = response
            .document()
            .map_err(|e| VcdError::InvalidDocument(e.to_string()))?;
        TaskSnapshot::from_document(&document).map_err(|e| VcdError::InvalidDocument(e.to_string()))
    }

    fn finish(&self, task: &TaskPoll, outcome: TaskOutcome) -> TaskOutcome {
        self.observer.on_finished(&task.href, &outcome);
        outcome
    }
}
