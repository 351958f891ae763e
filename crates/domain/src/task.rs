//! Task lifecycle types
//!
//! Some requests make Cloud Director start an asynchronous task and answer
//! with a `Task` document (or an entity that embeds one under `Tasks`).
//! The task is then fetched by its href until its `status` becomes terminal.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::{Document, XmlElement};
use crate::error::{DomainError, DomainResult};

/// Status reported by the server for a task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Waiting to be scheduled.
    Queued,
    /// Accepted, running pre-flight work.
    PreRunning,
    /// In progress.
    Running,
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Error,
    /// Canceled by a user.
    Canceled,
    /// Aborted by the system.
    Aborted,
    /// A status this client does not know.
    Unknown(String),
}

impl TaskStatus {
    /// Returns the wire form of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::PreRunning => "preRunning",
            Self::Running => "running",
            Self::Success => "success",
            Self::Error => "error",
            Self::Canceled => "canceled",
            Self::Aborted => "aborted",
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns true once the server will not change the status again.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Canceled | Self::Aborted)
    }

    /// Returns true for the one successful terminal status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "queued" => Self::Queued,
            "prerunning" => Self::PreRunning,
            "running" => Self::Running,
            "success" => Self::Success,
            "error" => Self::Error,
            "canceled" => Self::Canceled,
            "aborted" => Self::Aborted,
            _ => Self::Unknown(trimmed.to_string()),
        })
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        match value.parse() {
            Ok(status) => status,
            Err(never) => match never {},
        }
    }
}

/// Pointer to a task, taken from a response document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskReference {
    /// Absolute URL of the task resource.
    pub href: String,
    /// Operation name, when the server included one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
}

impl TaskReference {
    /// Creates a reference to the given href.
    #[must_use]
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            operation: None,
        }
    }

    /// Looks for a task in a response document.
    ///
    /// XML: the root element when it is a `Task`, otherwise the first nested
    /// `Task` element with an `href`. JSON: a top-level object whose `type`
    /// mentions `task` and that carries an `href`.
    #[must_use]
    pub fn find(document: &Document) -> Option<Self> {
        match document {
            Document::Xml(root) => Self::find_xml(root),
            Document::Json(value) => {
                let kind = value.get("type")?.as_str()?;
                if !kind.to_ascii_lowercase().contains("task") {
                    return None;
                }
                let href = value.get("href")?.as_str()?.trim();
                (!href.is_empty()).then(|| Self {
                    href: href.to_string(),
                    operation: value
                        .get("operationName")
                        .and_then(|v| v.as_str())
                        .map(str::to_string),
                })
            }
            Document::Text(_) | Document::Empty => None,
        }
    }

    fn find_xml(root: &XmlElement) -> Option<Self> {
        let is_task = |e: &XmlElement| {
            e.name == "Task" && e.attribute("href").is_some_and(|h| !h.trim().is_empty())
        };
        let task = if is_task(root) {
            root
        } else {
            root.find_descendant(is_task)?
        };
        Some(Self {
            href: task.attribute("href")?.trim().to_string(),
            operation: task.attribute("operationName").map(str::to_string),
        })
    }
}

/// The fields of a task document the poller cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSnapshot {
    /// Current status.
    pub status: TaskStatus,
    /// Completion percentage, when reported.
    pub progress: Option<u8>,
    /// Operation name, when reported.
    pub operation: Option<String>,
}

impl TaskSnapshot {
    /// Reads a task document fetched from a task href.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidDocument`] if the document is not a task
    /// or has no `status`.
    pub fn from_document(document: &Document) -> DomainResult<Self> {
        match document {
            Document::Xml(root) => {
                let task = if root.name == "Task" {
                    root
                } else {
                    root.find_descendant(|e| e.name == "Task").ok_or_else(|| {
                        DomainError::InvalidDocument(format!("expected a Task document, got {}", root.name))
                    })?
                };
                let status = task
                    .attribute("status")
                    .ok_or_else(|| DomainError::InvalidDocument("task has no status".to_string()))?;
                Ok(Self {
                    status: TaskStatus::from(status),
                    progress: task.attribute("progress").and_then(parse_progress),
                    operation: task.attribute("operationName").map(str::to_string),
                })
            }
            Document::Json(value) => {
                let status = value
                    .get("status")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| DomainError::InvalidDocument("task has no status".to_string()))?;
                Ok(Self {
                    status: TaskStatus::from(status),
                    progress: value
                        .get("progress")
                        .and_then(serde_json::Value::as_u64)
                        .and_then(|p| u8::try_from(p.min(100)).ok()),
                    operation: value
                        .get("operationName")
                        .and_then(|v| v.as_str())
                        .map(str::to_string),
                })
            }
            Document::Text(_) | Document::Empty => Err(DomainError::InvalidDocument(
                "task response has no structured body".to_string(),
            )),
        }
    }
}

fn parse_progress(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().map(|p| p.min(100))
}

/// How waiting on a task ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskOutcome {
    /// The server reported `success`.
    Succeeded,
    /// The server reported `error`, `canceled` or `aborted`.
    Failed(TaskStatus),
    /// The budget ran out before a terminal status; the final state is unknown.
    TimedOut {
        /// Last status seen, if any poll happened.
        last_status: Option<TaskStatus>,
        /// Number of polls made.
        polls: u32,
    },
}

impl TaskOutcome {
    /// The boolean result callers of wait-for-task receive.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    /// Returns true when the outcome is a local timeout, not a server verdict.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::TimedOut { .. })
    }
}

impl fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => f.write_str("task succeeded"),
            Self::Failed(status) => write!(f, "task finished with status {status}"),
            Self::TimedOut { last_status: Some(status), polls } => {
                write!(f, "timed out after {polls} polls, last status {status}")
            }
            Self::TimedOut { last_status: None, polls } => write!(f, "timed out after {polls} polls"),
        }
    }
}

/// A non-terminal observation made while polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskProgress {
    /// Task being polled.
    pub href: String,
    /// Status reported by this poll.
    pub status: TaskStatus,
    /// 1-based poll number.
    pub poll: u32,
    /// Budget left after this poll.
    pub remaining: Duration,
    /// Completion percentage, when reported.
    pub percent: Option<u8>,
}
