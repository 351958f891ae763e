//! vcd Domain - Core types
//!
//! This crate defines the domain model for invoking the Cloud Director
//! REST API: endpoints, versions, credentials, requests, responses and the
//! task lifecycle. All types here are pure Rust with no I/O dependencies.

pub mod credential;
pub mod document;
pub mod endpoint;
pub mod error;
pub mod request;
pub mod response;
pub mod settings;
pub mod task;
pub mod version;

pub use credential::{ACCESS_TOKEN_HEADER, Credential, ExplicitCredentials, SESSION_TOKEN_HEADER};
pub use document::{Document, XmlElement};
pub use endpoint::Endpoint;
pub use error::{DomainError, DomainResult};
pub use settings::{DEFAULT_POLL_INTERVAL, DEFAULT_TASK_TIMEOUT, InvokerSettings};
pub use task::{TaskOutcome, TaskProgress, TaskReference, TaskSnapshot, TaskStatus};
pub use version::{ApiVersion, VersionInfo, select_highest};
