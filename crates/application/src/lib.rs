//! vcd Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - Version negotiation, request invocation and task polling
//! - Application-level error handling

pub mod auth;
pub mod error;
pub mod invoke_request;
pub mod negotiate_version;
pub mod ports;
pub mod task_poller;

#[cfg(test)]
mod test_support;

pub use auth::{SessionStore, resolve_credential};
pub use error::{VcdError, VcdResult};
pub use invoke_request::{InvokeOutcome, Invocation, RequestInvoker, WaitPolicy, build_request};
pub use negotiate_version::VersionNegotiator;
pub use ports::{HttpClient, HttpClientError, NoSessions, SessionRegistry, SilentObserver, TaskObserver};
pub use task_poller::{TaskPoll, TaskPoller};
