//! HTTP Client port

use std::future::Future;

use thiserror::Error;
use vcd_domain::{request::OutgoingRequest, response::ResponseSpec};

/// Transport-level failures. Non-2xx responses are not errors at this level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The URL could not be parsed by the transport.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The call did not complete in time.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed, in milliseconds.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying message.
        message: String,
    },

    /// The server refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// Any other connection failure, TLS included.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
pub trait HttpClient: Send + Sync {
    /// Executes exactly one HTTP request and returns the response,
    /// whatever its status code.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other transport problems.
    fn execute(
        &self,
        request: &OutgoingRequest,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send;
}
