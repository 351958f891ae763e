//! The request exactly as handed to the transport

use std::time::Duration;

use super::{Headers, HttpMethod, RequestBody};

/// A fully assembled HTTP request.
///
/// This is the only shape the transport port ever sees, so a body without a
/// content type (or the reverse) cannot reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingRequest {
    /// HTTP method
    pub method: HttpMethod,
    /// Absolute URL
    pub url: String,
    /// Headers, including authentication and accept
    pub headers: Headers,
    /// Optional body with its content type
    pub body: Option<RequestBody>,
    /// Timeout for this single call
    pub timeout: Duration,
    /// Skip TLS certificate validation
    pub skip_cert_check: bool,
}

impl OutgoingRequest {
    /// Creates a GET with no headers.
    #[must_use]
    pub fn get(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: Headers::new(),
            body: None,
            timeout,
            skip_cert_check: false,
        }
    }

    /// Adds or replaces a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Sets the certificate policy.
    #[must_use]
    pub const fn skip_cert_check(mut self, skip: bool) -> Self {
        self.skip_cert_check = skip;
        self
    }

    /// Returns the content type that accompanies the body, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.body.as_ref().map(RequestBody::content_type)
    }
}
