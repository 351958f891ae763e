//! Response specification types
//!
//! [`ResponseSpec`] is what the transport hands back; [`ApiResponse`] pairs
//! it with the parsed [`Document`] the invoker returns to callers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::DomainResult;
use crate::request::Headers;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns the canonical reason phrase for the codes Cloud Director uses.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            202 => "Accepted",
            204 => "No Content",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            406 => "Not Acceptable",
            409 => "Conflict",
            415 => "Unsupported Media Type",
            429 => "Too Many Requests",
            500 => "Internal Server Error",
            501 => "Not Implemented",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            504 => "Gateway Timeout",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// Raw HTTP response as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response headers.
    #[serde(default)]
    pub headers: Headers,
    /// Response body as text.
    pub body: String,
    /// Time from send to fully-read body.
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec` from raw response data.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: Headers,
        body: impl Into<String>,
        duration: Duration,
    ) -> Self {
        Self {
            status: status.into(),
            headers,
            body: body.into(),
            duration,
        }
    }

    /// Returns the `Content-Type` header, if present.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get("content-type")
    }

    /// Returns true for 2xx responses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Parses the body according to the content type.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DomainError::InvalidDocument`] if the body does not
    /// parse.
    pub fn document(&self) -> DomainResult<Document> {
        Document::parse(self.content_type(), &self.body)
    }
}

/// A successful API response with its parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: StatusCode,
    /// `Content-Type` of the body, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Verbatim body text.
    pub raw: String,
    /// Parsed body.
    pub document: Document,
}

impl ApiResponse {
    /// Parses a transport response.
    ///
    /// # Errors
    ///
    /// Returns [`crate::DomainError::InvalidDocument`] if the body does not
    /// parse.
    pub fn from_response(response: ResponseSpec) -> DomainResult<Self> {
        let document = response.document()?;
        Ok(Self {
            status: response.status,
            content_type: response.content_type().map(str::to_string),
            raw: response.body,
            document,
        })
    }
}
