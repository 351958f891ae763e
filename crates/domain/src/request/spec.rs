//! Request specification type

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{HttpMethod, RequestBody};
use crate::endpoint::Endpoint;
use crate::version::ApiVersion;

/// Media range requested when the caller does not override it.
pub const DEFAULT_ACCEPT: &str = "application/*+xml";

/// Default per-request timeout.
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(60);

/// What the caller wants sent: method, target, optional body and timeout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    /// HTTP method
    pub method: HttpMethod,
    /// Target endpoint
    pub endpoint: Endpoint,
    /// Body and content type, validated together
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<RequestBody>,
    /// Timeout for each HTTP call made on behalf of this request
    pub api_timeout: Duration,
    /// Replaces `application/*+xml` in the accept header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_override: Option<String>,
}

impl RequestSpec {
    /// Creates a request without a body using the default timeout.
    #[must_use]
    pub const fn new(method: HttpMethod, endpoint: Endpoint) -> Self {
        Self {
            method,
            endpoint,
            body: None,
            api_timeout: DEFAULT_API_TIMEOUT,
            accept_override: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub const fn get(endpoint: Endpoint) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    /// Attaches a body.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, api_timeout: Duration) -> Self {
        self.api_timeout = api_timeout;
        self
    }

    /// Overrides the accepted media range. Blank values are ignored.
    #[must_use]
    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        let accept = accept.into();
        self.accept_override = if accept.trim().is_empty() {
            None
        } else {
            Some(accept.trim().to_string())
        };
        self
    }

    /// Returns the media range without the version parameter.
    #[must_use]
    pub fn accept_media_range(&self) -> &str {
        self.accept_override.as_deref().unwrap_or(DEFAULT_ACCEPT)
    }

    /// Returns the full accept header value for the given version.
    #[must_use]
    pub fn accept_header(&self, version: &ApiVersion) -> String {
        versioned_accept(self.accept_media_range(), version)
    }
}

/// Formats `{media_range};version={version}`.
#[must_use]
pub fn versioned_accept(media_range: &str, version: &ApiVersion) -> String {
    format!("{media_range};version={version}")
}
