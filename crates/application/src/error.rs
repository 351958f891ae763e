//! Application error types

use thiserror::Error;
use vcd_domain::DomainError;
use vcd_domain::response::ResponseSpec;

use crate::ports::HttpClientError;

/// Errors surfaced to callers of the invoker and the version negotiator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VcdError {
    /// No session, token or JWT was available; nothing was sent.
    #[error("no session, session token or JWT available for {host}")]
    AuthenticationMissing {
        /// Host the request was meant for.
        host: String,
    },

    /// The HTTP call failed or returned a non-2xx status.
    #[error("request failed: {message}{}", .resource.as_ref().map(|r| format!(" ({r})")).unwrap_or_default())]
    RequestFailed {
        /// What went wrong.
        message: String,
        /// Resource the failure relates to, usually the request URL.
        resource: Option<String>,
    },

    /// Version discovery found no non-deprecated version.
    #[error("{host} reported no supported, non-deprecated API version")]
    NoVersionsAvailable {
        /// Host that was queried.
        host: String,
    },

    /// A successful response could not be understood.
    #[error("invalid response document: {0}")]
    InvalidDocument(String),

    /// Input validation failed.
    #[error("{0}")]
    Domain(#[from] DomainError),
}

impl VcdError {
    /// Builds a `RequestFailed` from a transport error.
    #[must_use]
    pub fn transport(error: &HttpClientError, resource: impl Into<String>) -> Self {
        Self::RequestFailed {
            message: error.to_string(),
            resource: Some(resource.into()),
        }
    }

    /// Builds a `RequestFailed` from a non-2xx response, preferring the
    /// message of a Cloud Director error body over the status line.
    #[must_use]
    pub fn http_status(response: &ResponseSpec, resource: impl Into<String>) -> Self {
        let detail = response.document().ok().and_then(|doc| doc.error_message());
        let message = match detail {
            Some(detail) => format!("{}: {detail}", response.status),
            None => response.status.to_string(),
        };
        Self::RequestFailed {
            message,
            resource: Some(resource.into()),
        }
    }
}

/// Result type alias for application operations.
pub type VcdResult<T> = Result<T, VcdError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use vcd_domain::request::Headers;

    #[test]
    fn test_request_failed_display() {
        let error = VcdError::RequestFailed {
            message: "403 Forbidden".into(),
            resource: Some("https://h/api/org".into()),
        };
        assert_eq!(error.to_string(), "request failed: 403 Forbidden (https://h/api/org)");

        let bare = VcdError::RequestFailed {
            message: "boom".into(),
            resource: None,
        };
        assert_eq!(bare.to_string(), "request failed: boom");
    }

    #[test]
    fn test_transport_conversion() {
        let error = VcdError::transport(&HttpClientError::Timeout { timeout_ms: 5000 }, "https://h/api");
        assert_eq!(
            error,
            VcdError::RequestFailed {
                message: "request timed out after 5000 ms".into(),
                resource: Some("https://h/api".into()),
            }
        );
    }

    #[test]
    fn test_http_status_uses_error_body() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "application/vnd.vmware.vcloud.error+xml;version=34.0");
        let response = ResponseSpec::new(
            403u16,
            headers,
            r#"<Error message="Access is forbidden" majorErrorCode="403" minorErrorCode="ACCESS_TO_RESOURCE_IS_FORBIDDEN"/>"#,
            Duration::ZERO,
        );
        let error = VcdError::http_status(&response, "https://h/api/vApp/vapp-1");
        assert_eq!(
            error,
            VcdError::RequestFailed {
                message: "403 Forbidden: Access is forbidden (ACCESS_TO_RESOURCE_IS_FORBIDDEN)".into(),
                resource: Some("https://h/api/vApp/vapp-1".into()),
            }
        );
    }

    #[test]
    fn test_http_status_without_body() {
        let response = ResponseSpec::new(502u16, Headers::new(), "", Duration::ZERO);
        let error = VcdError::http_status(&response, "https://h/api");
        assert!(matches!(error, VcdError::RequestFailed { message, .. } if message == "502 Bad Gateway"));
    }

    #[test]
    fn test_domain_error_passthrough() {
        let error: VcdError = DomainError::InvalidApiVersion("x".into()).into();
        assert!(matches!(error, VcdError::Domain(_)));
    }
}
