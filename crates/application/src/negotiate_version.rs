//! Negotiate Version Use Case
//!
//! Asks an endpoint which API versions it supports and picks the highest
//! one that is not deprecated. The listing is fetched on every call; the
//! server may be upgraded between sessions.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};
use vcd_domain::request::{DEFAULT_ACCEPT, OutgoingRequest};
use vcd_domain::{ApiVersion, Endpoint, VersionInfo, select_highest};

use crate::error::{VcdError, VcdResult};
use crate::ports::HttpClient;

/// Use case for API version discovery.
///
/// # Example
///
/// ```ignore
/// let negotiator = VersionNegotiator::new(Arc::new(ReqwestHttpClient::new()?));
/// let endpoint = Endpoint::parse("https://vcd.example.com")?;
/// let version = negotiator
///     .highest_supported_version(&endpoint, Duration::from_secs(30), false)
///     .await?;
/// assert_eq!(version.as_str(), "38.0");
/// ```
pub struct VersionNegotiator<C: HttpClient> {
    client: Arc<C>,
}

impl<C: HttpClient> Clone for VersionNegotiator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

impl<C: HttpClient> VersionNegotiator<C> {
    /// Creates a negotiator using the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Queries `/api/versions` on the endpoint's origin without
    /// authentication and returns the highest non-deprecated version as
    /// `"{major}.0"`.
    ///
    /// # Errors
    ///
    /// - [`VcdError::RequestFailed`] on transport failure or a non-2xx status
    /// - [`VcdError::InvalidDocument`] if the listing is not an XML document
    /// - [`VcdError::NoVersionsAvailable`] if every version is deprecated
    pub async fn highest_supported_version(
        &self,
        endpoint: &Endpoint,
        timeout: Duration,
        skip_cert_check: bool,
    ) -> VcdResult<ApiVersion> {
        let url = endpoint.versions_url();
        let request = OutgoingRequest::get(url.clone(), timeout)
            .with_header("Accept", DEFAULT_ACCEPT)
            .skip_cert_check(skip_cert_check);

        debug!(url = %url, "querying supported API versions");
        let response = self
            .client
            .execute(&request)
            .await
            .map_err(|e| VcdError::transport(&e, url.clone()))?;

        if !response.is_success() {
            return Err(VcdError::http_status(&response, url));
        }

        let document = response
            .document()
            .map_err(|e| VcdError::InvalidDocument(e.to_string()))?;
        let root = document.as_xml().ok_or_else(|| {
            VcdError::InvalidDocument(format!("version listing from {url} is not XML"))
        })?;

        let versions = VersionInfo::from_supported_versions(root);
        for skipped in versions.iter().filter(|v| v.numeric().is_none()) {
            warn!(version = %skipped.version, "ignoring unparseable API version");
        }

        let selected = select_highest(&versions).ok_or_else(|| VcdError::NoVersionsAvailable {
            host: endpoint.host().to_string(),
        })?;

        info!(host = endpoint.host(), version = %selected, "negotiated API version");
        Ok(selected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ports::HttpClientError;
    use crate::test_support::{MockHttpClient, VERSIONS, xml};
    use pretty_assertions::assert_eq;

    fn endpoint() -> Endpoint {
        Endpoint::parse("https://vcd.example.com/api/org/1").unwrap()
    }

    #[tokio::test]
    async fn test_picks_highest_non_deprecated() {
        let client = Arc::new(MockHttpClient::new([xml(200, VERSIONS)]));
        let negotiator = VersionNegotiator::new(Arc::clone(&client));

        let version = negotiator
            .highest_supported_version(&endpoint(), Duration::from_secs(10), false)
            .await
            .unwrap();

        assert_eq!(version.as_str(), "34.0");
    }

    #[tokio::test]
    async fn test_request_shape() {
        let client = Arc::new(MockHttpClient::new([xml(200, VERSIONS)]));
        let negotiator = VersionNegotiator::new(Arc::clone(&client));

        negotiator
            .highest_supported_version(&endpoint(), Duration::from_secs(7), true)
            .await
            .unwrap();

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.url, "https://vcd.example.com/api/versions");
        assert_eq!(request.headers.get("Accept"), Some("application/*+xml"));
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.timeout, Duration::from_secs(7));
        assert!(request.skip_cert_check);
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_only_deprecated_versions() {
        let listing = r#"<SupportedVersions>
            <VersionInfo deprecated="true"><Version>27.0</Version></VersionInfo>
            <VersionInfo deprecated="true"><Version>29.0</Version></VersionInfo>
        </SupportedVersions>"#;
        let client = Arc::new(MockHttpClient::new([xml(200, listing)]));
        let negotiator = VersionNegotiator::new(client);

        let result = negotiator
            .highest_supported_version(&endpoint(), Duration::from_secs(10), false)
            .await;

        assert_eq!(
            result,
            Err(VcdError::NoVersionsAvailable {
                host: "vcd.example.com".into()
            })
        );
    }

    #[tokio::test]
    async fn test_network_failure() {
        let client = Arc::new(MockHttpClient::new([Err(HttpClientError::Timeout { timeout_ms: 10_000 })]));
        let negotiator = VersionNegotiator::new(client);

        let result = negotiator
            .highest_supported_version(&endpoint(), Duration::from_secs(10), false)
            .await;

        assert!(matches!(
            result,
            Err(VcdError::RequestFailed { resource: Some(r), .. }) if r == "https://vcd.example.com/api/versions"
        ));
    }

    #[tokio::test]
    async fn test_non_success_status() {
        let client = Arc::new(MockHttpClient::new([xml(503, "")]));
        let negotiator = VersionNegotiator::new(client);

        let result = negotiator
            .highest_supported_version(&endpoint(), Duration::from_secs(10), false)
            .await;

        assert!(matches!(result, Err(VcdError::RequestFailed { message, .. }) if message.starts_with("503")));
    }
}
