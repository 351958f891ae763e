//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It handles all HTTP communication with Cloud Director.

use std::future::Future;
use std::time::Instant;

use reqwest::{Client, Method, Url};
use tracing::debug;
use vcd_application::ports::{HttpClient, HttpClientError};
use vcd_domain::{
    request::{Headers, HttpMethod, OutgoingRequest},
    response::ResponseSpec,
};

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Holds two `reqwest::Client`s: one validating certificates and one that
/// accepts any certificate. Each request picks one through
/// [`OutgoingRequest::skip_cert_check`], so the policy never leaks from one
/// call into the next.
pub struct ReqwestHttpClient {
    strict: Client,
    insecure: Client,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// Default configuration:
    /// - Follow redirects: up to 10
    /// - User-Agent: "vcd/<version>"
    /// - Timeout: per request, taken from the request itself
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        Ok(Self {
            strict: Self::builder()
                .build()
                .map_err(|e| HttpClientError::Other(e.to_string()))?,
            insecure: Self::builder()
                .danger_accept_invalid_certs(true)
                .build()
                .map_err(|e| HttpClientError::Other(e.to_string()))?,
        })
    }

    /// Creates a new HTTP client around custom reqwest clients.
    #[must_use]
    pub const fn with_clients(strict: Client, insecure: Client) -> Self {
        Self { strict, insecure }
    }

    fn builder() -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(concat!("vcd/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
            HttpMethod::Options => Method::OPTIONS,
        }
    }

    /// Maps reqwest errors to `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            // reqwest keeps the interesting part in the source chain
            let message = error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(443),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(error_chain(error))
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: &OutgoingRequest,
    ) -> impl Future<Output = Result<ResponseSpec, HttpClientError>> + Send {
        let client = if request.skip_cert_check {
            self.insecure.clone()
        } else {
            self.strict.clone()
        };
        let method = request.method;
        let url = request.url.clone();
        let headers = request.headers.clone();
        let body = request.body.clone();
        let timeout = request.timeout;

        async move {
            let parsed_url =
                Url::parse(&url).map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {url}")))?;
            let timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);

            let start = Instant::now();

            let mut builder = client
                .request(Self::to_reqwest_method(method), parsed_url)
                .timeout(timeout);

            for header in headers.iter() {
                builder = builder.header(&header.name, &header.value);
            }

            // Content-Type only ever travels with its body
            if let Some(body) = body {
                builder = builder
                    .header("Content-Type", body.content_type())
                    .body(body.content().to_string());
            }

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();

            let mut response_headers = Headers::new();
            for (name, value) in response.headers() {
                response_headers.insert(name.as_str(), value.to_str().unwrap_or("<binary>"));
            }

            let text = response
                .text()
                .await
                .map_err(|e| HttpClientError::Other(format!("failed to read body: {e}")))?;

            let duration = start.elapsed();
            debug!(%status, elapsed_ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX), "transport call finished");

            Ok(ResponseSpec::new(status, response_headers, text, duration))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Put),
            Method::PUT
        );
        assert_eq!(
            ReqwestHttpClient::to_reqwest_method(HttpMethod::Delete),
            Method::DELETE
        );
    }

    #[test]
    fn test_client_creation() {
        let client = ReqwestHttpClient::new();
        assert!(client.is_ok());
    }

    #[test]
    fn test_error_chain_joins_sources() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(error_chain(&io), "refused");
    }
}
