//! Target endpoint type

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// An absolute `http`/`https` URL identifying a Cloud Director API entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Endpoint {
    url: Url,
}

impl Endpoint {
    /// Parses and validates an endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] if the URL is malformed, is not
    /// `http`/`https`, or has no host.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidUrl("URL is required".to_string()));
        }

        let url = Url::parse(trimmed).map_err(|e| DomainError::InvalidUrl(format!("{e}: {trimmed}")))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(DomainError::InvalidUrl(format!(
                "URL must start with http:// or https://: {trimmed}"
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(DomainError::InvalidUrl(format!("URL has no host: {trimmed}")));
        }

        Ok(Self { url })
    }

    /// Returns the host name, without port.
    #[must_use]
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// Returns `scheme://host[:port]`.
    #[must_use]
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Returns the version discovery endpoint on the same origin.
    #[must_use]
    pub fn versions_url(&self) -> String {
        format!("{}/api/versions", self.origin())
    }

    /// Returns the full URL as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// Returns the parsed URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

impl FromStr for Endpoint {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Endpoint {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::parse(&value)
    }
}

impl From<Endpoint> for String {
    fn from(endpoint: Endpoint) -> Self {
        endpoint.url.into()
    }
}
