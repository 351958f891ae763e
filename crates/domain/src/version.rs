//! API version types and selection rules

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::document::XmlElement;
use crate::error::{DomainError, DomainResult};

/// A Cloud Director API version such as `"34.0"`.
///
/// Always one or more `.`-separated groups of ASCII digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ApiVersion(String);

impl ApiVersion {
    /// Validates and wraps a version string.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidApiVersion`] if the string is not a
    /// dotted numeric version.
    pub fn new(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if parse_numeric(trimmed).is_none() {
            return Err(DomainError::InvalidApiVersion(raw));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Builds the `"{major}.0"` form used for negotiated versions.
    #[must_use]
    pub fn from_major(major: u64) -> Self {
        Self(format!("{major}.0"))
    }

    /// Returns the version as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ApiVersion {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for ApiVersion {
    type Error = DomainError;

    fn try_from(value: String) -> DomainResult<Self> {
        Self::new(value)
    }
}

impl From<ApiVersion> for String {
    fn from(version: ApiVersion) -> Self {
        version.0
    }
}

/// Parses `major[.minor[...]]` into a comparable `(major, minor)` pair.
fn parse_numeric(raw: &str) -> Option<(u64, u64)> {
    let mut groups = raw.split('.');
    let major = parse_group(groups.next()?)?;
    let minor = match groups.next() {
        Some(group) => parse_group(group)?,
        None => 0,
    };
    for rest in groups {
        parse_group(rest)?;
    }
    Some((major, minor))
}

fn parse_group(group: &str) -> Option<u64> {
    if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    group.parse().ok()
}

/// One entry of the `/api/versions` listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionInfo {
    /// Version string exactly as reported by the server.
    pub version: String,
    /// Whether the server marks this version as deprecated.
    pub deprecated: bool,
}

impl VersionInfo {
    /// Creates a version entry.
    #[must_use]
    pub fn new(version: impl Into<String>, deprecated: bool) -> Self {
        Self {
            version: version.into(),
            deprecated,
        }
    }

    /// Returns the `(major, minor)` pair, or `None` for an unparseable version.
    #[must_use]
    pub fn numeric(&self) -> Option<(u64, u64)> {
        parse_numeric(self.version.trim())
    }

    /// Reads every `VersionInfo` element under a `SupportedVersions` root.
    ///
    /// Entries without a `Version` child are dropped. A missing `deprecated`
    /// attribute means not deprecated.
    #[must_use]
    pub fn from_supported_versions(root: &XmlElement) -> Vec<Self> {
        root.children_named("VersionInfo")
            .filter_map(|info| {
                let version = info.child_text("Version")?;
                let deprecated = info
                    .attribute("deprecated")
                    .is_some_and(|d| d.trim().eq_ignore_ascii_case("true"));
                Some(Self::new(version, deprecated))
            })
            .collect()
    }
}

/// Picks the highest non-deprecated version and renders it as `"{major}.0"`.
///
/// Returns `None` when no eligible entry remains. Entries whose version
/// does not parse are ignored.
#[must_use]
pub fn select_highest(versions: &[VersionInfo]) -> Option<ApiVersion> {
    versions
        .iter()
        .filter(|v| !v.deprecated)
        .filter_map(VersionInfo::numeric)
        .max()
        .map(|(major, _)| ApiVersion::from_major(major))
}
