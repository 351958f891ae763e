//! Credentials and the headers they map to

use std::fmt;

/// Header carrying a session token.
pub const SESSION_TOKEN_HEADER: &str = "x-vcloud-authorization";

/// Header carrying a JWT access token.
pub const ACCESS_TOKEN_HEADER: &str = "X-VMWARE-VCLOUD-ACCESS-TOKEN";

/// A resolved credential. Exactly one kind is ever in use for a call.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Session token from a previous login.
    SessionToken(String),
    /// JWT access token.
    Jwt(String),
}

impl Credential {
    /// Returns the header name for this credential.
    #[must_use]
    pub const fn header_name(&self) -> &'static str {
        match self {
            Self::SessionToken(_) => SESSION_TOKEN_HEADER,
            Self::Jwt(_) => ACCESS_TOKEN_HEADER,
        }
    }

    /// Returns the header value for this credential, verbatim.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::SessionToken(token) | Self::Jwt(token) => token.clone(),
        }
    }

    /// Short label for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SessionToken(_) => "session token",
            Self::Jwt(_) => "JWT",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionToken(_) => f.write_str("SessionToken(<redacted>)"),
            Self::Jwt(_) => f.write_str("Jwt(<redacted>)"),
        }
    }
}

/// Credentials supplied explicitly by the caller.
///
/// Blank strings count as absent.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ExplicitCredentials {
    /// Session token, sent as `x-vcloud-authorization`.
    pub session_token: Option<String>,
    /// JWT, sent as `X-VMWARE-VCLOUD-ACCESS-TOKEN`.
    pub jwt: Option<String>,
}

impl ExplicitCredentials {
    /// No explicit credentials.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            session_token: None,
            jwt: None,
        }
    }

    /// Only a session token.
    #[must_use]
    pub fn session_token(token: impl Into<String>) -> Self {
        Self {
            session_token: Some(token.into()),
            jwt: None,
        }
    }

    /// Only a JWT.
    #[must_use]
    pub fn jwt(jwt: impl Into<String>) -> Self {
        Self {
            session_token: None,
            jwt: Some(jwt.into()),
        }
    }

    /// Picks the explicit credential: session token first, then JWT.
    #[must_use]
    pub fn resolve(&self) -> Option<Credential> {
        non_blank(self.session_token.as_deref())
            .map(|t| Credential::SessionToken(t.to_string()))
            .or_else(|| non_blank(self.jwt.as_deref()).map(|j| Credential::Jwt(j.to_string())))
    }
}

impl fmt::Debug for ExplicitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExplicitCredentials")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .field("jwt", &self.jwt.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
