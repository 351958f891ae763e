//! Credential resolution.

use tracing::debug;
use vcd_domain::{Credential, ExplicitCredentials};

use crate::error::{VcdError, VcdResult};
use crate::ports::SessionRegistry;

/// Picks the credential for a request to `host`.
///
/// Order: an active session for the host in the registry, then the explicit
/// session token, then the explicit JWT.
///
/// # Errors
///
/// Returns [`VcdError::AuthenticationMissing`] when none is available.
pub fn resolve_credential(
    registry: &dyn SessionRegistry,
    host: &str,
    explicit: &ExplicitCredentials,
) -> VcdResult<Credential> {
    if let Some(token) = registry
        .session_token(host)
        .filter(|t| !t.trim().is_empty())
    {
        debug!(host, "using active session from registry");
        return Ok(Credential::SessionToken(token));
    }

    let credential = explicit.resolve().ok_or_else(|| VcdError::AuthenticationMissing {
        host: host.to_string(),
    })?;
    debug!(host, kind = credential.kind(), "using explicit credential");
    Ok(credential)
}
