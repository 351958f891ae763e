//! Session registry port

/// Read-only lookup of active sessions by host.
///
/// The registry is populated elsewhere (an interactive login, a config
/// file); the invoker only ever reads from it.
pub trait SessionRegistry: Send + Sync {
    /// Returns the session token of the active session for `host`, if any.
    fn session_token(&self, host: &str) -> Option<String>;
}

/// A registry with no sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSessions;

impl SessionRegistry for NoSessions {
    fn session_token(&self, _host: &str) -> Option<String> {
        None
    }
}
