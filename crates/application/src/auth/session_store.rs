//! In-memory session registry.
//!
//! Maps host names to the session tokens of already established sessions.

use std::collections::HashMap;

use crate::ports::SessionRegistry;

/// Host-keyed session tokens. Host names are matched case-insensitively.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: HashMap<String, String>,
}

impl SessionStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a session token for a host. Blank tokens are ignored.
    pub fn insert(&mut self, host: impl AsRef<str>, token: impl Into<String>) {
        let token = token.into();
        if token.trim().is_empty() {
            return;
        }
        self.sessions.insert(normalize(host.as_ref()), token.trim().to_string());
    }

    /// Hosts with a session, sorted. Tokens are not exposed.
    #[must_use]
    pub fn hosts(&self) -> Vec<String> {
        let mut hosts: Vec<_> = self.sessions.keys().cloned().collect();
        hosts.sort();
        hosts
    }

    /// Get count of stored sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns true if no session is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

fn normalize(host: &str) -> String {
    host.trim().trim_end_matches('.').to_ascii_lowercase()
}

impl SessionRegistry for SessionStore {
    fn session_token(&self, host: &str) -> Option<String> {
        self.sessions.get(&normalize(host)).cloned()
    }
}

impl<H: AsRef<str>, T: Into<String>> FromIterator<(H, T)> for SessionStore {
    fn from_iter<I: IntoIterator<Item = (H, T)>>(iter: I) -> Self {
        let mut store = Self::new();
        for (host, token) in iter {
            store.insert(host, token);
        }
        store
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("hosts", &self.hosts())
            .finish()
    }
}
