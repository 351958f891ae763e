//! Authentication for outgoing requests.
//!
//! This module provides:
//! - An in-memory session registry keyed by host
//! - Credential resolution in registry, session token, JWT order

mod resolver;
mod session_store;

pub use resolver::resolve_credential;
pub use session_store::SessionStore;
