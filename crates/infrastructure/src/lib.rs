//! vcd Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer.

pub mod adapters;
pub mod session_file;

pub use adapters::{ReqwestHttpClient, TracingObserver};
pub use session_file::{SESSION_FILE_VERSION, SessionFile, SessionFileError, load_sessions};
