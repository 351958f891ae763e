//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The API version is not a dotted numeric string.
    #[error("invalid API version: {0:?}")]
    InvalidApiVersion(String),

    /// Only one half of the body / content-type pair was supplied.
    #[error("incomplete body: {0}")]
    IncompleteBody(String),

    /// A response body could not be parsed into a document.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
