//! HTTP Request body types

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Request body with its content type.
///
/// The two halves only ever travel together: a body cannot exist without a
/// content type, and an empty body is not a body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestBody {
    content_type: String,
    content: String,
}

impl RequestBody {
    /// Creates a body.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IncompleteBody`] if either half is blank.
    pub fn new(content_type: impl Into<String>, content: impl Into<String>) -> DomainResult<Self> {
        let content_type = content_type.into();
        let content = content.into();

        if content_type.trim().is_empty() {
            return Err(DomainError::IncompleteBody(
                "a body requires a content type".to_string(),
            ));
        }
        if content.trim().is_empty() {
            return Err(DomainError::IncompleteBody(format!(
                "content type {content_type} given with an empty body"
            )));
        }

        Ok(Self {
            content_type: content_type.trim().to_string(),
            content,
        })
    }

    /// Builds an optional body from two optional halves.
    ///
    /// Both absent (or blank) yields `None`; both present yields a body.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IncompleteBody`] when only one half is supplied.
    pub fn from_parts(content_type: Option<String>, content: Option<String>) -> DomainResult<Option<Self>> {
        let content_type = content_type.filter(|ct| !ct.trim().is_empty());
        let content = content.filter(|c| !c.trim().is_empty());

        match (content_type, content) {
            (None, None) => Ok(None),
            (Some(ct), Some(body)) => Self::new(ct, body).map(Some),
            (Some(ct), None) => Err(DomainError::IncompleteBody(format!(
                "content type {ct} given without a body"
            ))),
            (None, Some(_)) => Err(DomainError::IncompleteBody(
                "body given without a content type".to_string(),
            )),
        }
    }

    /// Returns the content type.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Returns the body text.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }
}
