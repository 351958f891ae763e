//! Request methods
//!
//! Cloud Director reads with `GET`, starts actions and creates objects with
//! `POST`, and edits or removes them with `PUT` and `DELETE`. The remaining
//! verbs are accepted so that any endpoint can be reached.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// Method of one API call. Parsed case-insensitively from user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// Read a resource or poll a task.
    #[default]
    Get,
    /// Run an action such as `power/action/powerOn`.
    Post,
    /// Replace a resource representation.
    Put,
    #[allow(missing_docs)]
    Patch,
    /// Remove a resource; usually answered with a task.
    Delete,
    #[allow(missing_docs)]
    Head,
    #[allow(missing_docs)]
    Options,
}

impl HttpMethod {
    /// Wire name of the method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        let name = s.trim();
        [
            Self::Get,
            Self::Post,
            Self::Put,
            Self::Patch,
            Self::Delete,
            Self::Head,
            Self::Options,
        ]
        .into_iter()
        .find(|method| method.as_str().eq_ignore_ascii_case(name))
        .ok_or_else(|| DomainError::UnsupportedMethod(name.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_spellings() {
        assert_eq!("post".parse::<HttpMethod>().unwrap(), HttpMethod::Post);
        assert_eq!(" Delete\n".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert_eq!("GET".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
    }

    #[test]
    fn test_wire_name_round_trips_through_display() {
        assert_eq!(HttpMethod::Put.to_string(), "PUT");
        assert_eq!(HttpMethod::default().as_str(), "GET");
    }

    #[test]
    fn test_unknown_verb_is_rejected() {
        assert_eq!(
            "FETCH".parse::<HttpMethod>(),
            Err(DomainError::UnsupportedMethod("FETCH".to_string()))
        );
    }
}
