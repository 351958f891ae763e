//! File-backed session registry.
//!
//! Sessions established elsewhere (a login script, another tool) can be
//! handed to the invoker through a JSON file:
//!
//! ```json
//! {
//!   "schema_version": 1,
//!   "sessions": {
//!     "vcd.example.com": "0123456789abcdef"
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use vcd_application::SessionStore;

/// Schema version written by this crate.
pub const SESSION_FILE_VERSION: u32 = 1;

/// Errors from reading a sessions file.
#[derive(Debug, Error)]
pub enum SessionFileError {
    /// The file exists but could not be read.
    #[error("failed to read sessions file {path}: {source}")]
    Io {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid sessions document.
    #[error("invalid sessions file {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// The file was written by a newer version.
    #[error("unsupported sessions file version {found} (expected {SESSION_FILE_VERSION})")]
    UnsupportedVersion {
        /// Version found in the file.
        found: u32,
    },
}

/// On-disk layout of a sessions file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFile {
    /// Layout version.
    #[serde(default = "default_version")]
    pub schema_version: u32,
    /// Host to session token.
    #[serde(default)]
    pub sessions: BTreeMap<String, String>,
}

const fn default_version() -> u32 {
    SESSION_FILE_VERSION
}

impl SessionFile {
    /// Parses a sessions document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the version is newer
    /// than [`SESSION_FILE_VERSION`].
    pub fn from_json(path: &Path, content: &[u8]) -> Result<Self, SessionFileError> {
        let file: Self = serde_json::from_slice(content).map_err(|source| SessionFileError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if file.schema_version > SESSION_FILE_VERSION {
            return Err(SessionFileError::UnsupportedVersion {
                found: file.schema_version,
            });
        }
        Ok(file)
    }

    /// Converts the file into a registry.
    #[must_use]
    pub fn into_store(self) -> SessionStore {
        self.sessions.into_iter().collect()
    }
}

/// Loads sessions from `path`. A missing file yields an empty store.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub async fn load_sessions(path: &Path) -> Result<SessionStore, SessionFileError> {
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no sessions file");
            return Ok(SessionStore::new());
        }
        Err(source) => {
            return Err(SessionFileError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let store = SessionFile::from_json(path, &content)?.into_store();
    debug!(path = %path.display(), hosts = store.len(), "loaded sessions file");
    Ok(store)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use vcd_application::SessionRegistry;

    #[tokio::test]
    async fn test_load_sessions() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        tokio::fs::write(
            &path,
            r#"{"schema_version": 1, "sessions": {"VCD.example.com": "tok-1", "other.example.com": "  "}}"#,
        )
        .await
        .unwrap();

        let store = load_sessions(&path).await.unwrap();

        assert_eq!(store.hosts(), vec!["vcd.example.com".to_string()]);
        assert_eq!(store.session_token("vcd.example.com"), Some("tok-1".into()));
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();

        let store = load_sessions(&dir.path().join("absent.json")).await.unwrap();

        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sessions.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let result = load_sessions(&path).await;

        assert!(matches!(result, Err(SessionFileError::Parse { .. })));
    }

    #[test]
    fn test_newer_version_rejected() {
        let result = SessionFile::from_json(Path::new("s.json"), br#"{"schema_version": 2}"#);
        assert!(matches!(
            result,
            Err(SessionFileError::UnsupportedVersion { found: 2 })
        ));
    }

    #[test]
    fn test_version_defaults() {
        let file = SessionFile::from_json(Path::new("s.json"), br#"{"sessions": {}}"#).unwrap();
        assert_eq!(file.schema_version, SESSION_FILE_VERSION);
    }
}
