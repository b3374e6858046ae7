// Error taxonomy for the analyzers

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Failure raised inside an analyzer before it is folded into a result record
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("No package.json found at {}", .0.display())]
    ManifestMissing(PathBuf),

    #[error("Failed to parse package.json: {0}")]
    ManifestInvalid(String),

    #[error("Traversal stopped after visiting {limit} entries")]
    Truncated { limit: usize },

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalysisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::ManifestMissing(_) => ErrorKind::ManifestMissing,
            Self::ManifestInvalid(_) => ErrorKind::ManifestInvalid,
            Self::Truncated { .. } => ErrorKind::Truncated,
            Self::Io { .. } => ErrorKind::Io,
        }
    }
}

impl From<walkdir::Error> for AnalysisError {
    fn from(err: walkdir::Error) -> Self {
        let path = err.path().map(PathBuf::from).unwrap_or_default();
        match err.into_io_error() {
            Some(source) => Self::Io { path, source },
            // Loop detection only fires when following links, which we never do
            None => Self::io(path, std::io::Error::other("filesystem loop detected")),
        }
    }
}

/// Serializable tag carried next to the `error` message of a failed result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    ManifestMissing,
    ManifestInvalid,
    Truncated,
    Io,
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            AnalysisError::NotFound(PathBuf::from("/x")).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AnalysisError::ManifestInvalid("bad".into()).kind(),
            ErrorKind::ManifestInvalid
        );
        assert_eq!(
            AnalysisError::Truncated { limit: 3 }.kind(),
            ErrorKind::Truncated
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AnalysisError::NotFound(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Path not found: /missing");

        let err = AnalysisError::Truncated { limit: 10 };
        assert!(err.to_string().contains("10"));
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let json = serde_json::to_string(&ErrorKind::ManifestMissing).unwrap();
        assert_eq!(json, "\"manifest_missing\"");
    }
}
