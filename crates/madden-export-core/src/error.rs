//! Error types for export persistence

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while storing or reading back an export
#[derive(Debug, Error)]
pub enum PersistError {
    /// The data directory could not be created
    #[error("failed to create data directory {}: {source}", .path.display())]
    DirectoryCreate { path: PathBuf, source: io::Error },

    /// A parsed payload could not be encoded again
    #[error("failed to serialize export data: {source}")]
    Serialization { source: serde_json::Error },

    /// The export file could not be written
    #[error("failed to write file {}: {source}", .path.display())]
    FileWrite { path: PathBuf, source: io::Error },

    /// A stored export could not be read
    #[error("failed to read file {}: {source}", .path.display())]
    FileRead { path: PathBuf, source: io::Error },

    /// A stored export is not valid JSON
    #[error("invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl PersistError {
    /// Short error kind for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DirectoryCreate { .. } => "DirectoryCreate",
            Self::Serialization { .. } => "Serialization",
            Self::FileWrite { .. } => "FileWrite",
            Self::FileRead { .. } => "FileRead",
            Self::InvalidJson { .. } => "InvalidJson",
        }
    }
}

/// Result type alias for PersistError
pub type Result<T> = std::result::Result<T, PersistError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_path() {
        let err = PersistError::DirectoryCreate {
            path: PathBuf::from("/data/exports"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(err.kind(), "DirectoryCreate");
        assert!(err.to_string().contains("/data/exports"));
        assert!(err.to_string().contains("denied"));

        let err = PersistError::FileWrite {
            path: PathBuf::from("/data/x.json"),
            source: io::Error::new(io::ErrorKind::Other, "disk full"),
        };
        assert_eq!(err.kind(), "FileWrite");
        assert!(err.to_string().starts_with("failed to write file /data/x.json"));
    }
}
