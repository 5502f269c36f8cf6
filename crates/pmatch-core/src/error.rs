//! Error types for pmatch-core

use thiserror::Error;

/// Result type alias using pmatch-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pmatch-core operations
///
/// A missing record is never an error: lookups return `Option`/`bool`.
#[derive(Error, Debug)]
pub enum Error {
    /// The storage engine could not execute a statement
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(#[from] rusqlite::Error),

    /// The storage session has already been released
    #[error("Storage session is closed")]
    SessionClosed,

    /// Releasing the storage session failed
    #[error("Failed to release storage session: {0}")]
    ResourceRelease(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error came from the storage engine rather than the caller
    pub const fn is_storage_failure(&self) -> bool {
        matches!(
            self,
            Self::StorageUnavailable(_) | Self::SessionClosed | Self::ResourceRelease(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_errors_are_classified() {
        assert!(Error::SessionClosed.is_storage_failure());
        assert!(Error::ResourceRelease("busy".into()).is_storage_failure());
        assert!(!Error::InvalidInput("id".into()).is_storage_failure());
    }

    #[test]
    fn display_includes_cause() {
        let error = Error::ResourceRelease("database is locked".into());
        assert_eq!(
            error.to_string(),
            "Failed to release storage session: database is locked"
        );
    }
}
