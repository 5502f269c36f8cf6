use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] pmatch_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("{0} cannot be empty")]
    EmptyIdentifier(&'static str),
    #[error("Potential match not found: {0}")]
    MatchNotFound(String),
    #[error("Potential match already exists: {0}")]
    MatchExists(String),
    #[error("Potential match {0} changed before it could be acknowledged")]
    ChangedSinceRead(String),
    #[error("No pending delete for potential match: {0}")]
    DeleteNotPending(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(
        "No acting user configured. Pass --user, set PMATCH_USER, or run `pmatch config set-user <name>`."
    )]
    UserNotConfigured,
}

impl CliError {
    /// Process exit code: 2 when storage itself failed, 1 for everything else
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(error) if error.is_storage_failure() => 2,
            _ => 1,
        }
    }
}
