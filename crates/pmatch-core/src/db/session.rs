//! Storage session management

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use super::migrations;
use crate::error::{Error, Result};

/// An open connection to the potential match store
///
/// The session owns the underlying `SQLite` handle. It is released either
/// explicitly through [`Session::close`], which reports failures, or
/// implicitly on drop.
pub struct Session {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Session {
    /// Open a session on the database file at the given path, creating it if it doesn't exist
    ///
    /// Runs migrations automatically.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        let session = Self {
            conn,
            path: Some(path),
        };
        session.configure()?;
        session.migrate()?;
        tracing::debug!("Opened storage session at {}", session.describe());
        Ok(session)
    }

    /// Open an in-memory session (useful for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let session = Self { conn, path: None };
        session.configure()?;
        session.migrate()?;
        Ok(session)
    }

    /// Configure `SQLite` for a single-writer local store
    fn configure(&self) -> Result<()> {
        // In-memory databases report "memory" and keep their journal mode
        self.conn
            .pragma_update_and_check(None, "journal_mode", "WAL", |row| {
                row.get::<_, String>(0)
            })
            .ok();
        self.conn.pragma_update(None, "synchronous", "NORMAL").ok();
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }

    /// Run database migrations
    fn migrate(&self) -> Result<()> {
        migrations::run(&self.conn)
    }

    /// Get a reference to the underlying connection
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Path of the backing file, `None` for in-memory sessions
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Release the connection, surfacing any failure to the caller
    pub fn close(self) -> Result<()> {
        let description = self.describe();
        self.conn.close().map_err(|(_conn, error)| {
            tracing::error!("Failed to close storage session {description}: {error}");
            Error::ResourceRelease(error.to_string())
        })?;
        tracing::debug!("Closed storage session {description}");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path
            .as_ref()
            .map_or_else(|| ":memory:".to_string(), |path| path.display().to_string())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("Session")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_in_memory() {
        let session = Session::open_in_memory().unwrap();
        assert!(session.path().is_none());
        session.close().unwrap();
    }

    #[test]
    fn test_open_file_creates_parent_directories() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("nested").join("pmatch.db");

        let session = Session::open(&db_path).unwrap();
        assert_eq!(session.path(), Some(db_path.as_path()));
        assert!(db_path.exists());
        session.close().unwrap();
    }

    #[test]
    fn test_reopen_keeps_schema() {
        let tmp = tempdir().unwrap();
        let db_path = tmp.path().join("pmatch.db");

        Session::open(&db_path).unwrap().close().unwrap();
        let session = Session::open(&db_path).unwrap();

        let count: i64 = session
            .connection()
            .query_row("SELECT COUNT(*) FROM potential_matches", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(count, 0);
    }
}
