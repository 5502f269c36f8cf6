//! Potential match repository implementation

#![allow(clippy::cast_possible_wrap)] // SQLite uses i64 for LIMIT/OFFSET

use rusqlite::{params, Connection};

use super::Session;
use crate::error::{Error, Result};
use crate::models::{Child, Enquiry, HistoryAction, LinkedEntity, PotentialMatch};
use crate::util::unix_millis_now;

/// Column list shared by every SELECT on `potential_matches`
pub(crate) const COLUMNS: &str = "id, enquiry_id, child_id, created_at, revision, confirmed";

/// Trait for record storage operations
pub trait Repository {
    /// Record type stored by this repository
    type Record;

    /// Whether a live record with this exact id is stored
    fn exists(&self, id: &str) -> Result<bool>;

    /// Get a record by ID
    fn get(&self, id: &str) -> Result<Option<Self::Record>>;

    /// Create or fully replace a record, or delete it when it is flagged deleted
    fn upsert(&self, record: &Self::Record) -> Result<()>;

    /// Remove the stored record with the same id, if any
    fn delete(&self, record: &Self::Record) -> Result<()>;

    /// Number of live records
    fn size(&self) -> Result<usize>;

    /// List records, newest first
    fn list(&self, limit: usize, offset: usize) -> Result<Vec<Self::Record>>;

    /// Release the storage session
    fn close(&mut self) -> Result<()>;
}

/// Owner stored on rows first written from the remote copy
const REMOTE_OWNER: &str = "";

/// Whether a write is a local change that must be reported to the remote side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteOrigin {
    /// Made on this device: appends history and leaves the row pending
    Local,
    /// Applied from the remote copy: no history, row already acknowledged
    Remote,
}

/// `SQLite` implementation of `Repository` for potential matches
///
/// Bound to one storage session and one acting user for its whole lifetime.
pub struct SqlitePotentialMatchRepository {
    session: Option<Session>,
    user_name: String,
}

impl SqlitePotentialMatchRepository {
    /// Create a new repository owning the given session, acting as `user_name`
    pub fn new(session: Session, user_name: impl Into<String>) -> Self {
        Self {
            session: Some(session),
            user_name: user_name.into(),
        }
    }

    /// The acting user bound at construction
    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    /// Whether the session has been released
    pub const fn is_closed(&self) -> bool {
        self.session.is_none()
    }

    pub(crate) fn conn(&self) -> Result<&Connection> {
        self.session
            .as_ref()
            .map(Session::connection)
            .ok_or(Error::SessionClosed)
    }

    /// All potential matches for the given enquiry
    ///
    /// An enquiry without a local identity has no matches; storage is not queried.
    pub fn find_by_enquiry(&self, enquiry: &Enquiry) -> Result<Vec<PotentialMatch>> {
        let Some(enquiry_id) = enquiry.local_identity() else {
            return Ok(Vec::new());
        };

        query_matches(
            self.conn()?,
            &format!("SELECT {COLUMNS} FROM potential_matches WHERE enquiry_id = ?1"),
            params![enquiry_id],
        )
    }

    /// All potential matches for the given child
    ///
    /// A child without a local identity has no matches; storage is not queried.
    pub fn find_by_child(&self, child: &Child) -> Result<Vec<PotentialMatch>> {
        let Some(child_id) = child.local_identity() else {
            return Ok(Vec::new());
        };

        query_matches(
            self.conn()?,
            &format!("SELECT {COLUMNS} FROM potential_matches WHERE child_id = ?1"),
            params![child_id],
        )
    }

    /// Write or delete a record in one transaction
    pub(crate) fn write(&self, record: &PotentialMatch, origin: WriteOrigin) -> Result<()> {
        if record.deleted {
            return self.remove(&record.id, &record.revision, origin);
        }

        let conn = self.conn()?;
        let now = unix_millis_now();
        let owner = match origin {
            WriteOrigin::Local => self.user_name.as_str(),
            WriteOrigin::Remote => REMOTE_OWNER,
        };
        let tx = conn.unchecked_transaction()?;

        // created_by is kept from the first write; everything else is replaced
        tx.execute(
            "INSERT INTO potential_matches
                 (id, enquiry_id, child_id, created_at, revision, confirmed, created_by, synced, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(id) DO UPDATE SET
                 enquiry_id = excluded.enquiry_id,
                 child_id = excluded.child_id,
                 created_at = excluded.created_at,
                 revision = excluded.revision,
                 confirmed = excluded.confirmed,
                 synced = excluded.synced,
                 updated_at = excluded.updated_at",
            params![
                record.id,
                record.enquiry_id,
                record.child_id,
                record.created_at,
                record.revision,
                format_flag(record.confirmed),
                owner,
                i32::from(origin == WriteOrigin::Remote),
                now
            ],
        )?;

        // A live row supersedes any delete still waiting to be sent
        tx.execute(
            "DELETE FROM potential_match_tombstones WHERE id = ?1",
            params![record.id],
        )?;

        if origin == WriteOrigin::Local {
            append_history(
                &tx,
                &record.id,
                HistoryAction::Upsert,
                &record.revision,
                &self.user_name,
                now,
            )?;
        }

        tx.commit()?;
        tracing::debug!("Stored potential match {} ({origin:?})", record.id);
        Ok(())
    }

    fn remove(&self, id: &str, revision: &str, origin: WriteOrigin) -> Result<()> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;

        let rows = tx.execute("DELETE FROM potential_matches WHERE id = ?1", params![id])?;

        match origin {
            WriteOrigin::Local if rows > 0 => {
                let now = unix_millis_now();
                append_history(
                    &tx,
                    id,
                    HistoryAction::Delete,
                    revision,
                    &self.user_name,
                    now,
                )?;
                tx.execute(
                    "INSERT INTO potential_match_tombstones (id, revision, deleted_by, deleted_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT(id) DO UPDATE SET
                         revision = excluded.revision,
                         deleted_by = excluded.deleted_by,
                         deleted_at = excluded.deleted_at",
                    params![id, revision, self.user_name, now],
                )?;
            }
            WriteOrigin::Local => {}
            WriteOrigin::Remote => {
                tx.execute(
                    "DELETE FROM potential_match_tombstones WHERE id = ?1",
                    params![id],
                )?;
            }
        }

        tx.commit()?;
        tracing::debug!("Deleted potential match {id} ({rows} row(s), {origin:?})");
        Ok(())
    }

    /// Parse a potential match from a database row
    pub(crate) fn parse_match(row: &rusqlite::Row<'_>) -> rusqlite::Result<PotentialMatch> {
        Ok(PotentialMatch {
            id: row.get("id")?,
            enquiry_id: row.get("enquiry_id")?,
            child_id: row.get("child_id")?,
            created_at: row.get("created_at")?,
            revision: row.get("revision")?,
            confirmed: parse_flag(&row.get::<_, String>("confirmed")?),
            deleted: false,
        })
    }
}

impl Repository for SqlitePotentialMatchRepository {
    type Record = PotentialMatch;

    fn exists(&self, id: &str) -> Result<bool> {
        let exists = self.conn()?.query_row(
            "SELECT EXISTS(SELECT 1 FROM potential_matches WHERE id = ?1)",
            params![id],
            |row| row.get::<_, i32>(0),
        )?;

        Ok(exists != 0)
    }

    fn get(&self, id: &str) -> Result<Option<PotentialMatch>> {
        let result = self.conn()?.query_row(
            &format!("SELECT {COLUMNS} FROM potential_matches WHERE id = ?1"),
            params![id],
            Self::parse_match,
        );

        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn upsert(&self, record: &PotentialMatch) -> Result<()> {
        self.write(record, WriteOrigin::Local)
    }

    fn delete(&self, record: &PotentialMatch) -> Result<()> {
        self.remove(&record.id, &record.revision, WriteOrigin::Local)
    }

    fn size(&self) -> Result<usize> {
        let count = self
            .conn()?
            .query_row("SELECT COUNT(*) FROM potential_matches", [], |row| {
                row.get::<_, usize>(0)
            })?;

        Ok(count)
    }

    fn list(&self, limit: usize, offset: usize) -> Result<Vec<PotentialMatch>> {
        query_matches(
            self.conn()?,
            &format!(
                "SELECT {COLUMNS} FROM potential_matches
                 ORDER BY created_at DESC, id ASC
                 LIMIT ?1 OFFSET ?2"
            ),
            params![limit as i64, offset as i64],
        )
    }

    fn close(&mut self) -> Result<()> {
        let session = self.session.take().ok_or(Error::SessionClosed)?;
        session.close()
    }
}

impl Drop for SqlitePotentialMatchRepository {
    fn drop(&mut self) {
        if let Some(session) = self.session.take() {
            if let Err(error) = session.close() {
                tracing::error!("Potential match repository dropped without a clean close: {error}");
            }
        }
    }
}

/// Run a SELECT and map every row; the statement is released when this returns
pub(crate) fn query_matches<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<PotentialMatch>> {
    let mut stmt = conn.prepare(sql)?;

    let matches = stmt
        .query_map(params, SqlitePotentialMatchRepository::parse_match)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(matches)
}

fn append_history(
    conn: &Connection,
    match_id: &str,
    action: HistoryAction,
    revision: &str,
    changed_by: &str,
    changed_at: i64,
) -> Result<()> {
    conn.execute(
        "INSERT INTO potential_match_history (match_id, action, revision, changed_by, changed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![match_id, action.as_str(), revision, changed_by, changed_at],
    )?;
    Ok(())
}

const fn format_flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
