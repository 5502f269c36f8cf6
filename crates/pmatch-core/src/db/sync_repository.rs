//! Sync bookkeeping for the `SQLite` potential match repository

use std::collections::HashMap;

use rusqlite::{params, OptionalExtension};

use super::repository::{query_matches, SqlitePotentialMatchRepository, WriteOrigin, COLUMNS};
use crate::error::{Error, Result};
use crate::models::{HistoryEntry, PotentialMatch, Tombstone};
use crate::state::SyncStatus;
use crate::sync::{Acknowledgement, SyncSurface};

impl SyncSurface for SqlitePotentialMatchRepository {
    type Record = PotentialMatch;

    fn pending_sync(&self) -> Result<Vec<PotentialMatch>> {
        query_matches(
            self.conn()?,
            &format!(
                "SELECT {COLUMNS} FROM potential_matches
                 WHERE synced = 0
                 ORDER BY updated_at ASC, id ASC"
            ),
            [],
        )
    }

    fn pending_deletes(&self) -> Result<Vec<Tombstone>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, revision, deleted_by, deleted_at
             FROM potential_match_tombstones
             ORDER BY deleted_at ASC, id ASC",
        )?;

        let tombstones = stmt
            .query_map([], |row| {
                Ok(Tombstone {
                    id: row.get("id")?,
                    revision: row.get("revision")?,
                    deleted_by: row.get("deleted_by")?,
                    deleted_at: row.get("deleted_at")?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(tombstones)
    }

    fn identities_and_revisions(&self) -> Result<HashMap<String, String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, revision FROM potential_matches")?;

        let revisions = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
            .collect::<rusqlite::Result<HashMap<_, _>>>()?;

        Ok(revisions)
    }

    fn unsynced_for_current_user(&self) -> Result<Vec<PotentialMatch>> {
        query_matches(
            self.conn()?,
            &format!(
                "SELECT {COLUMNS} FROM potential_matches
                 WHERE synced = 0 AND created_by = ?1
                 ORDER BY updated_at ASC, id ASC"
            ),
            params![self.user_name()],
        )
    }

    fn record_ids_by_owner(&self) -> Result<Vec<String>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id FROM potential_matches WHERE created_by = ?1 ORDER BY id ASC",
        )?;

        let ids = stmt
            .query_map(params![self.user_name()], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        Ok(ids)
    }

    fn created_by_current_user(&self) -> Result<Vec<PotentialMatch>> {
        query_matches(
            self.conn()?,
            &format!(
                "SELECT {COLUMNS} FROM potential_matches
                 WHERE created_by = ?1
                 ORDER BY created_at DESC, id ASC"
            ),
            params![self.user_name()],
        )
    }

    fn upsert_without_history(&self, record: &PotentialMatch) -> Result<()> {
        self.write(record, WriteOrigin::Remote)
    }

    fn mark_synced(&self, sent: &PotentialMatch, revision: &str) -> Result<Acknowledgement> {
        let conn = self.conn()?;
        let tx = conn.unchecked_transaction()?;

        let stored = tx
            .query_row(
                &format!("SELECT {COLUMNS} FROM potential_matches WHERE id = ?1"),
                params![sent.id],
                Self::parse_match,
            )
            .optional()?;

        let outcome = match stored {
            None => Acknowledgement::Missing,
            Some(stored) if stored != *sent => Acknowledgement::Changed,
            Some(_) => {
                tx.execute(
                    "UPDATE potential_matches SET synced = 1, revision = ?1 WHERE id = ?2",
                    params![revision, sent.id],
                )?;
                Acknowledgement::Synced
            }
        };
        tx.commit()?;

        tracing::debug!(
            "Acknowledged potential match {} at revision {revision}: {outcome:?}",
            sent.id
        );
        Ok(outcome)
    }

    fn mark_delete_synced(&self, id: &str) -> Result<bool> {
        let rows = self.conn()?.execute(
            "DELETE FROM potential_match_tombstones WHERE id = ?1",
            params![id],
        )?;

        if rows > 0 {
            tracing::debug!("Acknowledged delete of potential match {id}");
        }
        Ok(rows > 0)
    }
}

impl SqlitePotentialMatchRepository {
    /// Sync state of a stored record, `None` when no record has this id
    pub fn sync_status(&self, id: &str) -> Result<Option<SyncStatus>> {
        let synced = self
            .conn()?
            .query_row(
                "SELECT synced FROM potential_matches WHERE id = ?1",
                params![id],
                |row| row.get::<_, i32>(0),
            )
            .optional()?;

        Ok(synced.map(|flag| SyncStatus::from_flag(flag != 0)))
    }

    /// Local change history of a record, oldest first
    ///
    /// History outlives the record itself, so deleted ids still return entries.
    pub fn history(&self, id: &str) -> Result<Vec<HistoryEntry>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, match_id, action, revision, changed_by, changed_at
             FROM potential_match_history
             WHERE match_id = ?1
             ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map(params![id], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, i64>(5)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(
                |(id, match_id, action, revision, changed_by, changed_at)| -> Result<HistoryEntry> {
                    Ok(HistoryEntry {
                        id,
                        match_id,
                        action: action.parse().map_err(Error::InvalidInput)?,
                        revision,
                        changed_by,
                        changed_at,
                    })
                },
            )
            .collect()
    }
}
