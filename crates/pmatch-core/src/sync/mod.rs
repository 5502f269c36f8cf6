//! Sync bookkeeping exposed to a synchronizer.
//!
//! The store does not talk to any server. It records which local changes
//! have not been acknowledged yet and lets a synchronizer apply remote
//! changes without reporting them back as local ones.
//!
//! A synchronizer reads `pending_sync` and `pending_deletes`, sends them,
//! then acknowledges each one with `mark_synced` / `mark_delete_synced`.
//! An acknowledgement only applies to the state that was read: a record
//! changed locally in between stays pending.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::Tombstone;

/// Result of acknowledging a sent record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acknowledgement {
    /// The stored record matched what was sent and is now synced
    Synced,
    /// The record changed locally after it was read; it stays pending
    Changed,
    /// No record with this id is stored
    Missing,
}

/// Operations a synchronizer polls to discover and acknowledge local changes
pub trait SyncSurface {
    /// Record type stored by the underlying repository
    type Record;

    /// Every live record whose local state has not been acknowledged yet
    fn pending_sync(&self) -> Result<Vec<Self::Record>>;

    /// Local deletes not acknowledged yet, oldest first
    ///
    /// Deleted records no longer appear in `pending_sync`, so this is the
    /// only place a synchronizer learns about them.
    fn pending_deletes(&self) -> Result<Vec<Tombstone>>;

    /// Revision of every live record, keyed by id
    fn identities_and_revisions(&self) -> Result<HashMap<String, String>>;

    /// Pending records first written by the acting user
    fn unsynced_for_current_user(&self) -> Result<Vec<Self::Record>>;

    /// Ids of records first written by the acting user
    ///
    /// Records first written through `upsert_without_history` have no owner.
    fn record_ids_by_owner(&self) -> Result<Vec<String>>;

    /// Records first written by the acting user
    fn created_by_current_user(&self) -> Result<Vec<Self::Record>>;

    /// Apply a write that came from the remote copy
    ///
    /// Same storage effect as `Repository::upsert`, but no history entry is
    /// appended and the record is not reported by `pending_sync`.
    fn upsert_without_history(&self, record: &Self::Record) -> Result<()>;

    /// Acknowledge `sent`, storing the revision assigned by the remote side
    ///
    /// Only succeeds while the stored record still equals `sent`.
    fn mark_synced(&self, sent: &Self::Record, revision: &str) -> Result<Acknowledgement>;

    /// Acknowledge a local delete; `false` when none is pending for this id
    fn mark_delete_synced(&self, id: &str) -> Result<bool>;

    /// Whether anything is waiting to be sent
    fn has_pending(&self) -> Result<bool> {
        Ok(!self.pending_sync()?.is_empty() || !self.pending_deletes()?.is_empty())
    }
}
