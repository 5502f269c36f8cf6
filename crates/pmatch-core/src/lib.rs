//! pmatch-core - Core library for pmatch
//!
//! This crate contains the potential match model, the `SQLite` storage
//! session, the repository that enforces identity and soft-delete rules,
//! and the sync bookkeeping a synchronizer relies on.

pub mod db;
pub mod error;
pub mod export;
pub mod models;
pub mod state;
pub mod sync;
pub mod util;

pub use error::{Error, Result};
pub use models::{Child, Enquiry, HistoryEntry, PotentialMatch, Tombstone};
pub use state::SyncStatus;
pub use sync::{Acknowledgement, SyncSurface};
