//! Data models for pmatch

mod history;
mod linked;
mod potential_match;

pub use history::{HistoryAction, HistoryEntry, Tombstone};
pub use linked::{Child, Enquiry, LinkedEntity};
pub use potential_match::PotentialMatch;
