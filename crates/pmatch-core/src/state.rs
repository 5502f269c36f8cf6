//! Per-record sync state.

use serde::{Deserialize, Serialize};

/// Whether a stored record has been acknowledged by the remote side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
    Pending,
    Synced,
}

impl SyncStatus {
    pub(crate) const fn from_flag(synced: bool) -> Self {
        if synced {
            Self::Synced
        } else {
            Self::Pending
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Synced => "synced",
        }
    }
}
