//! Change history model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of local change recorded in the history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryAction {
    Upsert,
    Delete,
}

impl HistoryAction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Upsert => "upsert",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for HistoryAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upsert" => Ok(Self::Upsert),
            "delete" => Ok(Self::Delete),
            other => Err(format!("unknown history action '{other}'")),
        }
    }
}

/// One locally originated change to a potential match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// History row identifier
    pub id: i64,
    /// Potential match the change applies to
    pub match_id: String,
    pub action: HistoryAction,
    /// Revision carried by the record when the change was made
    pub revision: String,
    /// Acting user that made the change
    pub changed_by: String,
    /// Change timestamp (unix ms)
    pub changed_at: i64,
}

/// A local delete the remote side has not acknowledged yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tombstone {
    /// Id of the deleted potential match
    pub id: String,
    /// Revision the record carried when it was deleted
    pub revision: String,
    pub deleted_by: String,
    /// Deletion timestamp (unix ms)
    pub deleted_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_parses_its_own_display() {
        for action in [HistoryAction::Upsert, HistoryAction::Delete] {
            assert_eq!(action.to_string().parse::<HistoryAction>(), Ok(action));
        }
        assert!("merge".parse::<HistoryAction>().is_err());
    }
}
