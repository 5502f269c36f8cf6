//! Potential match model

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A proposed association between a child and an enquiry, pending confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PotentialMatch {
    /// Unique identifier, may be generated locally before the first sync
    pub id: String,
    /// Local identity of the linked enquiry
    pub enquiry_id: String,
    /// Local identity of the linked child
    pub child_id: String,
    /// Creation timestamp (RFC 3339, UTC). Set once by the constructors.
    pub created_at: String,
    /// Opaque revision token owned by the remote side
    pub revision: String,
    /// Whether a caseworker confirmed the match
    pub confirmed: bool,
    /// Soft delete flag; never persisted
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub deleted: bool,
}

impl PotentialMatch {
    /// Create a new unconfirmed match with a fresh UUID v7 identifier
    #[must_use]
    pub fn new(enquiry_id: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self::with_id(Uuid::now_v7().to_string(), enquiry_id, child_id)
    }

    /// Create a new unconfirmed match with a caller-supplied identifier
    #[must_use]
    pub fn with_id(
        id: impl Into<String>,
        enquiry_id: impl Into<String>,
        child_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            enquiry_id: enquiry_id.into(),
            child_id: child_id.into(),
            created_at: now_timestamp(),
            revision: String::new(),
            confirmed: false,
            deleted: false,
        }
    }

    /// Set the revision token
    #[must_use]
    pub fn revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    /// Set the confirmation flag
    #[must_use]
    pub const fn confirmed(mut self, confirmed: bool) -> Self {
        self.confirmed = confirmed;
        self
    }

    /// Return a copy flagged for deletion
    #[must_use]
    pub fn mark_deleted(&self) -> Self {
        Self {
            deleted: true,
            ..self.clone()
        }
    }
}

fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
