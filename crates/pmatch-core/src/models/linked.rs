//! Entities a potential match links together
//!
//! Children and enquiries are owned by other parts of the application. The
//! store only ever reads their local identity, which is absent until the
//! entity has been saved on this device.

use serde::{Deserialize, Serialize};

/// Anything a potential match can be looked up by
pub trait LinkedEntity {
    /// Local identity, `None` when the entity has not been stored yet
    fn internal_id(&self) -> Option<&str>;

    /// Local identity if it is present and non-empty
    fn local_identity(&self) -> Option<&str> {
        self.internal_id().filter(|id| !id.is_empty())
    }
}

/// A child record, as seen by the potential match store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    pub internal_id: Option<String>,
}

impl Child {
    #[must_use]
    pub fn new(internal_id: impl Into<String>) -> Self {
        Self {
            internal_id: Some(internal_id.into()),
        }
    }

    /// A child that has not been stored locally yet
    #[must_use]
    pub const fn unsaved() -> Self {
        Self { internal_id: None }
    }
}

impl LinkedEntity for Child {
    fn internal_id(&self) -> Option<&str> {
        self.internal_id.as_deref()
    }
}

/// An enquiry record, as seen by the potential match store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enquiry {
    pub internal_id: Option<String>,
}

impl Enquiry {
    #[must_use]
    pub fn new(internal_id: impl Into<String>) -> Self {
        Self {
            internal_id: Some(internal_id.into()),
        }
    }

    /// An enquiry that has not been stored locally yet
    #[must_use]
    pub const fn unsaved() -> Self {
        Self { internal_id: None }
    }
}

impl LinkedEntity for Enquiry {
    fn internal_id(&self) -> Option<&str> {
        self.internal_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_identity_rejects_missing_and_empty() {
        assert_eq!(Child::unsaved().local_identity(), None);
        assert_eq!(Child::new("").local_identity(), None);
        assert_eq!(Enquiry::new("e1").local_identity(), Some("e1"));
    }
}
