//! Invitation identifiers
//!
//! Identifiers are opaque strings. New ones are random v4 UUIDs in their
//! hyphen-less form; anything already stored is accepted as-is.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque key of an invitation within the collection
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvitationId(String);

impl InvitationId {
    /// Generate a fresh identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for InvitationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for InvitationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for InvitationId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl AsRef<str> for InvitationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for InvitationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Generate a new invitation identifier
pub fn generate_id() -> InvitationId {
    InvitationId::generate()
}
