//! User Types

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::capability::Capabilities;

/// Deletion request state of a user record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionRequestState {
    /// No deletion request is pending.
    #[default]
    None,
    /// A deletion request is awaiting external approval.
    Requested,
}

/// A user record as held by the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: Uuid,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Role id (key into the role table).
    pub role: String,
    /// Feature areas this user may access.
    #[serde(default)]
    pub capabilities: Capabilities,
    /// Pending deletion state.
    #[serde(default)]
    pub deletion_request_state: DeletionRequestState,
}

impl User {
    /// "First Last", trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    /// Whether a deletion request is awaiting approval.
    #[must_use]
    pub const fn has_pending_deletion(&self) -> bool {
        matches!(self.deletion_request_state, DeletionRequestState::Requested)
    }
}

/// Payload for creating or updating a user.
///
/// `capabilities: None` asks the server to derive the role's defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UserDraft {
    /// Given name (1-64 characters).
    #[validate(length(min = 1, max = 64))]
    pub first_name: String,
    /// Family name (1-64 characters).
    #[validate(length(min = 1, max = 64))]
    pub last_name: String,
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Role id.
    #[validate(length(min = 1))]
    pub role: String,
    /// Explicit capability set, if overriding the role defaults.
    #[serde(default)]
    pub capabilities: Option<Capabilities>,
}
