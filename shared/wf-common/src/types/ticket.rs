//! Deletion request and approval ticket types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::DeletionRequestState;

/// Kind of approval ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    /// Removal of a protected user account.
    UserDeletion,
}

/// Who asked for the action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequesterIdentity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// An active deletion request for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionRequest {
    pub target_user_id: Uuid,
    pub requested_by: RequesterIdentity,
    /// Always `Requested` while the request exists.
    pub status: DeletionRequestState,
    pub created_at: DateTime<Utc>,
    pub justification: String,
}

impl DeletionRequest {
    /// Build the ticket submitted to the approval queue.
    #[must_use]
    pub fn ticket(&self) -> DeletionTicket {
        DeletionTicket {
            kind: TicketKind::UserDeletion,
            target_user_id: self.target_user_id,
            requester_identity: self.requested_by.clone(),
            details: self.justification.clone(),
            created_at: self.created_at,
        }
    }
}

/// Structured record submitted to the approval queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionTicket {
    #[serde(rename = "type")]
    pub kind: TicketKind,
    pub target_user_id: Uuid,
    pub requester_identity: RequesterIdentity,
    /// Human-readable justification.
    pub details: String,
    pub created_at: DateTime<Utc>,
}
