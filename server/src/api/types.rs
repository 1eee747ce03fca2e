//! Request and response bodies.

use serde::Deserialize;

/// Body of `DELETE /api/users/{id}`.
#[derive(Debug, Deserialize)]
pub struct DeleteUserRequest {
    /// Must equal the confirmation phrase exactly.
    pub confirm: String,
}

/// Body of `POST /api/users/{id}/deletion-request`.
#[derive(Debug, Default, Deserialize)]
pub struct RequestDeletionBody {
    #[serde(default)]
    pub reason: String,
}
