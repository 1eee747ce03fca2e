//! API Error Types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::directory::CollaboratorError;
use crate::policy::PolicyError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing or unknown actor")]
    Unauthenticated,

    #[error(transparent)]
    Policy(#[from] PolicyError),
}

impl From<CollaboratorError> for ApiError {
    fn from(err: CollaboratorError) -> Self {
        Self::Policy(err.into())
    }
}

impl ApiError {
    /// Status code and stable error code.
    #[must_use]
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Unauthenticated => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            Self::Policy(e) => match e {
                PolicyError::UnknownRole(_) => (StatusCode::FORBIDDEN, "unknown_role"),
                PolicyError::SelfAction => (StatusCode::FORBIDDEN, "self_action"),
                PolicyError::RoleHierarchy { .. } => (StatusCode::FORBIDDEN, "role_hierarchy"),
                PolicyError::ApprovalRequired => (StatusCode::FORBIDDEN, "approval_required"),
                PolicyError::SuperAdminRequired => {
                    (StatusCode::FORBIDDEN, "super_admin_required")
                }
                PolicyError::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "validation"),
                PolicyError::ConfirmationMismatch => {
                    (StatusCode::BAD_REQUEST, "confirmation_mismatch")
                }
                PolicyError::ApprovalNotRequired => (StatusCode::CONFLICT, "approval_not_required"),
                PolicyError::DeletionAlreadyRequested => {
                    (StatusCode::CONFLICT, "deletion_already_requested")
                }
                PolicyError::NoPendingRequest => (StatusCode::CONFLICT, "no_pending_request"),
                PolicyError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                PolicyError::Collaborator(_) => (StatusCode::BAD_GATEWAY, "collaborator"),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = match &self {
            Self::Policy(PolicyError::Validation(e)) => json!({
                "error": code,
                "message": self.to_string(),
                "fields": e.field_messages(),
            }),
            Self::Policy(PolicyError::Collaborator(e)) => {
                tracing::error!(error = %e, "Collaborator call failed");
                json!({
                    "error": code,
                    "message": "An upstream service is unavailable. Please try again.",
                })
            }
            _ => {
                tracing::debug!(error = %self, code, "Request denied");
                json!({ "error": code, "message": self.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::roles::UnknownRole;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                PolicyError::UnknownRole(UnknownRole("intern".into())).into(),
                StatusCode::FORBIDDEN,
            ),
            (PolicyError::SelfAction.into(), StatusCode::FORBIDDEN),
            (PolicyError::ApprovalRequired.into(), StatusCode::FORBIDDEN),
            (PolicyError::ConfirmationMismatch.into(), StatusCode::BAD_REQUEST),
            (PolicyError::DeletionAlreadyRequested.into(), StatusCode::CONFLICT),
            (PolicyError::NoPendingRequest.into(), StatusCode::CONFLICT),
            (PolicyError::NotFound(Uuid::nil()).into(), StatusCode::NOT_FOUND),
            (
                CollaboratorError::Status {
                    service: "user directory",
                    status: 500,
                }
                .into(),
                StatusCode::BAD_GATEWAY,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
