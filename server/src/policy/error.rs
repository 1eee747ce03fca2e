//! Policy error types.

use std::collections::BTreeMap;

use uuid::Uuid;
use wf_common::Capabilities;

use crate::directory::CollaboratorError;
use crate::roles::UnknownRole;

/// Rejected input. Reported field by field; nothing is applied.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Proposed capability set includes capabilities the role may never hold.
    #[error("Role {role} may not hold: {}", .capabilities.keys().join(", "))]
    RestrictedCapabilities {
        role: String,
        capabilities: Capabilities,
    },

    /// Profile fields are missing or malformed.
    #[error("Invalid fields: {0}")]
    Fields(#[from] validator::ValidationErrors),
}

impl ValidationError {
    /// Messages keyed by field name.
    #[must_use]
    pub fn field_messages(&self) -> BTreeMap<String, Vec<String>> {
        match self {
            Self::RestrictedCapabilities { capabilities, .. } => BTreeMap::from([(
                "capabilities".to_string(),
                capabilities
                    .keys()
                    .into_iter()
                    .map(|key| format!("restricted for this role: {key}"))
                    .collect(),
            )]),
            Self::Fields(errors) => errors
                .field_errors()
                .into_iter()
                .map(|(field, errs)| {
                    let messages = errs
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map_or_else(|| e.code.to_string(), |m| m.to_string())
                        })
                        .collect();
                    (field.to_string(), messages)
                })
                .collect(),
        }
    }
}

/// Policy check and workflow errors.
///
/// Every variant is returned to the caller as an explicit result. Only
/// `Collaborator` is a candidate for a caller-initiated retry.
#[derive(Debug, thiserror::Error)]
pub enum PolicyError {
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),

    #[error("Users cannot edit or delete their own account")]
    SelfAction,

    #[error("Role {actor_role} cannot act on role {target_role}")]
    RoleHierarchy {
        actor_role: String,
        target_role: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Confirmation text mismatch")]
    ConfirmationMismatch,

    #[error("Deleting this user requires approval")]
    ApprovalRequired,

    #[error("This user can be deleted directly; no approval request is needed")]
    ApprovalNotRequired,

    #[error("A deletion request is already pending for this user")]
    DeletionAlreadyRequested,

    #[error("No deletion request is pending for this user")]
    NoPendingRequest,

    #[error("Only a super-admin can cancel a deletion request")]
    SuperAdminRequired,

    #[error("User {0} not found")]
    NotFound(Uuid),

    #[error(transparent)]
    Collaborator(#[from] CollaboratorError),
}

impl From<validator::ValidationErrors> for PolicyError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(ValidationError::Fields(errors))
    }
}
