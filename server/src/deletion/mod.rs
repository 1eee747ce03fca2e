//! Protected Deletion Workflow
//!
//! Per-user state machine with states `None` and `Requested`:
//!
//! - `None` → deleted: direct delete, for actors that outrank the target
//!   when the target's role is not protected (or the actor is super-admin),
//!   gated on the exact confirmation phrase.
//! - `None` → `Requested`: the only path for a protected target when the
//!   actor is not super-admin. Marks the user and submits an approval ticket.
//! - `Requested`: nothing but acknowledgement. No second request, no direct
//!   delete. A super-admin may cancel back to `None`; approval and removal
//!   happen outside this service.

mod workflow;

use serde::Serialize;
use uuid::Uuid;
use wf_common::{DeletionRequest, DeletionRequestState, User};

use crate::policy::{authorize_action, Actor, PolicyError};
use crate::roles::RoleHierarchy;

pub use workflow::DeletionWorkflow;

/// Exact, case-sensitive text the actor must type to delete directly.
pub const CONFIRMATION_PHRASE: &str = "Permanently delete";

/// Check the typed confirmation text.
pub fn check_confirmation(input: &str) -> Result<(), PolicyError> {
    if input == CONFIRMATION_PHRASE {
        Ok(())
    } else {
        Err(PolicyError::ConfirmationMismatch)
    }
}

/// What the actor may do about deleting a given user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionOption {
    /// Delete now, after typing the confirmation phrase.
    DirectDelete,
    /// Submit a deletion request for approval.
    RequestApproval,
    /// A request is pending; only acknowledgement is possible.
    AwaitingApproval,
}

/// Deletion state handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionPrompt {
    pub target_user_id: Uuid,
    pub state: DeletionRequestState,
    pub option: DeletionOption,
    /// Set only for `DirectDelete`.
    pub confirmation_phrase: Option<&'static str>,
}

/// Result of a successful `None` → `Requested` transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestOutcome {
    pub user: User,
    pub request: DeletionRequest,
}

/// Decide which transition is open to `actor` for `target`.
pub fn deletion_option(
    roles: &RoleHierarchy,
    actor: &Actor,
    target: &User,
) -> Result<DeletionOption, PolicyError> {
    authorize_action(roles, actor, target)?;

    if target.has_pending_deletion() {
        return Ok(DeletionOption::AwaitingApproval);
    }

    let protected = roles.requires_deletion_approval(&target.role)?;
    if protected && !roles.is_super_admin(&actor.role) {
        Ok(DeletionOption::RequestApproval)
    } else {
        Ok(DeletionOption::DirectDelete)
    }
}
