//! Deletion transitions.
//!
//! All local checks run before any collaborator call. The returned user is
//! never advanced until the collaborators have accepted the change.
//!
//! Transitions on one target are serialized in-process, and every decision
//! is made against a fresh directory read rather than the caller's copy.
//! The state change itself goes through
//! [`UserDirectory::transition_deletion_state`], so only the deletion state
//! is ever written and a second claim on the same slot is refused.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;
use wf_common::{DeletionRequest, DeletionRequestState, User};

use super::{
    check_confirmation, deletion_option, DeletionOption, DeletionPrompt, RequestOutcome,
    CONFIRMATION_PHRASE,
};
use crate::directory::{ApprovalQueue, CollaboratorError, UserDirectory};
use crate::policy::{authorize_action, Actor, PolicyError};
use crate::roles::RoleHierarchy;

/// Drives deletion transitions against the directory and approval queue.
#[derive(Clone)]
pub struct DeletionWorkflow {
    roles: Arc<RoleHierarchy>,
    directory: Arc<dyn UserDirectory>,
    approvals: Arc<dyn ApprovalQueue>,
    in_flight: Arc<DashMap<Uuid, Arc<Mutex<()>>>>,
}

impl DeletionWorkflow {
    #[must_use]
    pub fn new(
        roles: Arc<RoleHierarchy>,
        directory: Arc<dyn UserDirectory>,
        approvals: Arc<dyn ApprovalQueue>,
    ) -> Self {
        Self {
            roles,
            directory,
            approvals,
            in_flight: Arc::default(),
        }
    }

    /// Current state and available option, for display.
    pub fn prompt(&self, actor: &Actor, target: &User) -> Result<DeletionPrompt, PolicyError> {
        let option = deletion_option(&self.roles, actor, target)?;
        Ok(DeletionPrompt {
            target_user_id: target.id,
            state: target.deletion_request_state,
            option,
            confirmation_phrase: (option == DeletionOption::DirectDelete)
                .then_some(CONFIRMATION_PHRASE),
        })
    }

    /// Delete `target` outright.
    ///
    /// The transition must be open before the phrase is even looked at, so a
    /// protected target yields `ApprovalRequired` whatever was typed.
    #[tracing::instrument(skip(self, actor, target, confirmation), fields(actor_id = %actor.id, target_id = %target.id))]
    pub async fn delete(
        &self,
        actor: &Actor,
        target: &User,
        confirmation: &str,
    ) -> Result<(), PolicyError> {
        let _guard = self.lock_target(target.id).await;
        let current = self.reload(target.id).await?;

        match deletion_option(&self.roles, actor, &current)? {
            DeletionOption::DirectDelete => {}
            DeletionOption::RequestApproval => return Err(PolicyError::ApprovalRequired),
            DeletionOption::AwaitingApproval => {
                return Err(PolicyError::DeletionAlreadyRequested)
            }
        }

        check_confirmation(confirmation)?;

        self.directory.delete(current.id).await?;

        tracing::info!(role = %current.role, "User deleted");
        Ok(())
    }

    /// Move `target` from `None` to `Requested` and submit an approval ticket.
    ///
    /// The directory record is marked first, which claims the single active
    /// slot. If the ticket cannot be submitted the deletion state is moved
    /// back to `None` before the error is returned; other fields are left
    /// as they are.
    #[tracing::instrument(skip(self, actor, target, reason), fields(actor_id = %actor.id, target_id = %target.id))]
    pub async fn request(
        &self,
        actor: &Actor,
        target: &User,
        reason: &str,
    ) -> Result<RequestOutcome, PolicyError> {
        let _guard = self.lock_target(target.id).await;
        let current = self.reload(target.id).await?;

        match deletion_option(&self.roles, actor, &current)? {
            DeletionOption::RequestApproval => {}
            DeletionOption::DirectDelete => return Err(PolicyError::ApprovalNotRequired),
            DeletionOption::AwaitingApproval => {
                return Err(PolicyError::DeletionAlreadyRequested)
            }
        }

        let request = DeletionRequest {
            target_user_id: current.id,
            requested_by: actor.identity(),
            status: DeletionRequestState::Requested,
            created_at: Utc::now(),
            justification: self.justification(actor, &current, reason)?,
        };

        let stored = self
            .directory
            .transition_deletion_state(
                current.id,
                DeletionRequestState::None,
                DeletionRequestState::Requested,
            )
            .await
            .map_err(|e| transition_error(current.id, e, PolicyError::DeletionAlreadyRequested))?;

        if let Err(e) = self.approvals.submit(request.ticket()).await {
            if let Err(restore) = self
                .directory
                .transition_deletion_state(
                    current.id,
                    DeletionRequestState::Requested,
                    DeletionRequestState::None,
                )
                .await
            {
                tracing::warn!(
                    error = %restore,
                    "Failed to restore deletion state after ticket submission failed"
                );
            }
            return Err(e.into());
        }

        tracing::info!(role = %current.role, "Deletion request submitted");
        Ok(RequestOutcome {
            user: stored,
            request,
        })
    }

    /// Cancel a pending request, returning the target to `None`.
    #[tracing::instrument(skip(self, actor, target), fields(actor_id = %actor.id, target_id = %target.id))]
    pub async fn cancel(&self, actor: &Actor, target: &User) -> Result<User, PolicyError> {
        let _guard = self.lock_target(target.id).await;
        let current = self.reload(target.id).await?;

        authorize_action(&self.roles, actor, &current)?;
        if !self.roles.is_super_admin(&actor.role) {
            return Err(PolicyError::SuperAdminRequired);
        }
        if !current.has_pending_deletion() {
            return Err(PolicyError::NoPendingRequest);
        }

        let stored = self
            .directory
            .transition_deletion_state(
                current.id,
                DeletionRequestState::Requested,
                DeletionRequestState::None,
            )
            .await
            .map_err(|e| transition_error(current.id, e, PolicyError::NoPendingRequest))?;

        tracing::info!("Deletion request cancelled");
        Ok(stored)
    }

    /// Serialize transitions on `id` within this process.
    async fn lock_target(&self, id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self.in_flight.entry(id).or_default().value().clone();
        lock.lock_owned().await
    }

    async fn reload(&self, id: Uuid) -> Result<User, PolicyError> {
        self.directory
            .get(id)
            .await?
            .ok_or(PolicyError::NotFound(id))
    }

    fn justification(
        &self,
        actor: &Actor,
        target: &User,
        reason: &str,
    ) -> Result<String, PolicyError> {
        let role = self.roles.get(&target.role)?;
        let requester = actor.identity();
        let mut details = format!(
            "{} ({}) requested deletion of {} ({}, role {})",
            requester.name,
            requester.email,
            target.full_name(),
            target.email,
            role.display_name
        );
        let reason = reason.trim();
        if !reason.is_empty() {
            details.push_str(": ");
            details.push_str(reason);
        }
        Ok(details)
    }
}

/// Map a refused state transition to the policy outcome it stands for.
fn transition_error(id: Uuid, err: CollaboratorError, on_conflict: PolicyError) -> PolicyError {
    match err {
        CollaboratorError::Conflict { .. } => on_conflict,
        CollaboratorError::NotFound { .. } => PolicyError::NotFound(id),
        other => other.into(),
    }
}
