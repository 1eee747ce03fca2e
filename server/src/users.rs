//! User administration.
//!
//! Write path for creating and updating users: field validation, privilege
//! checks against the target's current and proposed role, capability
//! derivation or validation, then the directory call.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use validator::Validate;
use wf_common::{Capabilities, DeletionRequestState, User, UserDraft};

use crate::capabilities;
use crate::deletion::{deletion_option, DeletionOption};
use crate::directory::UserDirectory;
use crate::policy::{authorize_action, authorize_role_assignment, Actor, PolicyError};
use crate::roles::RoleHierarchy;

/// Baseline for new users whose draft carries no explicit capabilities.
/// The role's restrictions are removed from it.
pub const NEW_USER_BASELINE: Capabilities = Capabilities::all();

/// A user row annotated with what the actor may do to it.
#[derive(Debug, Clone, Serialize)]
pub struct ManagedUser {
    #[serde(flatten)]
    pub user: User,
    pub role_name: Option<String>,
    pub can_edit: bool,
    pub can_delete: bool,
    pub deletion_option: Option<DeletionOption>,
}

#[derive(Clone)]
pub struct UserAdministration {
    roles: Arc<RoleHierarchy>,
    directory: Arc<dyn UserDirectory>,
}

impl UserAdministration {
    #[must_use]
    pub fn new(roles: Arc<RoleHierarchy>, directory: Arc<dyn UserDirectory>) -> Self {
        Self { roles, directory }
    }

    /// Every user, with edit/delete flags for `actor`.
    ///
    /// Rows the actor cannot act on (including its own and any with an
    /// unknown role) are returned with all flags off.
    #[tracing::instrument(skip(self, actor), fields(actor_id = %actor.id))]
    pub async fn list(&self, actor: &Actor) -> Result<Vec<ManagedUser>, PolicyError> {
        self.roles.get(&actor.role)?;

        let users = self.directory.list().await?;
        Ok(users
            .into_iter()
            .map(|user| {
                let can_edit = authorize_action(&self.roles, actor, &user).is_ok();
                let deletion_option = deletion_option(&self.roles, actor, &user).ok();
                ManagedUser {
                    role_name: self.roles.get(&user.role).ok().map(|r| r.display_name.clone()),
                    can_edit,
                    can_delete: matches!(deletion_option, Some(DeletionOption::DirectDelete)),
                    deletion_option,
                    user,
                }
            })
            .collect())
    }

    /// Create a user with a role the actor outranks.
    #[tracing::instrument(skip(self, actor, draft), fields(actor_id = %actor.id, role = %draft.role))]
    pub async fn create(&self, actor: &Actor, draft: UserDraft) -> Result<User, PolicyError> {
        draft.validate()?;
        authorize_role_assignment(&self.roles, actor, &draft.role)?;
        let capabilities =
            capabilities::resolve(&self.roles, &draft.role, draft.capabilities, NEW_USER_BASELINE)?;

        let user = User {
            id: Uuid::now_v7(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            role: draft.role,
            capabilities,
            deletion_request_state: DeletionRequestState::None,
        };

        let created = self.directory.create(user).await?;
        tracing::info!(user_id = %created.id, "User created");
        Ok(created)
    }

    /// Update a user the actor outranks, possibly moving it to another role
    /// the actor also outranks.
    ///
    /// Without explicit capabilities, a role change re-derives the defaults
    /// from the user's current set; an unchanged role keeps the current set,
    /// which must still clear the role's restrictions.
    /// The deletion request state is never changed here.
    #[tracing::instrument(skip(self, actor, draft), fields(actor_id = %actor.id, user_id = %id))]
    pub async fn update(
        &self,
        actor: &Actor,
        id: Uuid,
        draft: UserDraft,
    ) -> Result<User, PolicyError> {
        draft.validate()?;
        let current = self
            .directory
            .get(id)
            .await?
            .ok_or(PolicyError::NotFound(id))?;

        authorize_action(&self.roles, actor, &current)?;
        authorize_role_assignment(&self.roles, actor, &draft.role)?;

        let capabilities = match draft.capabilities {
            Some(proposed) => capabilities::validate_override(&self.roles, &draft.role, proposed)?,
            None if draft.role == current.role => {
                capabilities::validate_override(&self.roles, &draft.role, current.capabilities)?
            }
            None => {
                capabilities::default_capabilities(&self.roles, &draft.role, current.capabilities)?
            }
        };

        let user = User {
            id,
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            role: draft.role,
            capabilities,
            deletion_request_state: current.deletion_request_state,
        };

        let updated = self.directory.update(id, user).await?;
        tracing::info!("User updated");
        Ok(updated)
    }
}
