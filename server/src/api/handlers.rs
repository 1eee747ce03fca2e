//! User management handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use wf_common::{User, UserDraft};

use super::types::{DeleteUserRequest, RequestDeletionBody};
use super::{ApiError, AppState};
use crate::deletion::{DeletionPrompt, RequestOutcome};
use crate::policy::{Actor, PolicyError};
use crate::roles::RoleDefinition;
use crate::users::ManagedUser;

async fn load_user(state: &AppState, id: Uuid) -> Result<User, ApiError> {
    Ok(state
        .directory
        .get(id)
        .await?
        .ok_or(PolicyError::NotFound(id))?)
}

/// List roles, most privileged first.
///
/// GET /api/roles
pub async fn list_roles(State(state): State<AppState>) -> Json<Vec<RoleDefinition>> {
    Json(state.roles.roles().into_iter().cloned().collect())
}

/// List users with the actor's edit/delete options per row.
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    actor: Actor,
) -> Result<Json<Vec<ManagedUser>>, ApiError> {
    Ok(Json(state.users.list(&actor).await?))
}

/// Create a user.
///
/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    Json(draft): Json<UserDraft>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = state.users.create(&actor, draft).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Update a user.
///
/// PUT /api/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(draft): Json<UserDraft>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(state.users.update(&actor, id, draft).await?))
}

/// Deletion options for a user.
///
/// GET /api/users/{id}/deletion
pub async fn deletion_prompt(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionPrompt>, ApiError> {
    let target = load_user(&state, id).await?;
    Ok(Json(state.deletion.prompt(&actor, &target)?))
}

/// Delete a user directly.
///
/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(body): Json<DeleteUserRequest>,
) -> Result<StatusCode, ApiError> {
    let target = load_user(&state, id).await?;
    state.deletion.delete(&actor, &target, &body.confirm).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request approval to delete a protected user.
///
/// POST /api/users/{id}/deletion-request
pub async fn request_deletion(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(body): Json<RequestDeletionBody>,
) -> Result<(StatusCode, Json<RequestOutcome>), ApiError> {
    let target = load_user(&state, id).await?;
    let outcome = state.deletion.request(&actor, &target, &body.reason).await?;
    Ok((StatusCode::ACCEPTED, Json(outcome)))
}

/// Cancel a pending deletion request.
///
/// DELETE /api/users/{id}/deletion-request
pub async fn cancel_deletion_request(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let target = load_user(&state, id).await?;
    Ok(Json(state.deletion.cancel(&actor, &target).await?))
}
