//! Actor Resolution Middleware
//!
//! Authentication happens upstream. The gateway forwards the authenticated
//! user id in a header; this layer resolves it through the directory and
//! injects an [`Actor`] into request extensions.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use super::{ApiError, AppState};
use crate::policy::{Actor, PolicyError};

/// Middleware to require a resolvable actor.
///
/// Missing or malformed header and ids unknown to the directory are all
/// rejected with 401.
pub async fn resolve_actor(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let actor_id: Uuid = request
        .headers()
        .get(state.config.actor_header.as_str())
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
        .ok_or(ApiError::Unauthenticated)?;

    let user = state
        .directory
        .get(actor_id)
        .await
        .map_err(PolicyError::from)?
        .ok_or(ApiError::Unauthenticated)?;

    request.extensions_mut().insert(Actor::from(user));

    Ok(next.run(request).await)
}

/// Extractor for the resolved actor in handlers behind [`resolve_actor`].
impl<S> axum::extract::FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Self>()
            .cloned()
            .ok_or(ApiError::Unauthenticated)
    }
}
