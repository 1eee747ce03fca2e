//! API Router and Application State
//!
//! Central routing configuration and shared state.

mod actor;
mod error;
mod handlers;
pub mod types;

use axum::{
    extract::State,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::{
    config::Config,
    deletion::DeletionWorkflow,
    directory::{ApprovalQueue, UserDirectory},
    roles::RoleHierarchy,
    users::UserAdministration,
};

pub use actor::resolve_actor;
pub use error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<Config>,
    /// Role table, read-only for the process lifetime
    pub roles: Arc<RoleHierarchy>,
    /// User directory (actor and target lookups)
    pub directory: Arc<dyn UserDirectory>,
    /// Create/update/list
    pub users: UserAdministration,
    /// Protected deletion workflow
    pub deletion: DeletionWorkflow,
}

/// Configuration for creating [`AppState`].
pub struct AppStateConfig {
    pub config: Config,
    pub roles: RoleHierarchy,
    pub directory: Arc<dyn UserDirectory>,
    pub approvals: Arc<dyn ApprovalQueue>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(cfg: AppStateConfig) -> Self {
        let roles = Arc::new(cfg.roles);
        Self {
            config: Arc::new(cfg.config),
            users: UserAdministration::new(roles.clone(), cfg.directory.clone()),
            deletion: DeletionWorkflow::new(roles.clone(), cfg.directory.clone(), cfg.approvals),
            directory: cfg.directory,
            roles,
        }
    }
}

/// Create the main application router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/roles", get(handlers::list_roles))
        .route(
            "/users",
            get(handlers::list_users).post(handlers::create_user),
        )
        .route(
            "/users/{id}",
            put(handlers::update_user).delete(handlers::delete_user),
        )
        .route("/users/{id}/deletion", get(handlers::deletion_prompt))
        .route(
            "/users/{id}/deletion-request",
            post(handlers::request_deletion).delete(handlers::cancel_deletion_request),
        )
        .layer(from_fn_with_state(state.clone(), resolve_actor));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    /// Service status
    status: &'static str,
    /// Number of registered roles
    roles: usize,
    /// Whether the directory is a remote service
    remote_directory: bool,
    /// Whether the approval queue is a remote service
    remote_approvals: bool,
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        roles: state.roles.len(),
        remote_directory: state.config.has_remote_directory(),
        remote_approvals: state.config.has_remote_approvals(),
    })
}
