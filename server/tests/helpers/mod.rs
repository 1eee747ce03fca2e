//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for building and sending requests through the full axum
//! router, backed by in-memory collaborators that tests can inspect.
//!
//! ## Test Servers
//!
//! Use [`spawn_test_server()`] when a real socket is needed (the reqwest
//! collaborator clients) instead of `tower::ServiceExt::oneshot`.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{self, header, Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use uuid::Uuid;
use wf_admin::api::{create_router, AppState, AppStateConfig};
use wf_admin::config::Config;
use wf_admin::directory::{InMemoryApprovalQueue, InMemoryDirectory, UserDirectory};
use wf_admin::roles::RoleHierarchy;
use wf_common::{Capabilities, DeletionRequestState, User};

/// Full router over in-memory collaborators.
pub struct TestApp {
    pub router: Router,
    pub directory: Arc<InMemoryDirectory>,
    pub approvals: Arc<InMemoryApprovalQueue>,
    pub config: Arc<Config>,
}

impl TestApp {
    /// Create a test app with the built-in role table and an empty directory.
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    /// Create a test app with a custom config.
    pub fn with_config(config: Config) -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let approvals = Arc::new(InMemoryApprovalQueue::new());

        let state = AppState::new(AppStateConfig {
            config: config.clone(),
            roles: RoleHierarchy::builtin(),
            directory: directory.clone(),
            approvals: approvals.clone(),
        });
        let router = create_router(state);

        Self {
            router,
            directory,
            approvals,
            config: Arc::new(config),
        }
    }

    /// Insert a user with the given role straight into the directory.
    pub async fn seed_user(&self, role: &str) -> User {
        let user = make_user(role);
        self.directory
            .create(user)
            .await
            .expect("Failed to seed user")
    }

    /// Insert a user with a pending deletion request.
    pub async fn seed_pending(&self, role: &str) -> User {
        let mut user = make_user(role);
        user.deletion_request_state = DeletionRequestState::Requested;
        self.directory
            .create(user)
            .await
            .expect("Failed to seed user")
    }

    /// Current directory record.
    pub async fn stored(&self, id: Uuid) -> Option<User> {
        self.directory.get(id).await.expect("directory get failed")
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// Build a request on behalf of `actor`.
    pub fn as_actor(&self, actor: &User, method: Method, uri: &str) -> http::request::Builder {
        Self::request(method, uri).header(self.config.actor_header.as_str(), actor.id.to_string())
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }

    /// Send a bodyless request as `actor`.
    pub async fn send(&self, actor: &User, method: Method, uri: &str) -> Response<Body> {
        let req = self
            .as_actor(actor, method, uri)
            .body(Body::empty())
            .expect("Failed to build request");
        self.oneshot(req).await
    }

    /// Send a JSON request as `actor`.
    pub async fn send_json(
        &self,
        actor: &User,
        method: Method,
        uri: &str,
        body: &serde_json::Value,
    ) -> Response<Body> {
        let req = self
            .as_actor(actor, method, uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request");
        self.oneshot(req).await
    }
}

/// A user record with a unique name and email.
pub fn make_user(role: &str) -> User {
    let id = Uuid::new_v4();
    let tag = &id.simple().to_string()[..8];
    User {
        id,
        first_name: format!("Test{tag}"),
        last_name: role.replace('-', " "),
        email: format!("{role}-{tag}@example.com"),
        role: role.to_string(),
        capabilities: Capabilities::DASHBOARD | Capabilities::REPORTS,
        deletion_request_state: DeletionRequestState::None,
    }
}

/// Test server handle. The server is aborted on drop.
pub struct TestServer {
    pub addr: SocketAddr,
    pub url: String,
    handle: JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Serve `router` on an ephemeral local port.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer { addr, url, handle }
}

/// Read a response body as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}
