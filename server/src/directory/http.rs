//! REST shims for the directory and approval services.
//!
//! Routes:
//! - `GET    {base}/users`
//! - `POST   {base}/users`
//! - `PUT    {base}/users/{id}`
//! - `DELETE {base}/users/{id}`
//! - `POST   {base}/approvals`
//!
//! There is no single-user read; lookups scan the list.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use uuid::Uuid;
use wf_common::{DeletionTicket, User};

use super::{ApprovalQueue, CollaboratorError, UserDirectory};

fn build_client(service: &'static str, timeout: Duration) -> Result<Client, CollaboratorError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| transport(service, &e))
}

fn transport(service: &'static str, err: &reqwest::Error) -> CollaboratorError {
    CollaboratorError::Transport {
        service,
        message: err.to_string(),
    }
}

/// Map non-2xx responses to errors.
fn check(service: &'static str, response: Response) -> Result<Response, CollaboratorError> {
    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(CollaboratorError::NotFound { service });
    }
    if status == StatusCode::CONFLICT {
        return Err(CollaboratorError::Conflict { service });
    }
    if !status.is_success() {
        return Err(CollaboratorError::Status {
            service,
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// User directory reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpUserDirectory {
    client: Client,
    base_url: String,
}

impl HttpUserDirectory {
    const SERVICE: &'static str = CollaboratorError::DIRECTORY;

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: build_client(Self::SERVICE, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn users_url(&self) -> String {
        format!("{}/users", self.base_url)
    }

    fn user_url(&self, id: Uuid) -> String {
        format!("{}/users/{id}", self.base_url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response, CollaboratorError> {
        let response = request
            .send()
            .await
            .map_err(|e| transport(Self::SERVICE, &e))?;
        check(Self::SERVICE, response)
    }

    async fn read_user(response: Response) -> Result<User, CollaboratorError> {
        response
            .json()
            .await
            .map_err(|e| transport(Self::SERVICE, &e))
    }
}

#[async_trait]
impl UserDirectory for HttpUserDirectory {
    #[tracing::instrument(skip(self))]
    async fn list(&self) -> Result<Vec<User>, CollaboratorError> {
        let response = self.send(self.client.get(self.users_url())).await?;
        response
            .json()
            .await
            .map_err(|e| transport(Self::SERVICE, &e))
    }

    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> Result<User, CollaboratorError> {
        let response = self
            .send(self.client.post(self.users_url()).json(&user))
            .await?;
        Self::read_user(response).await
    }

    #[tracing::instrument(skip(self, user))]
    async fn update(&self, id: Uuid, user: User) -> Result<User, CollaboratorError> {
        let response = self
            .send(self.client.put(self.user_url(id)).json(&user))
            .await?;
        Self::read_user(response).await
    }

    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> Result<(), CollaboratorError> {
        self.send(self.client.delete(self.user_url(id))).await?;
        Ok(())
    }
}

/// Approval queue reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpApprovalQueue {
    client: Client,
    base_url: String,
}

impl HttpApprovalQueue {
    const SERVICE: &'static str = CollaboratorError::APPROVALS;

    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CollaboratorError> {
        Ok(Self {
            client: build_client(Self::SERVICE, timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ApprovalQueue for HttpApprovalQueue {
    #[tracing::instrument(skip(self, ticket), fields(target_user_id = %ticket.target_user_id))]
    async fn submit(&self, ticket: DeletionTicket) -> Result<(), CollaboratorError> {
        let response = self
            .client
            .post(format!("{}/approvals", self.base_url))
            .json(&ticket)
            .send()
            .await
            .map_err(|e| transport(Self::SERVICE, &e))?;
        check(Self::SERVICE, response)?;
        Ok(())
    }
}
