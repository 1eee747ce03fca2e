//! External collaborators.
//!
//! The user directory owns user records and is their only mutator; the
//! approval queue receives deletion tickets. Both are consumed through
//! object-safe traits so the server can hold them as `Arc<dyn _>`.

mod error;
pub mod http;
pub mod memory;

use async_trait::async_trait;
use uuid::Uuid;
use wf_common::{DeletionRequestState, DeletionTicket, User};

pub use error::CollaboratorError;
pub use http::{HttpApprovalQueue, HttpUserDirectory};
pub use memory::{InMemoryApprovalQueue, InMemoryDirectory};

/// User directory service.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn list(&self) -> Result<Vec<User>, CollaboratorError>;

    async fn create(&self, user: User) -> Result<User, CollaboratorError>;

    async fn update(&self, id: Uuid, user: User) -> Result<User, CollaboratorError>;

    async fn delete(&self, id: Uuid) -> Result<(), CollaboratorError>;

    /// Fetch a single user. The default scans [`UserDirectory::list`].
    async fn get(&self, id: Uuid) -> Result<Option<User>, CollaboratorError> {
        Ok(self.list().await?.into_iter().find(|u| u.id == id))
    }

    /// Move a user's deletion state from `expected` to `next`, leaving every
    /// other field as currently stored.
    ///
    /// Fails with `Conflict` when the stored state is not `expected`. The
    /// default is a read followed by a write; stores that can compare and
    /// swap in one step should override it.
    async fn transition_deletion_state(
        &self,
        id: Uuid,
        expected: DeletionRequestState,
        next: DeletionRequestState,
    ) -> Result<User, CollaboratorError> {
        let mut user = self.get(id).await?.ok_or(CollaboratorError::NotFound {
            service: CollaboratorError::DIRECTORY,
        })?;
        if user.deletion_request_state != expected {
            return Err(CollaboratorError::Conflict {
                service: CollaboratorError::DIRECTORY,
            });
        }
        user.deletion_request_state = next;
        self.update(id, user).await
    }
}

/// Approval queue service.
#[async_trait]
pub trait ApprovalQueue: Send + Sync {
    async fn submit(&self, ticket: DeletionTicket) -> Result<(), CollaboratorError>;
}
