//! Process-local collaborators for development and tests.

use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;
use uuid::Uuid;
use wf_common::{DeletionRequestState, DeletionTicket, User};

use super::{ApprovalQueue, CollaboratorError, UserDirectory};
use crate::capabilities::validate_user;
use crate::roles::RoleHierarchy;

/// User directory backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: DashMap<Uuid, User>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory pre-populated with `users`. Later duplicates replace earlier ones.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let dir = Self::new();
        for user in users {
            dir.users.insert(user.id, user);
        }
        dir
    }

    /// Directory seeded from a JSON array of users.
    ///
    /// Every record must name a known role and hold no capability that role
    /// restricts; the first offending record fails the load.
    pub fn from_seed_file(path: &Path, roles: &RoleHierarchy) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read directory seed {}", path.display()))?;
        let users: Vec<User> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse directory seed {}", path.display()))?;
        for user in &users {
            validate_user(roles, user)
                .with_context(|| format!("Invalid seed user {} ({})", user.id, user.email))?;
        }
        Ok(Self::with_users(users))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn list(&self) -> Result<Vec<User>, CollaboratorError> {
        let mut users: Vec<User> = self.users.iter().map(|e| e.value().clone()).collect();
        users.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(users)
    }

    async fn create(&self, user: User) -> Result<User, CollaboratorError> {
        match self.users.entry(user.id) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(CollaboratorError::Conflict {
                service: CollaboratorError::DIRECTORY,
            }),
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(user.clone());
                Ok(user)
            }
        }
    }

    async fn update(&self, id: Uuid, mut user: User) -> Result<User, CollaboratorError> {
        let mut entry = self.users.get_mut(&id).ok_or(CollaboratorError::NotFound {
            service: CollaboratorError::DIRECTORY,
        })?;
        user.id = id;
        *entry = user.clone();
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), CollaboratorError> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or(CollaboratorError::NotFound {
                service: CollaboratorError::DIRECTORY,
            })
    }

    async fn get(&self, id: Uuid) -> Result<Option<User>, CollaboratorError> {
        Ok(self.users.get(&id).map(|e| e.value().clone()))
    }

    async fn transition_deletion_state(
        &self,
        id: Uuid,
        expected: DeletionRequestState,
        next: DeletionRequestState,
    ) -> Result<User, CollaboratorError> {
        // The shard guard is held across the compare and the write.
        let mut entry = self.users.get_mut(&id).ok_or(CollaboratorError::NotFound {
            service: CollaboratorError::DIRECTORY,
        })?;
        if entry.deletion_request_state != expected {
            return Err(CollaboratorError::Conflict {
                service: CollaboratorError::DIRECTORY,
            });
        }
        entry.deletion_request_state = next;
        Ok(entry.value().clone())
    }
}

/// Approval queue that records submitted tickets.
#[derive(Debug, Default)]
pub struct InMemoryApprovalQueue {
    tickets: Mutex<Vec<DeletionTicket>>,
}

impl InMemoryApprovalQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of submitted tickets, oldest first.
    pub async fn tickets(&self) -> Vec<DeletionTicket> {
        self.tickets.lock().await.clone()
    }
}

#[async_trait]
impl ApprovalQueue for InMemoryApprovalQueue {
    async fn submit(&self, ticket: DeletionTicket) -> Result<(), CollaboratorError> {
        tracing::debug!(target_user_id = %ticket.target_user_id, "Queued approval ticket");
        self.tickets.lock().await.push(ticket);
        Ok(())
    }
}
