//! Access policy.
//!
//! The acting user is passed explicitly into every check as an [`Actor`];
//! nothing here reads ambient request state.

mod comparator;
mod error;

use serde::Serialize;
use uuid::Uuid;
use wf_common::{RequesterIdentity, User};

pub use comparator::{authorize_action, authorize_role_assignment, can_act_on};
pub use error::{PolicyError, ValidationError};

/// The authenticated user performing an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Actor {
    /// Identity recorded on approval tickets.
    #[must_use]
    pub fn identity(&self) -> RequesterIdentity {
        RequesterIdentity {
            id: self.id,
            name: format!("{} {}", self.first_name.trim(), self.last_name.trim())
                .trim()
                .to_string(),
            email: self.email.clone(),
        }
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
        }
    }
}

impl From<User> for Actor {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}
