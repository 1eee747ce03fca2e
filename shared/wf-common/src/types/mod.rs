//! Shared types.

mod capability;
mod ticket;
mod user;

pub use capability::{Capabilities, UnknownCapability};
pub use ticket::{DeletionRequest, DeletionTicket, RequesterIdentity, TicketKind};
pub use user::{DeletionRequestState, User, UserDraft};
