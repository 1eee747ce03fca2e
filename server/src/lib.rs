//! Workforce Admin Server
//!
//! Access policy for the user-management screens of a workforce and payroll
//! administration tool: role hierarchy, capability assignment, and the
//! protected-deletion approval workflow.

pub mod api;
pub mod capabilities;
pub mod config;
pub mod deletion;
pub mod directory;
pub mod policy;
pub mod roles;
pub mod users;
