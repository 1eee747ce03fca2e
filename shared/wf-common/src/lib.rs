//! Workforce Admin Common Library
//!
//! Data model shared by the policy service and its clients: users,
//! capability sets, and deletion tickets.

pub mod types;

pub use types::*;
