//! Role registry.
//!
//! The role table is loaded once at startup, validated eagerly, and then
//! shared read-only for the lifetime of the process. Lookups of roles that
//! are not in the table fail with [`UnknownRole`] instead of defaulting.
//!
//! Lower rank = more privileged. The super-admin role outranks every other
//! role regardless of its numeric rank.

mod table;

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use wf_common::Capabilities;

pub use table::{builtin_table, RoleEntry, RoleTableError};

/// A role id that is not present in the registry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown role: {0}")]
pub struct UnknownRole(pub String);

/// A validated role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleDefinition {
    pub id: String,
    pub display_name: String,
    pub rank: i32,
    pub restricted_capabilities: Capabilities,
    /// Protected role: deletion goes through the approval workflow.
    pub requires_deletion_approval: bool,
    pub super_admin: bool,
}

/// Read-only lookup table of known roles.
#[derive(Debug, Clone)]
pub struct RoleHierarchy {
    roles: HashMap<String, RoleDefinition>,
}

impl RoleHierarchy {
    /// Build the registry from table rows, rejecting any malformed entry.
    pub fn from_table(entries: Vec<RoleEntry>) -> Result<Self, RoleTableError> {
        if entries.is_empty() {
            return Err(RoleTableError::Empty);
        }

        let mut roles: HashMap<String, RoleDefinition> = HashMap::with_capacity(entries.len());
        let mut super_admin: Option<String> = None;

        for entry in entries {
            if entry.id.trim().is_empty() {
                return Err(RoleTableError::EmptyId);
            }
            if roles.contains_key(&entry.id) {
                return Err(RoleTableError::DuplicateRole(entry.id));
            }

            let restricted = Capabilities::from_keys(&entry.restricted_capabilities)
                .map_err(|e| RoleTableError::UnknownCapability {
                    role: entry.id.clone(),
                    key: e.0,
                })?;
            if restricted.intersects(Capabilities::LANDING_PAGE) {
                return Err(RoleTableError::RestrictedLandingPage(entry.id));
            }

            if entry.super_admin {
                if let Some(first) = &super_admin {
                    return Err(RoleTableError::MultipleSuperAdmins {
                        first: first.clone(),
                        second: entry.id,
                    });
                }
                super_admin = Some(entry.id.clone());
            }

            roles.insert(
                entry.id.clone(),
                RoleDefinition {
                    id: entry.id,
                    display_name: entry.display_name,
                    rank: entry.rank,
                    restricted_capabilities: restricted,
                    requires_deletion_approval: entry.requires_deletion_approval,
                    super_admin: entry.super_admin,
                },
            );
        }

        Ok(Self { roles })
    }

    /// Registry built from [`builtin_table`].
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_table(builtin_table()).expect("built-in role table is valid")
    }

    /// Load a JSON role table (an array of [`RoleEntry`]) from disk.
    pub fn load(path: &Path) -> Result<Self, RoleTableError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<RoleEntry> = serde_json::from_str(&raw)?;
        Self::from_table(entries)
    }

    pub fn get(&self, role_id: &str) -> Result<&RoleDefinition, UnknownRole> {
        self.roles
            .get(role_id)
            .ok_or_else(|| UnknownRole(role_id.to_string()))
    }

    pub fn rank(&self, role_id: &str) -> Result<i32, UnknownRole> {
        self.get(role_id).map(|r| r.rank)
    }

    /// Capabilities the role may never hold. Empty if none were declared.
    pub fn restricted_capabilities(&self, role_id: &str) -> Result<Capabilities, UnknownRole> {
        self.get(role_id).map(|r| r.restricted_capabilities)
    }

    /// `false` for unknown roles.
    #[must_use]
    pub fn is_super_admin(&self, role_id: &str) -> bool {
        self.roles.get(role_id).is_some_and(|r| r.super_admin)
    }

    pub fn requires_deletion_approval(&self, role_id: &str) -> Result<bool, UnknownRole> {
        self.get(role_id).map(|r| r.requires_deletion_approval)
    }

    /// All roles, most privileged first.
    #[must_use]
    pub fn roles(&self) -> Vec<&RoleDefinition> {
        let mut roles: Vec<_> = self.roles.values().collect();
        roles.sort_by(|a, b| a.rank.cmp(&b.rank).then_with(|| a.id.cmp(&b.id)));
        roles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
