//! Role table input format and load-time validation errors.

use serde::Deserialize;

/// One row of the role table as supplied at startup.
///
/// ```json
/// {
///   "id": "osm",
///   "display_name": "OSM",
///   "rank": 5,
///   "restricted_capabilities": ["settings", "approvals"],
///   "requires_deletion_approval": true
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RoleEntry {
    pub id: String,
    pub display_name: String,
    pub rank: i32,
    #[serde(default)]
    pub restricted_capabilities: Vec<String>,
    #[serde(default)]
    pub requires_deletion_approval: bool,
    #[serde(default)]
    pub super_admin: bool,
}

impl RoleEntry {
    fn new(id: &str, display_name: &str, rank: i32, restricted: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            rank,
            restricted_capabilities: restricted.iter().map(|s| (*s).to_string()).collect(),
            requires_deletion_approval: false,
            super_admin: false,
        }
    }
}

/// Errors raised while loading the role table.
#[derive(Debug, thiserror::Error)]
pub enum RoleTableError {
    #[error("Role table is empty")]
    Empty,

    #[error("Role entry with an empty id")]
    EmptyId,

    #[error("Duplicate role id: {0}")]
    DuplicateRole(String),

    #[error("Role {role} restricts unknown capability {key}")]
    UnknownCapability { role: String, key: String },

    #[error("Role {0} restricts the landing page, which every role must hold")]
    RestrictedLandingPage(String),

    #[error("Only one super-admin role is allowed (found {first} and {second})")]
    MultipleSuperAdmins { first: String, second: String },

    #[error("Failed to read role table: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse role table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Default role table used when no table file is configured.
pub fn builtin_table() -> Vec<RoleEntry> {
    let mut super_admin = RoleEntry::new("super-admin", "Super Admin", 0, &[]);
    super_admin.super_admin = true;

    let mut osm = RoleEntry::new("osm", "OSM", 5, &["settings", "approvals", "user_management"]);
    osm.requires_deletion_approval = true;

    vec![
        super_admin,
        RoleEntry::new("admin", "Admin", 2, &[]),
        RoleEntry::new("compliance", "Compliance", 3, &["settings"]),
        RoleEntry::new(
            "head-of-operations",
            "Head of Operations",
            4,
            &["settings", "approvals"],
        ),
        osm,
    ]
}
