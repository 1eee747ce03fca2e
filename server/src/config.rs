//! Server Configuration
//!
//! Loads configuration from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address (e.g., "0.0.0.0:8080")
    pub bind_address: String,

    /// JSON role table. Built-in table when unset.
    pub role_table_path: Option<PathBuf>,

    /// User directory base URL. In-memory directory when unset.
    pub directory_url: Option<String>,

    /// Approval queue base URL. In-memory queue when unset.
    pub approvals_url: Option<String>,

    /// JSON array of users loaded into the in-memory directory at startup
    pub directory_seed_path: Option<PathBuf>,

    /// Timeout for directory and approval calls (default: 10s)
    pub collaborator_timeout: Duration,

    /// Header carrying the authenticated actor's user id, lowercase
    pub actor_header: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let collaborator_timeout = match env::var("COLLABORATOR_TIMEOUT_SECS") {
            Ok(v) => v
                .parse()
                .context("COLLABORATOR_TIMEOUT_SECS must be a whole number of seconds")?,
            Err(_) => 10,
        };

        Ok(Self {
            bind_address: env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            role_table_path: env::var("ROLE_TABLE_PATH").ok().map(PathBuf::from),
            directory_url: non_empty(env::var("DIRECTORY_URL").ok()),
            approvals_url: non_empty(env::var("APPROVALS_URL").ok()),
            directory_seed_path: env::var("DIRECTORY_SEED_PATH").ok().map(PathBuf::from),
            collaborator_timeout: Duration::from_secs(collaborator_timeout),
            actor_header: env::var("ACTOR_HEADER")
                .map_or_else(|_| "x-actor-id".into(), |h| h.trim().to_ascii_lowercase()),
        })
    }

    /// Check if the remote user directory is configured.
    #[must_use]
    pub const fn has_remote_directory(&self) -> bool {
        self.directory_url.is_some()
    }

    /// Check if the remote approval queue is configured.
    #[must_use]
    pub const fn has_remote_approvals(&self) -> bool {
        self.approvals_url.is_some()
    }

    /// Create a default configuration for testing: built-in roles and
    /// in-memory collaborators.
    #[must_use]
    pub fn default_for_test() -> Self {
        Self {
            bind_address: "127.0.0.1:8080".into(),
            role_table_path: None,
            directory_url: None,
            approvals_url: None,
            directory_seed_path: None,
            collaborator_timeout: Duration::from_secs(10),
            actor_header: "x-actor-id".into(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
