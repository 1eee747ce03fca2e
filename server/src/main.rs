//! Workforce Admin Server - Main Entry Point
//!
//! User-management access policy and protected-deletion workflow.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

use wf_admin::{
    api,
    config::Config,
    directory::{
        ApprovalQueue, HttpApprovalQueue, HttpUserDirectory, InMemoryApprovalQueue,
        InMemoryDirectory, UserDirectory,
    },
    roles::RoleHierarchy,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wf_admin=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Workforce Admin Server"
    );

    // Role table
    let roles = match &config.role_table_path {
        Some(path) => RoleHierarchy::load(path)
            .with_context(|| format!("Failed to load role table from {}", path.display()))?,
        None => RoleHierarchy::builtin(),
    };
    info!(roles = roles.len(), "Role table loaded");

    // User directory
    let directory: Arc<dyn UserDirectory> = match &config.directory_url {
        Some(url) => {
            info!(url = %url, "Using remote user directory");
            Arc::new(HttpUserDirectory::new(url, config.collaborator_timeout)?)
        }
        None => {
            let directory = match &config.directory_seed_path {
                Some(path) => InMemoryDirectory::from_seed_file(path, &roles)?,
                None => InMemoryDirectory::new(),
            };
            tracing::warn!(
                users = directory.len(),
                "DIRECTORY_URL not set, using in-memory user directory"
            );
            Arc::new(directory)
        }
    };

    // Approval queue
    let approvals: Arc<dyn ApprovalQueue> = match &config.approvals_url {
        Some(url) => {
            info!(url = %url, "Using remote approval queue");
            Arc::new(HttpApprovalQueue::new(url, config.collaborator_timeout)?)
        }
        None => {
            tracing::warn!("APPROVALS_URL not set, deletion tickets are kept in memory");
            Arc::new(InMemoryApprovalQueue::new())
        }
    };

    let bind_address = config.bind_address.clone();

    // Create application state and router
    let state = api::AppState::new(api::AppStateConfig {
        config,
        roles,
        directory,
        approvals,
    });
    let app = api::create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Server listening");

    // Graceful shutdown handler
    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        }
        info!("Received shutdown signal, cleaning up...");
    };

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal)
    .await?;

    info!("Server shutdown complete");

    Ok(())
}
