//! Application assembly and the HTTP listener.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::Request;
use axum::{Router, ServiceExt};
use tower_http::normalize_path::NormalizePath;

use crate::api::{AppState, create_router, normalize_paths};
use crate::auth::{AuthStrategy, InMemoryDirectory, SessionStore, UserDirectory};
use crate::config::{AppConfig, load_users};

/// Build the router for `config` around the given directory.
///
/// A fresh, empty session store is created for the lifetime of the app.
pub fn build_app(config: &AppConfig, directory: Arc<dyn UserDirectory>) -> NormalizePath<Router> {
    let store = Arc::new(SessionStore::new());
    let strategy =
        AuthStrategy::from_config(config.auth_type, &config.session_name, directory, store);

    tracing::info!(
        "Auth strategy: {:?}, {} excluded path(s)",
        strategy,
        config.excluded_paths.len()
    );

    normalize_paths(create_router(AppState::new(
        strategy,
        config.excluded_paths.clone(),
    )))
}

/// Load the in-memory directory named by the config, or an empty one.
pub fn load_directory(config: &AppConfig) -> Result<InMemoryDirectory> {
    match &config.users_file {
        Some(path) => {
            let users = load_users(path)?;
            tracing::info!("Loaded {} user(s) from {}", users.len(), path.display());
            Ok(InMemoryDirectory::with_users(users))
        }
        None => {
            tracing::warn!("No users file configured; the user directory is empty");
            Ok(InMemoryDirectory::new())
        }
    }
}

/// Serve the API on `config.bind_address()` until the process is stopped.
pub async fn start_http(config: AppConfig) -> Result<()> {
    let directory: Arc<dyn UserDirectory> = Arc::new(load_directory(&config)?);
    let app = build_app(&config, directory);

    let bind = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind).await?;

    tracing::info!(
        "API listening on http://{} ({} mode)",
        bind,
        config.auth_type
    );

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app)).await?;

    Ok(())
}
