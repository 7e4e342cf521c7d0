// REST API surface guarded by the configured auth strategy

mod error;
pub mod middleware;
mod session;


use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, response::Json, routing::get};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{AuthStrategy, User};

pub use error::ApiError;
pub use middleware::{CurrentUser, require_auth};
pub use session::LoginForm;

/// Shared state for the request gate.
#[derive(Clone)]
pub struct AppState {
    pub strategy: Arc<AuthStrategy>,
    pub excluded_paths: Arc<[String]>,
}

impl AppState {
    pub fn new(strategy: AuthStrategy, excluded_paths: Vec<String>) -> Self {
        Self {
            strategy: Arc::new(strategy),
            excluded_paths: excluded_paths.into(),
        }
    }
}

/// Build the `/api/v1` router with the auth gate applied to every route.
///
/// Session endpoints are only mounted when the strategy supports sessions.
pub fn create_router(state: AppState) -> Router {
    let mut api = Router::new()
        .route("/status", get(status))
        .route("/unauthorized", get(unauthorized))
        .route("/forbidden", get(forbidden))
        .route("/users/me", get(current_user));

    if let Some(session) = state.strategy.as_session() {
        api = api.nest("/auth_session", session::routes(session.clone()));
    }

    Router::new()
        .nest("/api/v1", api)
        .fallback(not_found)
        .layer(from_fn_with_state(state, require_auth))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Strip a trailing slash before routing, so `/status/` and `/status` reach
/// the same handler.
pub fn normalize_paths(router: Router) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router)
}

async fn status() -> Json<Value> {
    Json(json!({ "status": "OK" }))
}

async fn unauthorized() -> ApiError {
    ApiError::unauthorized()
}

async fn forbidden() -> ApiError {
    ApiError::forbidden()
}

async fn current_user(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

async fn not_found() -> ApiError {
    ApiError::not_found()
}
