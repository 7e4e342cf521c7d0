//! Request gate middleware.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;

use super::AppState;
use super::error::ApiError;
use crate::auth::{AuthOutcome, User};

/// The authenticated caller, inserted into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(ApiError::not_found)
    }
}

/// Run the configured strategy on every request.
///
/// Excluded paths pass untouched, a missing credential marker yields 401,
/// a marker that does not resolve yields 403.
pub async fn require_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    match state
        .strategy
        .authenticate(&parts, state.excluded_paths.as_ref())
        .await
    {
        AuthOutcome::Exempt => {}
        AuthOutcome::Authenticated(user) => {
            debug!(user_id = %user.id, path = parts.uri.path(), "Request authenticated");
            parts.extensions.insert(CurrentUser(user));
        }
        AuthOutcome::Unauthorized => return Err(ApiError::unauthorized()),
        AuthOutcome::Forbidden => return Err(ApiError::forbidden()),
    }

    Ok(next.run(Request::from_parts(parts, body)).await)
}
