//! Session login/logout endpoints, mounted only under session auth.

use axum::Router;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, Request, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, post};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::Cookie;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use super::error::ApiError;
use crate::auth::{SessionAuth, User};

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

pub fn routes(session: SessionAuth) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", delete(logout))
        .with_state(session)
}

/// Verify email/password and open a session.
///
/// Responds with the user and sets the session cookie. A body that is not
/// a urlencoded form is read as an empty one.
async fn login(
    State(session): State<SessionAuth>,
    jar: CookieJar,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<(CookieJar, Json<User>), ApiError> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Login body is not a form: {}", rejection);
            LoginForm::default()
        }
    };

    let email = form
        .email
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ApiError::bad_request("email missing"))?;
    let password = form
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::bad_request("password missing"))?;

    let no_user = || ApiError::new(StatusCode::NOT_FOUND, "no user found for this email");

    let users = session.directory().find_by_email(&email).await.map_err(|e| {
        warn!("Login lookup failed: {}", e);
        no_user()
    })?;
    let user = users.into_iter().next().ok_or_else(no_user)?;

    if !user.verify_password(&password) {
        return Err(ApiError::new(StatusCode::UNAUTHORIZED, "wrong password"));
    }

    let session_id = session
        .create_session(Some(user.id.as_str()))
        .ok_or_else(|| ApiError::internal("error creating the session"))?;

    info!(user_id = %user.id, "{} logged in", user.display_name());

    let cookie = Cookie::build((session.cookie_name().to_string(), session_id.into_inner()))
        .path("/")
        .http_only(true)
        .build();

    Ok((jar.add(cookie), Json(user)))
}

/// Destroy the session named by the request cookie.
async fn logout(
    State(session): State<SessionAuth>,
    jar: CookieJar,
    request: Request,
) -> Result<(CookieJar, Json<Value>), ApiError> {
    if !session.destroy_session(&request) {
        return Err(ApiError::not_found());
    }

    let cookie = Cookie::build((session.cookie_name().to_string(), ""))
        .path("/")
        .build();
    Ok((jar.remove(cookie), Json(json!({}))))
}
