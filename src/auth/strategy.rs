//! Authentication strategies.
//!
//! Exactly one strategy is selected at startup. The request gate asks it
//! whether a path is protected, whether the caller presented a credential
//! marker at all, and who the caller is.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use http::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::credentials::credentials_from_header;
use crate::auth::directory::{User, UserDirectory};
use crate::auth::paths;
use crate::auth::request::RequestView;
use crate::auth::session_store::SessionStore;
use crate::types::SessionId;

/// Default name of the session cookie.
pub const DEFAULT_SESSION_COOKIE: &str = "_my_session_id";

/// Which strategy to run, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AuthType {
    /// Gate runs but identity is never established
    #[default]
    #[serde(rename = "auth")]
    Null,
    #[serde(rename = "basic_auth")]
    Basic,
    #[serde(rename = "session_auth")]
    Session,
}

impl AuthType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Null => "auth",
            Self::Basic => "basic_auth",
            Self::Session => "session_auth",
        }
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised `AUTH_TYPE` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownAuthType(pub String);

impl fmt::Display for UnknownAuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Unknown auth type `{}` (expected auth, basic_auth or session_auth)",
            self.0
        )
    }
}

impl std::error::Error for UnknownAuthType {}

impl FromStr for AuthType {
    type Err = UnknownAuthType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auth" => Ok(Self::Null),
            "basic_auth" => Ok(Self::Basic),
            "session_auth" => Ok(Self::Session),
            other => Err(UnknownAuthType(other.to_string())),
        }
    }
}

/// Result of running the gate on one request.
#[derive(Debug, Clone)]
pub enum AuthOutcome {
    /// Path is excluded from authentication
    Exempt,
    /// Caller identified
    Authenticated(User),
    /// No credential marker presented (401)
    Unauthorized,
    /// Marker presented but no identity could be established (403)
    Forbidden,
}

/// HTTP Basic authentication against a user directory.
#[derive(Clone)]
pub struct BasicAuth {
    directory: Arc<dyn UserDirectory>,
}

impl BasicAuth {
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }

    /// Resolve the caller from the `Authorization` header.
    ///
    /// When several users share the email only the first one is checked.
    pub async fn resolve_identity<R: RequestView + ?Sized>(&self, request: &R) -> Option<User> {
        let (email, password) = credentials_from_header(request.header(AUTHORIZATION.as_str()))?;

        let users = match self.directory.find_by_email(&email).await {
            Ok(users) => users,
            Err(e) => {
                warn!("Basic auth lookup failed: {}", e);
                return None;
            }
        };

        let user = users.into_iter().next()?;
        if user.verify_password(&password) {
            Some(user)
        } else {
            debug!(user_id = %user.id, "Basic auth password mismatch");
            None
        }
    }
}

/// Cookie-backed server-side sessions.
#[derive(Clone)]
pub struct SessionAuth {
    directory: Arc<dyn UserDirectory>,
    store: Arc<SessionStore>,
    cookie_name: String,
}

impl SessionAuth {
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        store: Arc<SessionStore>,
        cookie_name: impl Into<String>,
    ) -> Self {
        Self {
            directory,
            store,
            cookie_name: cookie_name.into(),
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.cookie_name
    }

    pub fn directory(&self) -> &Arc<dyn UserDirectory> {
        &self.directory
    }

    /// The session id presented by the client, if any.
    pub fn session_cookie<R: RequestView + ?Sized>(&self, request: &R) -> Option<String> {
        request.cookie(&self.cookie_name)
    }

    pub fn create_session(&self, user_id: Option<&str>) -> Option<SessionId> {
        self.store.create_session(user_id)
    }

    /// Destroy the session named by the request's cookie.
    pub fn destroy_session<R: RequestView + ?Sized>(&self, request: &R) -> bool {
        let cookie = self.session_cookie(request);
        self.store.destroy_session(cookie.as_deref())
    }

    pub async fn resolve_identity<R: RequestView + ?Sized>(&self, request: &R) -> Option<User> {
        let cookie = self.session_cookie(request);
        let user_id = self.store.resolve_user(cookie.as_deref())?;

        match self.directory.get_by_id(user_id.as_str()).await {
            Ok(user) => user,
            Err(e) => {
                warn!(user_id = %user_id, "Session user lookup failed: {}", e);
                None
            }
        }
    }
}

/// The configured authentication strategy.
#[derive(Clone)]
pub enum AuthStrategy {
    Null,
    Basic(BasicAuth),
    Session(SessionAuth),
}

impl AuthStrategy {
    /// Build the strategy named by `auth_type`.
    ///
    /// `store` is only used by the session strategy.
    pub fn from_config(
        auth_type: AuthType,
        session_cookie: &str,
        directory: Arc<dyn UserDirectory>,
        store: Arc<SessionStore>,
    ) -> Self {
        match auth_type {
            AuthType::Null => Self::Null,
            AuthType::Basic => Self::Basic(BasicAuth::new(directory)),
            AuthType::Session => Self::Session(SessionAuth::new(directory, store, session_cookie)),
        }
    }

    pub fn kind(&self) -> AuthType {
        match self {
            Self::Null => AuthType::Null,
            Self::Basic(_) => AuthType::Basic,
            Self::Session(_) => AuthType::Session,
        }
    }

    pub fn requires_auth<S: AsRef<str>>(&self, path: Option<&str>, excluded: &[S]) -> bool {
        paths::requires_auth(path, excluded)
    }

    /// The header or cookie this strategy expects the client to present.
    ///
    /// A header that is not valid text still counts as presented; decoding
    /// it is left to identity resolution.
    pub fn extract_credential_marker<R: RequestView + ?Sized>(&self, request: &R) -> Option<String> {
        match self {
            Self::Null | Self::Basic(_) => request
                .header_bytes(AUTHORIZATION.as_str())
                .map(|raw| String::from_utf8_lossy(raw).into_owned()),
            Self::Session(session) => session.session_cookie(request),
        }
    }

    pub async fn resolve_identity<R: RequestView + ?Sized>(&self, request: &R) -> Option<User> {
        match self {
            Self::Null => None,
            Self::Basic(basic) => basic.resolve_identity(request).await,
            Self::Session(session) => session.resolve_identity(request).await,
        }
    }

    /// Session capability, present only for the session strategy.
    pub fn as_session(&self) -> Option<&SessionAuth> {
        match self {
            Self::Session(session) => Some(session),
            _ => None,
        }
    }

    pub fn create_session(&self, user_id: Option<&str>) -> Option<SessionId> {
        self.as_session()?.create_session(user_id)
    }

    pub fn destroy_session<R: RequestView + ?Sized>(&self, request: &R) -> bool {
        self.as_session()
            .is_some_and(|session| session.destroy_session(request))
    }

    /// Run the full gate decision for one request.
    pub async fn authenticate<R, S>(&self, request: &R, excluded: &[S]) -> AuthOutcome
    where
        R: RequestView + ?Sized,
        S: AsRef<str>,
    {
        if !self.requires_auth(Some(request.path()), excluded) {
            return AuthOutcome::Exempt;
        }

        if self.extract_credential_marker(request).is_none() {
            debug!(path = request.path(), "No credential marker presented");
            return AuthOutcome::Unauthorized;
        }

        match self.resolve_identity(request).await {
            Some(user) => AuthOutcome::Authenticated(user),
            None => {
                debug!(path = request.path(), strategy = %self.kind(), "Credential marker rejected");
                AuthOutcome::Forbidden
            }
        }
    }
}

impl fmt::Debug for AuthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session(session) => f
                .debug_struct("AuthStrategy")
                .field("kind", &self.kind())
                .field("cookie_name", &session.cookie_name)
                .finish(),
            _ => f
                .debug_struct("AuthStrategy")
                .field("kind", &self.kind())
                .finish(),
        }
    }
}
