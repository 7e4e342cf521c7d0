//! Request authentication.
//!
//! Decides, once per request, whether the caller must be authenticated and
//! who the caller is. Three interchangeable strategies are supported:
//!
//! - **auth**: the gate runs but never establishes an identity
//! - **basic_auth**: `Authorization: Basic <base64(email:password)>` checked
//!   against the [`UserDirectory`]
//! - **session_auth**: a server-issued session id carried in a cookie and
//!   resolved through the [`SessionStore`]
//!
//! ## Request flow
//!
//! 1. Excluded paths (see [`requires_auth`]) pass straight through
//! 2. A request without the strategy's credential marker is rejected (401)
//! 3. A marker that does not resolve to a user is rejected (403)
//! 4. Otherwise the resolved [`User`] is attached to the request
//!
//! Malformed credentials, unknown users and directory failures all end up
//! as "no identity"; nothing in here fails the process.
//!
//! ## Usage
//!
//! ```ignore
//! let strategy = AuthStrategy::from_config(AuthType::Session, "_my_session_id", directory, store);
//! match strategy.authenticate(&parts, &excluded_paths).await {
//!     AuthOutcome::Authenticated(user) => { /* ... */ }
//!     _ => { /* ... */ }
//! }
//! ```

pub mod credentials;
mod directory;
mod paths;
mod request;
mod session_store;
mod strategy;

pub use directory::{DirectoryError, InMemoryDirectory, User, UserDirectory, hash_password};
pub use paths::requires_auth;
pub use request::RequestView;
pub use session_store::SessionStore;
pub use strategy::{
    AuthOutcome, AuthStrategy, AuthType, BasicAuth, DEFAULT_SESSION_COOKIE, SessionAuth,
    UnknownAuthType,
};
