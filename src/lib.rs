// Core modules
pub mod api;
pub mod auth;
mod config;
pub mod server;
mod types;

// Re-export key types and functions
pub use auth::{
    AuthOutcome, AuthStrategy, AuthType, BasicAuth, DirectoryError, InMemoryDirectory,
    RequestView, SessionAuth, SessionStore, User, UserDirectory, hash_password, requires_auth,
};
pub use config::{AppConfig, DEFAULT_EXCLUDED_PATHS, load_users, parse_path_list};
pub use server::{build_app, start_http};
pub use types::{SessionId, UserId};
