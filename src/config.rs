use serde::Deserialize;
use std::{env, fs, path::Path, path::PathBuf};

use crate::auth::{AuthType, DEFAULT_SESSION_COOKIE, User};

/// Paths reachable without credentials unless overridden.
pub const DEFAULT_EXCLUDED_PATHS: [&str; 4] = [
    "/api/v1/status/",
    "/api/v1/unauthorized/",
    "/api/v1/forbidden/",
    "/api/v1/auth_session/login/",
];

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration for the API.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub auth_type: AuthType,
    /// Name of the session cookie
    pub session_name: String,
    pub host: String,
    pub port: u16,
    pub excluded_paths: Vec<String>,
    /// JSON file seeding the in-memory user directory
    pub users_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            auth_type: AuthType::default(),
            session_name: DEFAULT_SESSION_COOKIE.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            excluded_paths: DEFAULT_EXCLUDED_PATHS.iter().map(|p| p.to_string()).collect(),
            users_file: None,
        }
    }
}

impl AppConfig {
    /// Build the configuration from `AUTH_TYPE`, `SESSION_NAME`, `API_HOST`,
    /// `API_PORT`, `AUTH_EXCLUDED_PATHS` and `USERS_FILE`.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup("AUTH_TYPE") {
            config.auth_type = raw.parse()?;
        }
        if let Some(name) = lookup("SESSION_NAME").filter(|n| !n.trim().is_empty()) {
            config.session_name = name.trim().to_string();
        }
        if let Some(host) = lookup("API_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("API_PORT") {
            config.port = port
                .trim()
                .parse()
                .map_err(|e| anyhow::anyhow!("Invalid API_PORT `{}`: {}", port, e))?;
        }
        if let Some(paths) = lookup("AUTH_EXCLUDED_PATHS") {
            config.excluded_paths = parse_path_list(&paths);
        }
        config.users_file = lookup("USERS_FILE").map(PathBuf::from);

        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Split a comma-separated list of exclusion patterns.
pub fn parse_path_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[derive(Debug, Deserialize)]
struct UsersFile {
    users: Vec<UserEntry>,
}

#[derive(Debug, Deserialize)]
struct UserEntry {
    id: String,
    email: String,
    password: String,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

/// Load users from a JSON seed file, hashing their passwords.
pub fn load_users(path: &Path) -> anyhow::Result<Vec<User>> {
    let raw = fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Could not read users file {}: {}", path.display(), e))?;
    let file: UsersFile = serde_json::from_str(&raw)?;

    Ok(file
        .users
        .into_iter()
        .map(|entry| {
            User::new(entry.id, entry.email, &entry.password)
                .with_name(entry.first_name, entry.last_name)
        })
        .collect())
}
