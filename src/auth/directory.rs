//! User directory: the lookup capability the strategies authenticate against.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::UserId;

/// A user as returned by the directory.
///
/// The password is only ever held as a SHA-256 hex digest and is never
/// serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    #[serde(skip)]
    password_digest: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user from a plain-text password.
    pub fn new(id: impl Into<UserId>, email: impl Into<String>, password: &str) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            email: email.into(),
            password_digest: Some(hash_password(password)),
            first_name: None,
            last_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_name(mut self, first_name: Option<String>, last_name: Option<String>) -> Self {
        self.first_name = first_name;
        self.last_name = last_name;
        self
    }

    /// Check a candidate password against the stored digest.
    ///
    /// An empty candidate, or a user without a password, never verifies.
    pub fn verify_password(&self, candidate: &str) -> bool {
        if candidate.is_empty() {
            return false;
        }
        match &self.password_digest {
            Some(digest) => digest.eq_ignore_ascii_case(&hash_password(candidate)),
            None => false,
        }
    }

    /// Name used when logging the user.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => format!("{} {}", first, last),
            (Some(first), None) => first.clone(),
            (None, Some(last)) => last.clone(),
            (None, None) => self.email.clone(),
        }
    }
}

/// Hash a password the way the directory stores it (lowercase SHA-256 hex).
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Directory lookup failures.
#[derive(Debug, Clone)]
pub enum DirectoryError {
    /// Backing store could not be reached
    Unavailable(String),
}

impl fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "User directory unavailable: {}", msg),
        }
    }
}

impl std::error::Error for DirectoryError {}

/// Lookup capability consumed by the auth strategies.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// All users registered under `email`, in directory order.
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DirectoryError>;

    async fn get_by_id(&self, user_id: &str) -> Result<Option<User>, DirectoryError>;
}

/// Directory held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    users: RwLock<Vec<User>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().collect()),
        }
    }

    /// Add a user. Duplicate emails are accepted; lookups return them in
    /// insertion order.
    pub fn insert(&self, user: User) {
        self.users.write().push(user);
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryDirectory {
    async fn find_by_email(&self, email: &str) -> Result<Vec<User>, DirectoryError> {
        Ok(self
            .users
            .read()
            .iter()
            .filter(|u| u.email == email)
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, user_id: &str) -> Result<Option<User>, DirectoryError> {
        Ok(self
            .users
            .read()
            .iter()
            .find(|u| u.id.as_str() == user_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let h1 = hash_password("pwd");
        let h2 = hash_password("pwd");
        let h3 = hash_password("other");

        assert_eq!(h1.len(), 64);
        assert!(h1.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(h1, h2);
        assert_ne!(h1, h3);
    }

    #[test]
    fn test_verify_password() {
        let user = User::new("1", "bob@hbtn.io", "H0lbertonSchool98!");
        assert!(user.verify_password("H0lbertonSchool98!"));
        assert!(!user.verify_password("wrong"));
        assert!(!user.verify_password(""));
    }

    #[test]
    fn test_user_without_password_never_verifies() {
        let mut user = User::new("1", "bob@hbtn.io", "pwd");
        user.password_digest = None;
        assert!(!user.verify_password("pwd"));
    }

    #[test]
    fn test_serialization_omits_password() {
        let user = User::new("1", "bob@hbtn.io", "pwd")
            .with_name(Some("Bob".to_string()), Some("Dylan".to_string()));
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["id"], "1");
        assert_eq!(json["email"], "bob@hbtn.io");
        assert_eq!(json["first_name"], "Bob");
        assert!(json.get("password_digest").is_none());
        assert!(!json.to_string().contains(&hash_password("pwd")));
    }

    #[test]
    fn test_display_name() {
        let user = User::new("1", "bob@hbtn.io", "pwd");
        assert_eq!(user.display_name(), "bob@hbtn.io");

        let named = user.with_name(Some("Bob".to_string()), Some("Dylan".to_string()));
        assert_eq!(named.display_name(), "Bob Dylan");
    }

    #[tokio::test]
    async fn test_in_memory_lookups() {
        let directory = InMemoryDirectory::with_users([
            User::new("1", "a@example.com", "one"),
            User::new("2", "b@example.com", "two"),
            User::new("3", "a@example.com", "three"),
        ]);

        let found = directory.find_by_email("a@example.com").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].id.as_str(), "1");

        assert!(directory.find_by_email("c@example.com").await.unwrap().is_empty());

        let user = directory.get_by_id("2").await.unwrap().unwrap();
        assert_eq!(user.email, "b@example.com");
        assert!(directory.get_by_id("9").await.unwrap().is_none());
    }

    #[test]
    fn test_directory_error_display() {
        assert_eq!(
            DirectoryError::Unavailable("timeout".to_string()).to_string(),
            "User directory unavailable: timeout"
        );
    }
}
