//! In-memory session storage.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::types::{SessionId, UserId};

/// Maps server-issued session ids to user ids.
///
/// One instance is created at startup and shared behind an `Arc`. All
/// access goes through a single lock, so create/resolve/destroy never
/// observe a half-applied change. Sessions do not expire; they live until
/// destroyed or the process exits.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, UserId>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a fresh session id to `user_id`.
    ///
    /// Returns `None` if `user_id` is missing or not a valid identifier.
    pub fn create_session(&self, user_id: Option<&str>) -> Option<SessionId> {
        let user_id = user_id.filter(|id| UserId::is_valid(id))?;

        let session_id = SessionId::generate();
        self.sessions
            .write()
            .insert(session_id.clone(), UserId::new(user_id));

        info!(user_id = %user_id, "Session created");
        Some(session_id)
    }

    /// Look up the user bound to `session_id`.
    pub fn resolve_user(&self, session_id: Option<&str>) -> Option<UserId> {
        let session_id = session_id?;
        self.sessions.read().get(session_id).cloned()
    }

    /// Remove a session. Returns `false` if it was missing.
    pub fn destroy_session(&self, session_id: Option<&str>) -> bool {
        let Some(session_id) = session_id else {
            return false;
        };

        match self.sessions.write().remove(session_id) {
            Some(user_id) => {
                info!(user_id = %user_id, "Session destroyed");
                true
            }
            None => {
                debug!("Destroy requested for unknown session");
                false
            }
        }
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_create_session_rejects_missing_or_invalid_user() {
        let store = SessionStore::new();
        assert!(store.create_session(None).is_none());
        assert!(store.create_session(Some("")).is_none());
        assert!(store.create_session(Some("has space")).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_then_resolve() {
        let store = SessionStore::new();
        let id = store.create_session(Some("42")).unwrap();

        assert_eq!(
            store.resolve_user(Some(id.as_str())),
            Some(UserId::new("42"))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_same_user_gets_distinct_sessions() {
        let store = SessionStore::new();
        let a = store.create_session(Some("42")).unwrap();
        let b = store.create_session(Some("42")).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_resolve_unknown_or_missing() {
        let store = SessionStore::new();
        assert!(store.resolve_user(None).is_none());
        assert!(store.resolve_user(Some("nope")).is_none());
    }

    #[test]
    fn test_destroy_session() {
        let store = SessionStore::new();
        let id = store.create_session(Some("42")).unwrap();

        assert!(store.destroy_session(Some(id.as_str())));
        assert!(store.resolve_user(Some(id.as_str())).is_none());
        assert!(!store.destroy_session(Some(id.as_str())));
        assert!(!store.destroy_session(None));
        assert!(store.is_empty());
    }

    #[test]
    fn test_concurrent_creates_are_distinct() {
        let store = Arc::new(SessionStore::new());

        let handles: Vec<_> = (0..64)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    let user = i.to_string();
                    let id = store.create_session(Some(&user)).unwrap();
                    (user, id)
                })
            })
            .collect();

        let results: Vec<(String, SessionId)> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let unique: HashSet<_> = results.iter().map(|(_, id)| id.clone()).collect();
        assert_eq!(unique.len(), 64);
        assert_eq!(store.len(), 64);

        for (user, id) in &results {
            assert_eq!(
                store.resolve_user(Some(id.as_str())).as_ref().map(UserId::as_str),
                Some(user.as_str())
            );
        }
    }

    #[test]
    fn test_concurrent_destroy_succeeds_once() {
        let store = Arc::new(SessionStore::new());
        let id = store.create_session(Some("7")).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                let id = id.clone();
                std::thread::spawn(move || store.destroy_session(Some(id.as_str())))
            })
            .collect();

        let destroyed = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(destroyed, 1);
        assert!(store.is_empty());
    }
}
