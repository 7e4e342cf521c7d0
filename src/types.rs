//! NewType wrappers for identifiers handled by the auth layer.
//!
//! Keeping user ids and session ids apart at the type level stops a session
//! token from ever being looked up as a user (or the other way around).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Generates a string-backed identifier with the usual conversions.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw value.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// Identifier of a user as known to the [`UserDirectory`](crate::auth::UserDirectory).
    ///
    /// The auth layer never interprets it; it only stores it against a
    /// session and hands it back to the directory.
    UserId
);

newtype_string!(
    /// Server-issued session token carried by the session cookie.
    ///
    /// Always produced by [`SessionStore`](crate::auth::SessionStore) from a
    /// random UUID v4; client-supplied values are only ever used as lookup keys.
    SessionId
);

impl UserId {
    /// Whether this string can be bound to a session.
    ///
    /// Rejects the empty string and anything containing whitespace or
    /// control characters.
    pub fn is_valid(raw: &str) -> bool {
        !raw.is_empty() && !raw.chars().any(|c| c.is_whitespace() || c.is_control())
    }
}

impl SessionId {
    pub(crate) fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}
