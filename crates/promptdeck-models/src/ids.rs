//! Type-safe ID wrappers for Promptdeck.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Macro to generate ID newtypes with common functionality.
macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new random ID.
            pub fn new() -> Self {
                Self(format!("{}-{}", $prefix, Uuid::new_v4()))
            }

            /// Creates an ID from an existing string (for deserialization/testing).
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
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
    };
}

define_id!(FragmentKey, "frag");
define_id!(PendingToken, "pend");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_key_prefix() {
        let key = FragmentKey::new();
        assert!(key.as_str().starts_with("frag-"));
    }

    #[test]
    fn test_pending_token_prefix() {
        let token = PendingToken::new();
        assert!(token.as_str().starts_with("pend-"));
    }

    #[test]
    fn test_keys_are_unique() {
        let a = FragmentKey::new();
        let b = FragmentKey::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_key_from_string() {
        let key = FragmentKey::from_string("frag-custom-123");
        assert_eq!(key.as_str(), "frag-custom-123");
    }

    #[test]
    fn test_key_serialization() {
        let key = FragmentKey::from_string("frag-test");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"frag-test\"");

        let parsed: FragmentKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_key_display() {
        let token = PendingToken::from_string("pend-123");
        assert_eq!(format!("{}", token), "pend-123");
    }
}
