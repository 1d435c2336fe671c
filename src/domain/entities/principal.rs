//! Verified caller identity.

use serde_json::{Map, Value};

/// The verified identity of a caller.
///
/// Produced by a [`crate::domain::identity::TokenVerifier`] on every request and
/// carried in the request extensions for downstream middleware and handlers.
/// Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    /// Stable identifier assigned by the identity provider.
    pub uid: String,
    /// All claims of the verified credential, custom claims included.
    pub claims: Map<String, Value>,
}

impl Principal {
    pub fn new(uid: impl Into<String>, claims: Map<String, Value>) -> Self {
        Self {
            uid: uid.into(),
            claims,
        }
    }

    /// Returns true only when the `admin` claim is present and exactly `true`.
    pub fn is_admin(&self) -> bool {
        self.claims.get("admin").and_then(Value::as_bool) == Some(true)
    }

    /// Returns a string claim such as `email` or `name`.
    pub fn claim_str(&self, key: &str) -> Option<&str> {
        self.claims.get(key).and_then(Value::as_str)
    }
}
