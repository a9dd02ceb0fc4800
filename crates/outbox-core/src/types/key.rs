//! User ids and namespaced persistence keys.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{OutboxError, OutboxResult};

/// Namespace tag prefixed to every outbox persistence key.
pub const DEFAULT_KEY_NAMESPACE: &str = "ob";

/// Opaque identifier of the user owning an outbox.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Create a user id. Empty ids are rejected since they would collide on
    /// the bare namespace key.
    pub fn new(id: impl Into<String>) -> OutboxResult<Self> {
        let id = id.into();
        if id.is_empty() {
            return Err(OutboxError::validation("user id must not be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Key under which one user's container is persisted: `<namespace>:<user-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OutboxKey(String);

impl OutboxKey {
    pub fn new(namespace: &str, user: &UserId) -> Self {
        Self(format!("{}:{}", namespace, user))
    }

    /// Key in the default `ob` namespace.
    pub fn for_user(user: &UserId) -> Self {
        Self::new(DEFAULT_KEY_NAMESPACE, user)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OutboxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OutboxKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
