//! Session gate consulted by engines before touching persisted state.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::error::{OutboxError, OutboxResult};

/// Decides whether the current session may access the database.
#[async_trait]
pub trait SessionGate: Send + Sync {
    /// `Ok(())` when access is allowed, otherwise
    /// [`OutboxError::AuthorizationRequired`].
    async fn check(&self) -> OutboxResult<()>;
}

/// Gate backed by a logged-in flag.
#[derive(Debug)]
pub struct SessionFlag {
    logged_in: AtomicBool,
}

impl SessionFlag {
    pub fn new(logged_in: bool) -> Self {
        Self {
            logged_in: AtomicBool::new(logged_in),
        }
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.logged_in.store(logged_in, Ordering::SeqCst);
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }
}

impl Default for SessionFlag {
    fn default() -> Self {
        Self::new(true)
    }
}

#[async_trait]
impl SessionGate for SessionFlag {
    async fn check(&self) -> OutboxResult<()> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(OutboxError::authorization_required(
                "login required to access the local database",
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_session_flag() {
        let gate = SessionFlag::default();
        assert!(gate.check().await.is_ok());

        gate.set_logged_in(false);
        let err = gate.check().await.unwrap_err();
        assert!(err.is_authorization_required());

        gate.set_logged_in(true);
        assert!(gate.check().await.is_ok());
    }
}
