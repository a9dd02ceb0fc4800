//! Engine wrapper that consults a session gate before every call.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::OutboxResult;
use crate::traits::{KvEngine, SessionGate};
use crate::types::OutboxKey;

/// Wraps an engine so that an invalid session surfaces as
/// `AuthorizationRequired` and never reaches the inner engine.
pub struct GatedEngine<E> {
    inner: E,
    gate: Arc<dyn SessionGate>,
}

impl<E: KvEngine> GatedEngine<E> {
    pub fn new(inner: E, gate: Arc<dyn SessionGate>) -> Self {
        Self { inner, gate }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }
}

#[async_trait]
impl<E: KvEngine> KvEngine for GatedEngine<E> {
    async fn get(&self, key: &OutboxKey) -> OutboxResult<Option<Vec<u8>>> {
        self.gate.check().await?;
        self.inner.get(key).await
    }

    async fn put(&self, key: &OutboxKey, value: &[u8]) -> OutboxResult<()> {
        self.gate.check().await?;
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &OutboxKey) -> OutboxResult<()> {
        self.gate.check().await?;
        self.inner.delete(key).await
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::MemoryEngine;
    use crate::traits::SessionFlag;
    use crate::types::UserId;

    #[tokio::test]
    async fn test_gate_blocks_all_operations_when_logged_out() {
        let session = Arc::new(SessionFlag::new(true));
        let engine = GatedEngine::new(MemoryEngine::new(), session.clone());
        let key = OutboxKey::for_user(&UserId::new("alice").unwrap());

        engine.put(&key, b"data").await.unwrap();

        session.set_logged_in(false);
        assert!(engine.get(&key).await.unwrap_err().is_authorization_required());
        assert!(engine.put(&key, b"new").await.unwrap_err().is_authorization_required());
        assert!(engine.delete(&key).await.unwrap_err().is_authorization_required());

        // The inner engine was never touched while logged out.
        assert!(engine.inner().contains(&key).unwrap());
        session.set_logged_in(true);
        assert_eq!(engine.get(&key).await.unwrap(), Some(b"data".to_vec()));
    }

    #[tokio::test]
    async fn test_gated_engine_reports_inner_name() {
        let engine = GatedEngine::new(MemoryEngine::new(), Arc::new(SessionFlag::default()));
        assert_eq!(engine.name(), "memory");
    }
}
