//! Disk Store adapter: the only component that talks to the engine.

use std::sync::Arc;

use crate::error::OutboxResult;
use crate::traits::{ContainerCodec, JsonCodec, KvEngine};
use crate::types::{OutboxContainer, OutboxKey};

/// Persists whole containers through a [`KvEngine`] and a [`ContainerCodec`].
#[derive(Clone)]
pub struct DiskStore {
    engine: Arc<dyn KvEngine>,
    codec: Arc<dyn ContainerCodec>,
}

impl DiskStore {
    /// Adapter over `engine` using the JSON codec.
    pub fn new(engine: Arc<dyn KvEngine>) -> Self {
        Self {
            engine,
            codec: Arc::new(JsonCodec),
        }
    }

    /// Replace the codec.
    pub fn with_codec(mut self, codec: Arc<dyn ContainerCodec>) -> Self {
        self.codec = codec;
        self
    }

    /// Load the container under `key`. `Ok(None)` means absent.
    pub async fn read(&self, key: &OutboxKey) -> OutboxResult<Option<OutboxContainer>> {
        match self.engine.get(key).await? {
            Some(bytes) => Ok(Some(self.codec.decode(&bytes)?)),
            None => Ok(None),
        }
    }

    pub async fn write(&self, key: &OutboxKey, container: &OutboxContainer) -> OutboxResult<()> {
        let bytes = self.codec.encode(container)?;
        self.engine.put(key, &bytes).await
    }

    pub async fn delete(&self, key: &OutboxKey) -> OutboxResult<()> {
        self.engine.delete(key).await
    }

    pub fn name(&self) -> &'static str {
        self.engine.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::{GatedEngine, MemoryEngine};
    use crate::error::OutboxError;
    use crate::traits::SessionFlag;
    use crate::types::{OutboxRecord, UserId};

    fn key() -> OutboxKey {
        OutboxKey::for_user(&UserId::new("alice").unwrap())
    }

    #[test]
    fn test_read_absent_is_none() {
        let disk = DiskStore::new(Arc::new(MemoryEngine::new()));
        let loaded = tokio_test::block_on(disk.read(&key())).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let disk = DiskStore::new(Arc::new(MemoryEngine::new()));
        let container =
            OutboxContainer::with_records(vec![OutboxRecord::new("c", serde_json::json!("hi"))]);

        tokio_test::block_on(async {
            disk.write(&key(), &container).await.unwrap();
            assert_eq!(disk.read(&key()).await.unwrap(), Some(container));

            disk.delete(&key()).await.unwrap();
            assert!(disk.read(&key()).await.unwrap().is_none());
        });
    }

    #[tokio::test]
    async fn test_undecodable_bytes_are_an_error() {
        let engine = Arc::new(MemoryEngine::new());
        engine.put(&key(), b"{\"version\": \"four\"").await.unwrap();

        let disk = DiskStore::new(engine);
        let err = disk.read(&key()).await.unwrap_err();
        assert!(matches!(err, OutboxError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_authorization_failure_passes_through() {
        let engine = GatedEngine::new(MemoryEngine::new(), Arc::new(SessionFlag::new(false)));
        let disk = DiskStore::new(Arc::new(engine));

        assert!(disk.read(&key()).await.unwrap_err().is_authorization_required());
        assert!(disk
            .write(&key(), &OutboxContainer::empty())
            .await
            .unwrap_err()
            .is_authorization_required());
    }

    #[test]
    fn test_name_comes_from_engine() {
        let disk = DiskStore::new(Arc::new(MemoryEngine::new()));
        assert_eq!(disk.name(), "memory");
    }
}
