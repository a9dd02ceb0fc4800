//! In-process key-value engine.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{OutboxError, OutboxResult};
use crate::traits::KvEngine;
use crate::types::OutboxKey;

/// `HashMap`-backed engine. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any bytes are stored under `key`.
    pub fn contains(&self, key: &OutboxKey) -> OutboxResult<bool> {
        let entries = self.lock()?;
        Ok(entries.contains_key(key.as_str()))
    }

    pub fn len(&self) -> OutboxResult<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> OutboxResult<bool> {
        Ok(self.len()? == 0)
    }

    fn lock(&self) -> OutboxResult<std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>>> {
        self.entries
            .lock()
            .map_err(|e| OutboxError::database(e.to_string()))
    }
}

#[async_trait]
impl KvEngine for MemoryEngine {
    async fn get(&self, key: &OutboxKey) -> OutboxResult<Option<Vec<u8>>> {
        let entries = self.lock()?;
        Ok(entries.get(key.as_str()).cloned())
    }

    async fn put(&self, key: &OutboxKey, value: &[u8]) -> OutboxResult<()> {
        let mut entries = self.lock()?;
        entries.insert(key.as_str().to_string(), value.to_vec());
        Ok(())
    }

    async fn delete(&self, key: &OutboxKey) -> OutboxResult<()> {
        let mut entries = self.lock()?;
        entries.remove(key.as_str());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    #[tokio::test]
    async fn test_memory_engine_crud() {
        let engine = MemoryEngine::new();
        let key = OutboxKey::for_user(&UserId::new("alice").unwrap());

        assert_eq!(engine.get(&key).await.unwrap(), None);

        engine.put(&key, b"one").await.unwrap();
        assert_eq!(engine.get(&key).await.unwrap(), Some(b"one".to_vec()));
        assert!(engine.contains(&key).unwrap());

        engine.put(&key, b"two").await.unwrap();
        assert_eq!(engine.get(&key).await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(engine.len().unwrap(), 1);

        engine.delete(&key).await.unwrap();
        assert_eq!(engine.get(&key).await.unwrap(), None);
        assert!(engine.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_key_succeeds() {
        let engine = MemoryEngine::new();
        let key = OutboxKey::for_user(&UserId::new("nobody").unwrap());
        assert!(engine.delete(&key).await.is_ok());
    }
}
