//! Key-value persistence engine trait.

use async_trait::async_trait;

use crate::error::OutboxResult;
use crate::types::OutboxKey;

/// Byte-level key-value engine the disk adapter persists containers into.
///
/// Absence is `Ok(None)` from `get`, never an error. Engines that sit behind a
/// session gate report an invalid session as
/// [`OutboxError::AuthorizationRequired`](crate::error::OutboxError::AuthorizationRequired).
/// Each call must be atomic for its key.
#[async_trait]
pub trait KvEngine: Send + Sync {
    /// Fetch the bytes stored under `key`.
    async fn get(&self, key: &OutboxKey) -> OutboxResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    async fn put(&self, key: &OutboxKey, value: &[u8]) -> OutboxResult<()>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &OutboxKey) -> OutboxResult<()>;

    /// Short engine name for logs.
    fn name(&self) -> &'static str;
}
