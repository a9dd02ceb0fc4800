//! Outbox storage orchestrator.
//!
//! Composes the [`MemoryCache`] and the [`DiskStore`] into the per-user
//! `read` / `write` / `clear` operations:
//!
//! - reads are served from the cache when possible and always come back
//!   sorted by creation time;
//! - a persisted container written under another schema version is deleted
//!   and replaced by an empty one;
//! - any internal failure (I/O, undecodable bytes) deletes the offending key
//!   before the error is returned, so the next call starts from a clean
//!   `NotFound`;
//! - `AuthorizationRequired` and `Cancelled` never touch persisted state.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cache::MemoryCache;
use crate::config::OutboxConfig;
use crate::engines::SqliteEngine;
use crate::error::{ErrorCode, OutboxError, OutboxResult};
use crate::storage::DiskStore;
use crate::traits::OutboxStore;
use crate::types::{OutboxContainer, OutboxKey, UserId, OUTBOX_VERSION};

/// Database-backed outbox storage with a memory cache in front.
pub struct OutboxStorage {
    disk: DiskStore,
    cache: Arc<MemoryCache>,
    key_namespace: String,
    label: String,
}

impl OutboxStorage {
    /// Create a storage over `disk` and `cache`.
    pub fn new(disk: DiskStore, cache: Arc<MemoryCache>, config: &OutboxConfig) -> Self {
        Self {
            disk,
            cache,
            key_namespace: config.key_namespace.clone(),
            label: config.debug_label.clone(),
        }
    }

    /// Open a SQLite-backed storage at `config.db_path` sharing the
    /// process-wide cache.
    pub fn open(config: &OutboxConfig) -> OutboxResult<Self> {
        config.validate()?;
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let engine = SqliteEngine::new(&config.db_path)?;
        let disk = DiskStore::new(Arc::new(engine));
        Ok(Self::new(disk, MemoryCache::global(), config))
    }

    /// Persistence key for `user`.
    pub fn key_for(&self, user: &UserId) -> OutboxKey {
        OutboxKey::new(&self.key_namespace, user)
    }

    pub fn cache(&self) -> &Arc<MemoryCache> {
        &self.cache
    }

    /// Read the user's container.
    pub async fn read(
        &self,
        cancel: &CancellationToken,
        user: &UserId,
    ) -> OutboxResult<OutboxContainer> {
        let key = self.key_for(user);
        let result = self.read_storage(cancel, &key).await;
        self.heal_on_internal(&key, result).await
    }

    /// Persist `container` for the user and refresh the cache.
    pub async fn write(
        &self,
        cancel: &CancellationToken,
        user: &UserId,
        container: &OutboxContainer,
    ) -> OutboxResult<()> {
        let key = self.key_for(user);
        let result = self.write_storage(cancel, &key, container).await;
        self.heal_on_internal(&key, result).await
    }

    /// Remove the user's container from disk and cache.
    pub async fn clear(&self, cancel: &CancellationToken, user: &UserId) -> OutboxResult<()> {
        let key = self.key_for(user);
        self.clear_key(cancel, &key).await
    }

    pub fn name(&self) -> &'static str {
        "db"
    }

    async fn read_storage(
        &self,
        cancel: &CancellationToken,
        key: &OutboxKey,
    ) -> OutboxResult<OutboxContainer> {
        let (mut container, from_disk) = match self.cache.get(key) {
            Some(cached) => {
                debug!(label = %self.label, key = %key, "hit in memory cache");
                (cached, false)
            }
            None => {
                let loaded = with_cancel(cancel, self.disk.read(key))
                    .await
                    .map_err(|e| {
                        e.into_storage_error(ErrorCode::OutboxCorrupted, "failure to read outbox")
                    })?;
                match loaded {
                    Some(container) => (container, true),
                    None => {
                        debug!(label = %self.label, key = %key, "no outbox on disk");
                        return Err(OutboxError::not_found(key.as_str()));
                    }
                }
            }
        };

        if !container.is_current_version() {
            debug!(
                label = %self.label,
                key = %key,
                disk_version = container.version,
                program_version = OUTBOX_VERSION,
                "on disk version not equal to program version, clearing"
            );
            self.clear_key(cancel, key).await?;
            return Ok(OutboxContainer::empty());
        }

        if from_disk {
            self.cache.put(key, &container);
        }
        container.sort_by_creation_time();
        Ok(container)
    }

    async fn write_storage(
        &self,
        cancel: &CancellationToken,
        key: &OutboxKey,
        container: &OutboxContainer,
    ) -> OutboxResult<()> {
        with_cancel(cancel, self.disk.write(key, container))
            .await
            .map_err(|e| {
                e.into_storage_error(ErrorCode::OutboxWriteFailed, "error writing outbox")
            })?;
        self.cache.put(key, container);
        debug!(
            label = %self.label,
            key = %key,
            records = container.records.len(),
            "wrote outbox"
        );
        Ok(())
    }

    async fn clear_key(&self, cancel: &CancellationToken, key: &OutboxKey) -> OutboxResult<()> {
        self.cache.invalidate(key);
        with_cancel(cancel, self.disk.delete(key))
            .await
            .map_err(|e| {
                e.into_storage_error(ErrorCode::OutboxClearFailed, "error clearing outbox")
            })?;
        info!(label = %self.label, key = %key, backend = self.disk.name(), "cleared outbox");
        Ok(())
    }

    /// Inspect an operation's result and, on an internal failure, delete the
    /// persisted entry before handing the error back.
    ///
    /// A failed deletion replaces the original error, since it means the
    /// unreadable entry is still there. The deletion is not raced against the
    /// caller's token.
    async fn heal_on_internal<T>(
        &self,
        key: &OutboxKey,
        result: OutboxResult<T>,
    ) -> OutboxResult<T> {
        let err = match result {
            Err(err) if err.is_internal() => err,
            other => return other,
        };

        warn!(
            label = %self.label,
            key = %key,
            error = %err,
            "internal outbox failure, removing persisted entry"
        );
        self.cache.invalidate(key);
        if let Err(nuke_err) = self.disk.delete(key).await {
            warn!(
                label = %self.label,
                key = %key,
                error = %nuke_err,
                "failed to remove outbox entry"
            );
            return Err(nuke_err.into_storage_error(
                ErrorCode::OutboxClearFailed,
                &format!("error removing unreadable outbox {}", key),
            ));
        }
        Err(err)
    }
}

/// Run `fut` unless `cancel` fires first.
async fn with_cancel<T, F>(cancel: &CancellationToken, fut: F) -> OutboxResult<T>
where
    F: Future<Output = OutboxResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(OutboxError::Cancelled),
        result = fut => result,
    }
}

#[async_trait]
impl OutboxStore for OutboxStorage {
    async fn read(
        &self,
        cancel: &CancellationToken,
        user: &UserId,
    ) -> OutboxResult<OutboxContainer> {
        OutboxStorage::read(self, cancel, user).await
    }

    async fn write(
        &self,
        cancel: &CancellationToken,
        user: &UserId,
        container: &OutboxContainer,
    ) -> OutboxResult<()> {
        OutboxStorage::write(self, cancel, user, container).await
    }

    async fn clear(&self, cancel: &CancellationToken, user: &UserId) -> OutboxResult<()> {
        OutboxStorage::clear(self, cancel, user).await
    }

    fn name(&self) -> &'static str {
        OutboxStorage::name(self)
    }
}
