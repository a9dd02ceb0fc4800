//! Storage contract consumed by the outbox business logic.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::OutboxResult;
use crate::types::{OutboxContainer, UserId};

/// Per-user outbox storage backend.
#[async_trait]
pub trait OutboxStore: Send + Sync {
    /// Read the user's container with records sorted by creation time.
    ///
    /// Returns [`OutboxError::NotFound`](crate::error::OutboxError::NotFound)
    /// when nothing was ever written (or it was cleared).
    async fn read(&self, cancel: &CancellationToken, user: &UserId)
        -> OutboxResult<OutboxContainer>;

    /// Replace the user's container.
    async fn write(
        &self,
        cancel: &CancellationToken,
        user: &UserId,
        container: &OutboxContainer,
    ) -> OutboxResult<()>;

    /// Remove the user's container.
    async fn clear(&self, cancel: &CancellationToken, user: &UserId) -> OutboxResult<()>;

    /// Backend name for logs.
    fn name(&self) -> &'static str;
}
