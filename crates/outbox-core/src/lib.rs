//! outbox-core - durable per-user outbox storage.
//!
//! Pending outgoing items are kept per user in a versioned container,
//! persisted through a key-value engine and fronted by a process-wide memory
//! cache. Reads always return records ordered by creation time; containers
//! from another schema version are reset, and unreadable entries are removed
//! so the next access starts clean.
//!
//! # Example
//!
//! ```ignore
//! use outbox_core::{OutboxConfig, OutboxContainer, OutboxRecord, OutboxStorage, UserId};
//! use tokio_util::sync::CancellationToken;
//!
//! let storage = OutboxStorage::open(&OutboxConfig::from_env())?;
//! let user = UserId::new("9f86d081884c7d65")?;
//! let cancel = CancellationToken::new();
//!
//! let record = OutboxRecord::new("conv-1", serde_json::json!({"body": "hello"}));
//! storage.write(&cancel, &user, &OutboxContainer::with_records(vec![record])).await?;
//!
//! let outbox = storage.read(&cancel, &user).await?;
//! ```

pub mod cache;
pub mod config;
pub mod engines;
pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use cache::MemoryCache;
pub use config::{OutboxConfig, OutboxConfigBuilder};
pub use engines::{GatedEngine, MemoryEngine, SqliteEngine};
pub use error::{ErrorCode, OutboxError, OutboxResult};
pub use storage::{DiskStore, OutboxStorage};
pub use traits::{ContainerCodec, JsonCodec, KvEngine, OutboxStore, SessionFlag, SessionGate};
pub use types::{OutboxContainer, OutboxKey, OutboxRecord, UserId, OUTBOX_VERSION};
