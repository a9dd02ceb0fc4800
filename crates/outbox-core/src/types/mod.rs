//! Core types for the outbox store.

mod container;
mod key;
mod record;

pub use container::{OutboxContainer, OUTBOX_VERSION};
pub use key::{OutboxKey, UserId, DEFAULT_KEY_NAMESPACE};
pub use record::OutboxRecord;
