//! Two-tier outbox storage: the disk adapter and the orchestrator on top.

mod disk;
mod outbox;

pub use disk::DiskStore;
pub use outbox::OutboxStorage;
