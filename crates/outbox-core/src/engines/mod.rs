//! Reference [`KvEngine`](crate::traits::KvEngine) implementations.

mod gated;
mod memory;
mod sqlite;

pub use gated::GatedEngine;
pub use memory::MemoryEngine;
pub use sqlite::SqliteEngine;
