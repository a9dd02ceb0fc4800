//! The versioned per-user outbox container.

use serde::{Deserialize, Serialize};

use super::OutboxRecord;

/// Schema version of persisted containers. Anything else on disk is discarded.
pub const OUTBOX_VERSION: u32 = 4;

/// All pending records for one user, tagged with the schema version they were
/// written under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxContainer {
    /// Schema tag.
    pub version: u32,
    /// Pending records. Semantically a set; stored order is not meaningful.
    #[serde(default)]
    pub records: Vec<OutboxRecord>,
}

impl Default for OutboxContainer {
    fn default() -> Self {
        Self::empty()
    }
}

impl OutboxContainer {
    /// An empty container at the current schema version.
    pub fn empty() -> Self {
        Self {
            version: OUTBOX_VERSION,
            records: Vec::new(),
        }
    }

    /// A container at the current schema version holding `records`.
    pub fn with_records(records: Vec<OutboxRecord>) -> Self {
        Self {
            version: OUTBOX_VERSION,
            records,
        }
    }

    /// Whether this container was written under the current schema.
    pub fn is_current_version(&self) -> bool {
        self.version == OUTBOX_VERSION
    }

    /// Sort records ascending by creation time. Stable, so equal timestamps
    /// keep their stored order.
    pub fn sort_by_creation_time(&mut self) {
        self.records.sort_by_key(|r| r.creation_time);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
