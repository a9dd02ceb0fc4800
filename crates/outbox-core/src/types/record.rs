//! Outbox record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One pending outgoing item.
///
/// Only `creation_time` carries meaning for the store; it orders records
/// returned by a read. Everything else travels as an opaque unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxRecord {
    /// Identity of the pending item.
    pub outbox_id: Uuid,
    /// Conversation the item is addressed to.
    pub conversation_id: String,
    /// When the item entered the outbox.
    pub creation_time: DateTime<Utc>,
    /// Opaque item body.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl OutboxRecord {
    /// Create a record stamped with the current time.
    pub fn new(conversation_id: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            outbox_id: Uuid::new_v4(),
            conversation_id: conversation_id.into(),
            creation_time: Utc::now(),
            payload,
        }
    }

    /// Override the creation time.
    pub fn with_creation_time(mut self, creation_time: DateTime<Utc>) -> Self {
        self.creation_time = creation_time;
        self
    }

    /// Override the outbox id.
    pub fn with_outbox_id(mut self, outbox_id: Uuid) -> Self {
        self.outbox_id = outbox_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_record_builder() {
        let id = Uuid::new_v4();
        let at = Utc::now() - Duration::minutes(5);
        let record = OutboxRecord::new("conv-1", serde_json::json!({"body": "hi"}))
            .with_outbox_id(id)
            .with_creation_time(at);

        assert_eq!(record.outbox_id, id);
        assert_eq!(record.creation_time, at);
        assert_eq!(record.conversation_id, "conv-1");
        assert_eq!(record.payload["body"], "hi");
    }

    #[test]
    fn test_missing_payload_defaults_to_null() {
        let json = serde_json::json!({
            "outbox_id": Uuid::nil(),
            "conversation_id": "conv-1",
            "creation_time": "2024-01-01T00:00:00Z",
        });
        let record: OutboxRecord = serde_json::from_value(json).unwrap();
        assert!(record.payload.is_null());
    }
}
