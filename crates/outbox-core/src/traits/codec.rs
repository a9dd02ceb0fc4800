//! Container codec trait and the default JSON codec.

use crate::error::OutboxResult;
use crate::types::OutboxContainer;

/// Turns containers into engine bytes and back.
pub trait ContainerCodec: Send + Sync {
    fn encode(&self, container: &OutboxContainer) -> OutboxResult<Vec<u8>>;

    /// Decode stored bytes. Undecodable input is an error, never a partial
    /// container.
    fn decode(&self, bytes: &[u8]) -> OutboxResult<OutboxContainer>;
}

/// `serde_json` codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl ContainerCodec for JsonCodec {
    fn encode(&self, container: &OutboxContainer) -> OutboxResult<Vec<u8>> {
        Ok(serde_json::to_vec(container)?)
    }

    fn decode(&self, bytes: &[u8]) -> OutboxResult<OutboxContainer> {
        Ok(serde_json::from_slice(bytes)?)
    }
}
