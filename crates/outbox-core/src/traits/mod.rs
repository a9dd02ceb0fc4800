//! Collaborator contracts for the outbox store.

mod codec;
mod engine;
mod session;
mod store;

pub use codec::*;
pub use engine::*;
pub use session::*;
pub use store::*;
