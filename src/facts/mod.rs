//! Facts module — review workflow for assistant-proposed facts
//!
//! The assistant proposes facts while chatting; a caller later saves or
//! discards each one over REST. State is kept in memory only.

pub mod handler;
pub mod store;
pub mod types;

pub use handler::{facts_router, FactsState};
pub use store::FactStore;
pub use types::{Fact, FactStatus};
