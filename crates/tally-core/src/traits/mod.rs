//! Port traits - storage and chat-platform interfaces
//!
//! The domain layer defines what it needs; the infrastructure layers
//! (`tally-store`, `tally-slack`) provide the implementations.

mod chat;
mod stores;

pub use chat::{ChatClient, HistoryPage};
pub use stores::{AwardCursor, AwardStore, TeamStore};
