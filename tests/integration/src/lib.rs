//! Test support for the engine integration tests
//!
//! Provides in-memory fakes for the storage and chat-platform ports so the
//! engine can be driven end-to-end without a database or network.

pub mod fakes;

pub use fakes::{page, InMemoryAwardStore, InMemoryTeamStore, ScriptedChatClient};

use std::sync::Arc;

use tally_engine::ServiceContext;

/// Build a service context over the given fakes
pub fn context(
    chat: Arc<ScriptedChatClient>,
    team_store: Arc<InMemoryTeamStore>,
    award_store: Arc<InMemoryAwardStore>,
) -> ServiceContext {
    ServiceContext::new(chat, team_store, award_store)
}
