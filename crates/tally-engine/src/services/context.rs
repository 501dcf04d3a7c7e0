//! Service context - dependency container for services
//!
//! Holds the chat-platform client and the stores the services need. Built
//! per slash command, since the chat client is scoped to one team's access
//! token; the stores are long-lived and shared.

use std::sync::Arc;

use tally_core::{AwardStore, ChatClient, TeamStore};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    chat: Arc<dyn ChatClient>,
    team_store: Arc<dyn TeamStore>,
    award_store: Arc<dyn AwardStore>,
}

impl ServiceContext {
    /// Create a new service context
    pub fn new(
        chat: Arc<dyn ChatClient>,
        team_store: Arc<dyn TeamStore>,
        award_store: Arc<dyn AwardStore>,
    ) -> Self {
        Self {
            chat,
            team_store,
            award_store,
        }
    }

    /// Get the chat-platform client
    pub fn chat(&self) -> &dyn ChatClient {
        self.chat.as_ref()
    }

    /// Get the team store
    pub fn team_store(&self) -> &dyn TeamStore {
        self.team_store.as_ref()
    }

    /// Get the award store
    pub fn award_store(&self) -> &dyn AwardStore {
        self.award_store.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext").finish_non_exhaustive()
    }
}
