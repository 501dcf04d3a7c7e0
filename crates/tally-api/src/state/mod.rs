//! Application state
//!
//! Holds the shared state for the Axum application: the stores, the shared
//! outbound HTTP pool, and configuration. The engine's service context is
//! built per command because the chat client is scoped to one team's token.

use std::sync::Arc;

use tally_common::AppConfig;
use tally_core::{AwardStore, TeamStore};
use tally_engine::ServiceContext;
use tally_slack::SlackClient;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    team_store: Arc<dyn TeamStore>,
    award_store: Arc<dyn AwardStore>,
    http: reqwest::Client,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        team_store: Arc<dyn TeamStore>,
        award_store: Arc<dyn AwardStore>,
        http: reqwest::Client,
        config: AppConfig,
    ) -> Self {
        Self {
            team_store,
            award_store,
            http,
            config: Arc::new(config),
        }
    }

    /// Get the team store
    pub fn team_store(&self) -> &dyn TeamStore {
        self.team_store.as_ref()
    }

    /// Get the shared outbound HTTP client
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build an engine service context scoped to one team's access token
    pub fn service_context(&self, access_token: &str) -> ServiceContext {
        let chat = Arc::new(SlackClient::with_http(self.http.clone(), access_token));
        ServiceContext::new(chat, self.team_store.clone(), self.award_store.clone())
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}
