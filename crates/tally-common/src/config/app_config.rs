//! Application configuration structs
//!
//! Loads configuration from environment variables.

use std::collections::HashMap;
use std::env;

use serde::Deserialize;

use tally_core::{TeamId, UserId};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub slack: SlackConfig,
    pub awards: AwardConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Slack app credentials
#[derive(Debug, Clone, Deserialize)]
pub struct SlackConfig {
    pub client_id: String,
    pub client_secret: String,
    pub signing_secret: String,
    pub redirect_uri: String,
}

impl SlackConfig {
    /// OAuth scopes requested at installation
    pub const SCOPES: &'static [&'static str] = &[
        "app_mentions:read",
        "channels:history",
        "chat:write",
        "commands",
        "emoji:read",
        "incoming-webhook",
        "reactions:read",
        "reactions:write",
    ];
}

/// Award restriction configuration
///
/// When a team appears in `restrict_award_to`, only the listed users may
/// hand out awards there. Teams that do not appear are unrestricted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AwardConfig {
    #[serde(default)]
    pub restrict_award_to: Option<HashMap<TeamId, Vec<UserId>>>,
}

impl AwardConfig {
    /// Check whether `user_id` may hand out awards in `team_id`
    pub fn is_awarder_allowed(&self, team_id: &str, user_id: &str) -> bool {
        match self
            .restrict_award_to
            .as_ref()
            .and_then(|teams| teams.get(team_id))
        {
            Some(allowed) => allowed.iter().any(|u| u == user_id),
            None => true,
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "tally-bot".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing, or if
    /// `RESTRICT_AWARD_TO` is set but does not parse as a JSON object of
    /// user-id lists. A malformed restriction is a hard startup error rather
    /// than a silent fallback to "unrestricted".
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: env::var("API_PORT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or_else(default_min_connections),
            },
            slack: SlackConfig {
                client_id: env::var("SLACK_CLIENT_ID")
                    .map_err(|_| ConfigError::MissingVar("SLACK_CLIENT_ID"))?,
                client_secret: env::var("SLACK_CLIENT_SECRET")
                    .map_err(|_| ConfigError::MissingVar("SLACK_CLIENT_SECRET"))?,
                signing_secret: env::var("SLACK_SIGNING_SECRET")
                    .map_err(|_| ConfigError::MissingVar("SLACK_SIGNING_SECRET"))?,
                redirect_uri: env::var("SLACK_REDIRECT_URI")
                    .map_err(|_| ConfigError::MissingVar("SLACK_REDIRECT_URI"))?,
            },
            awards: AwardConfig {
                restrict_award_to: parse_restrict_award_to(
                    env::var("RESTRICT_AWARD_TO").ok().as_deref(),
                )?,
            },
        })
    }
}

/// Parse the `RESTRICT_AWARD_TO` value: a JSON object mapping team id to a
/// list of user ids.
fn parse_restrict_award_to(
    raw: Option<&str>,
) -> Result<Option<HashMap<TeamId, Vec<UserId>>>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(None);
    };

    let parsed: HashMap<TeamId, Vec<UserId>> = serde_json::from_str(raw).map_err(|e| {
        ConfigError::InvalidValue("RESTRICT_AWARD_TO", e.to_string())
    })?;

    Ok(Some(parsed))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
