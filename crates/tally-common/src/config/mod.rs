//! Configuration

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AwardConfig, ConfigError, DatabaseConfig, Environment, ServerConfig,
    SlackConfig,
};
