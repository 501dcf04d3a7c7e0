//! # tally-common
//!
//! Shared utilities: configuration loading, the application error type, and
//! telemetry setup.

pub mod config;
pub mod error;
pub mod telemetry;

pub use config::{
    AppConfig, AppSettings, AwardConfig, ConfigError, DatabaseConfig, Environment, ServerConfig,
    SlackConfig,
};
pub use error::{AppError, AppResult};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
