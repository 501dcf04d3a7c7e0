//! Tally bot server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p tally-api
//! ```
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honored in development).

use tally_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Load configuration first; a malformed award restriction fails here,
    // before any command can silently run unrestricted
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let tracing_config = if config.app.env.is_production() {
        TracingConfig::production()
    } else {
        TracingConfig::development()
    };
    if let Err(e) = try_init_tracing_with_config(tracing_config) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        port = config.server.port,
        "Starting tally bot server"
    );

    if let Err(e) = tally_api::run(config).await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}
