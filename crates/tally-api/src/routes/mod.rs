//! Route definitions

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handlers::{commands, install};
use crate::state::AppState;

/// Install and liveness routes
pub fn install_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(install::home))
        .route("/install", get(install::install_redirect))
        .route("/install/auth", get(install::install_callback))
}

/// Slash-command webhook routes, gated behind signature verification
pub fn command_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/api/commands", post(commands::slash_command))
        .layer(middleware::from_fn_with_state(
            state,
            crate::middleware::verify_slack_signature,
        ))
}
