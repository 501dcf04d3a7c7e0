//! # tally-api
//!
//! Webhook and install server built with Axum. Receives slash commands,
//! verifies their signatures, and dispatches them into `tally-engine`.

pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, run, run_server};
pub use state::AppState;
