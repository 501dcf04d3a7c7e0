//! Installation handlers
//!
//! OAuth install flow: `/install` redirects to the platform's authorize
//! page, `/install/auth` exchanges the returned code and stores the team's
//! credentials.

use axum::{
    extract::{Query, State},
    response::Redirect,
};
use serde::Deserialize;
use tracing::{error, info};

use tally_core::TeamInstallation;
use tally_slack::SlackClient;

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Liveness page
///
/// GET /
pub async fn home(State(state): State<AppState>) -> String {
    format!("🤖 {} is up and running", state.config().app.name)
}

/// Redirect to the platform's OAuth authorize page
///
/// GET /install
pub async fn install_redirect(State(state): State<AppState>) -> Redirect {
    let slack = &state.config().slack;
    let url = format!(
        "https://slack.com/oauth/v2/authorize?client_id={}&scope={}&redirect_uri={}",
        slack.client_id,
        tally_common::SlackConfig::SCOPES.join(","),
        slack.redirect_uri,
    );
    Redirect::temporary(&url)
}

/// Query parameters delivered to the OAuth callback
#[derive(Debug, Deserialize)]
pub struct InstallCallbackQuery {
    pub code: String,
}

/// OAuth callback: exchange the code and persist the installation
///
/// GET /install/auth
pub async fn install_callback(
    State(state): State<AppState>,
    Query(query): Query<InstallCallbackQuery>,
) -> ApiResult<String> {
    let slack = &state.config().slack;

    let access = SlackClient::oauth_access(
        state.http(),
        &slack.client_id,
        &slack.client_secret,
        &query.code,
        &slack.redirect_uri,
    )
    .await
    .map_err(|e| {
        error!(error = %e, "oauth code exchange failed");
        ApiError::App(e.into())
    })?;

    let installation = TeamInstallation {
        team_id: access.team_id.clone(),
        team_name: access.team_name.clone(),
        channel: access.channel.clone(),
        channel_id: access.channel_id,
        access_token: access.access_token,
        bot_user_id: access.bot_user_id,
    };

    state
        .team_store()
        .save_installation(&installation)
        .await
        .map_err(|e| ApiError::App(e.into()))?;

    info!(team_id = %installation.team_id, "bot installed");

    Ok(format!(
        "Success! {} installed into {} {}",
        state.config().app.name,
        access.team_name,
        access.channel,
    ))
}
