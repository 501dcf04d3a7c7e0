//! Slash-command dispatch
//!
//! Routes verified slash commands into the engine. Every command returns
//! HTTP 200 with a text payload; domain errors become friendly in-channel
//! messages and never crash the process.

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};

use tally_core::DomainResult;
use tally_engine::{
    render, AwardService, DividerService, LeaderboardAggregator, ServiceContext, TallyService,
};

use crate::state::AppState;

/// Form payload of a slash command request
#[derive(Debug, Deserialize)]
pub struct SlashCommandPayload {
    pub command: String,
    #[serde(default)]
    pub text: String,
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
}

/// Response rendered back into the channel
#[derive(Debug, Serialize)]
pub struct CommandResponse {
    pub response_type: &'static str,
    pub text: String,
}

impl CommandResponse {
    fn in_channel(text: String) -> Self {
        Self {
            response_type: "in_channel",
            text,
        }
    }

    fn ephemeral(text: String) -> Self {
        Self {
            response_type: "ephemeral",
            text,
        }
    }
}

/// Handle a verified slash command
///
/// POST /api/commands
#[instrument(skip(state, payload), fields(command = %payload.command, team_id = %payload.team_id))]
pub async fn slash_command(
    State(state): State<AppState>,
    Form(payload): Form<SlashCommandPayload>,
) -> Json<CommandResponse> {
    let response = match run_command(&state, &payload).await {
        Ok(response) => response,
        Err(err) => {
            if !err.is_user_error() {
                error!(error = %err, code = err.code(), "command failed");
            }
            CommandResponse::ephemeral(render::error_message(&err))
        }
    };

    Json(response)
}

async fn run_command(
    state: &AppState,
    payload: &SlashCommandPayload,
) -> DomainResult<CommandResponse> {
    let Some(token) = state.team_store().get_access_token(&payload.team_id).await? else {
        return Ok(CommandResponse::ephemeral(
            "⚠ This workspace has no installation. Visit /install first.".to_string(),
        ));
    };

    let ctx = state.service_context(&token);
    let text = non_empty(&payload.text);

    match payload.command.as_str() {
        "/divide" => divide(&ctx, payload).await,
        "/tally" => tally(&ctx, payload, text).await,
        "/award" => award(state, &ctx, payload, text).await,
        "/leaderboard" => leaderboard(&ctx, payload).await,
        other => Ok(CommandResponse::ephemeral(format!(
            "Unknown command: {other}"
        ))),
    }
}

fn non_empty(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

async fn divide(
    ctx: &ServiceContext,
    payload: &SlashCommandPayload,
) -> DomainResult<CommandResponse> {
    DividerService::new(ctx)
        .divide(&payload.team_id, &payload.channel_id)
        .await?;
    Ok(CommandResponse::ephemeral(render::divider_saved()))
}

async fn tally(
    ctx: &ServiceContext,
    payload: &SlashCommandPayload,
    text: Option<&str>,
) -> DomainResult<CommandResponse> {
    let report = TallyService::new(ctx)
        .tally(&payload.team_id, &payload.channel_id, text)
        .await?;
    Ok(CommandResponse::in_channel(render::tally_report(&report)))
}

async fn award(
    state: &AppState,
    ctx: &ServiceContext,
    payload: &SlashCommandPayload,
    text: Option<&str>,
) -> DomainResult<CommandResponse> {
    let places = AwardService::new(ctx, &state.config().awards)
        .award(&payload.team_id, &payload.channel_id, &payload.user_id, text)
        .await?;
    Ok(CommandResponse::in_channel(render::award_announcement(
        &places,
    )))
}

async fn leaderboard(
    ctx: &ServiceContext,
    payload: &SlashCommandPayload,
) -> DomainResult<CommandResponse> {
    let entries = LeaderboardAggregator::new(ctx)
        .aggregate(&payload.team_id)
        .await?;
    Ok(CommandResponse::in_channel(render::leaderboard(&entries)))
}
