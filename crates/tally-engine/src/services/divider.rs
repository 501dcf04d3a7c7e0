//! Divider use case
//!
//! Posts a fresh divider message to the channel and persists its id as the
//! team's saved boundary.

use tracing::{info, instrument};

use tally_core::{DomainResult, MessageId};

use crate::render;

use super::context::ServiceContext;

/// Divider use case
pub struct DividerService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DividerService<'a> {
    /// Create a new DividerService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Post a divider and save its id as the team's boundary
    #[instrument(skip(self))]
    pub async fn divide(&self, team_id: &str, channel: &str) -> DomainResult<MessageId> {
        let id = self
            .ctx
            .chat()
            .post_message(channel, render::DIVIDER_MESSAGE)
            .await?;

        self.ctx.team_store().save_boundary(team_id, &id).await?;

        info!(team_id, divider = %id, "divider saved");
        Ok(id)
    }
}
