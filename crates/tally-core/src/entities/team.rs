//! Team installation entity

use crate::{ChannelId, TeamId, UserId};

/// Per-team data captured when the bot is installed into a workspace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamInstallation {
    pub team_id: TeamId,
    pub team_name: String,
    /// The channel name, e.g. `#random`
    pub channel: String,
    pub channel_id: ChannelId,
    pub access_token: String,
    pub bot_user_id: UserId,
}
