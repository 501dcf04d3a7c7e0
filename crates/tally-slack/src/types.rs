//! Wire types for the Slack Web API
//!
//! Response shapes for the endpoints the bot consumes. Every response
//! carries an `ok` flag; when it is false, `error` holds the upstream
//! reason and the whole operation is aborted.

use serde::Deserialize;

use tally_core::{ChannelMessage, DomainError, DomainResult, MessageId, Reaction};

/// One reaction block on a history message
#[derive(Debug, Clone, Deserialize)]
pub struct ReactionItem {
    pub name: String,
    #[serde(default)]
    pub users: Vec<String>,
    #[serde(default)]
    pub count: u32,
}

/// One message in a `conversations.history` page
#[derive(Debug, Clone, Deserialize)]
pub struct MessageItem {
    pub ts: String,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub bot_id: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub reactions: Vec<ReactionItem>,
}

impl MessageItem {
    /// Convert into the domain message snapshot
    pub fn into_message(self) -> DomainResult<ChannelMessage> {
        let id = MessageId::parse(&self.ts)
            .map_err(|e| DomainError::ApiError(format!("unparseable message ts: {e}")))?;

        let reactions = self
            .reactions
            .into_iter()
            .map(|r| Reaction::new(r.name, r.users))
            .collect();

        Ok(ChannelMessage::new(
            id,
            self.user.unwrap_or_default(),
            reactions,
        ))
    }
}

/// Pagination metadata attached to paged responses
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// `conversations.history` response
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryResponse {
    pub ok: bool,
    #[serde(default)]
    pub messages: Vec<MessageItem>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub response_metadata: Option<ResponseMetadata>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HistoryResponse {
    /// The continuation cursor, if the platform reported more pages.
    ///
    /// Slack sometimes sends an empty-string cursor; that counts as "no
    /// more pages".
    pub fn next_cursor(&self) -> Option<String> {
        if !self.has_more {
            return None;
        }
        self.response_metadata
            .as_ref()
            .and_then(|m| m.next_cursor.clone())
            .filter(|c| !c.is_empty())
    }
}

/// `chat.getPermalink` response
#[derive(Debug, Clone, Deserialize)]
pub struct PermalinkResponse {
    pub ok: bool,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// `chat.postMessage` response
#[derive(Debug, Clone, Deserialize)]
pub struct PostMessageResponse {
    pub ok: bool,
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Team block in an `oauth.v2.access` response
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthTeam {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Incoming-webhook block in an `oauth.v2.access` response
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthIncomingWebhook {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub channel_id: String,
}

/// `oauth.v2.access` response
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthAccessResponse {
    pub ok: bool,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub bot_user_id: Option<String>,
    #[serde(default)]
    pub team: Option<OAuthTeam>,
    #[serde(default)]
    pub incoming_webhook: Option<OAuthIncomingWebhook>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Validated result of an OAuth code exchange
#[derive(Debug, Clone)]
pub struct OAuthAccess {
    pub access_token: String,
    pub bot_user_id: String,
    pub team_id: String,
    pub team_name: String,
    pub channel: String,
    pub channel_id: String,
}
