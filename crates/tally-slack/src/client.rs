//! Slack Web API client
//!
//! Thin `reqwest` wrapper implementing the `ChatClient` port. One client is
//! built per team, carrying that team's access token; the underlying HTTP
//! connection pool can be shared across teams.

use async_trait::async_trait;
use tracing::{debug, instrument};

use tally_core::{ChatClient, DomainError, DomainResult, HistoryPage, MessageId};

use crate::types::{
    HistoryResponse, OAuthAccess, OAuthAccessResponse, PermalinkResponse, PostMessageResponse,
};

const DEFAULT_BASE_URL: &str = "https://slack.com/api";

/// History page size requested per call. The platform caps this server-side;
/// pagination handles the rest.
const HISTORY_PAGE_LIMIT: u32 = 200;

/// Slack Web API client scoped to one team's access token
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl SlackClient {
    /// Create a new client with its own HTTP connection pool
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_http(reqwest::Client::new(), token)
    }

    /// Create a new client reusing an existing HTTP connection pool
    pub fn with_http(http: reqwest::Client, token: impl Into<String>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            token: token.into(),
        }
    }

    /// Override the API base URL (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    /// Exchange an OAuth `code` for an installation's credentials.
    ///
    /// This is the one call made without a team token.
    #[instrument(skip(http, client_secret, code))]
    pub async fn oauth_access(
        http: &reqwest::Client,
        client_id: &str,
        client_secret: &str,
        code: &str,
        redirect_uri: &str,
    ) -> DomainResult<OAuthAccess> {
        let response: OAuthAccessResponse = http
            .post(format!("{DEFAULT_BASE_URL}/oauth.v2.access"))
            .form(&[
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)?;

        if !response.ok {
            return Err(api_error(response.error));
        }

        let team = response
            .team
            .ok_or_else(|| DomainError::ApiError("oauth response missing team".into()))?;
        let webhook = response.incoming_webhook.unwrap_or_else(|| {
            crate::types::OAuthIncomingWebhook {
                channel: String::new(),
                channel_id: String::new(),
            }
        });

        Ok(OAuthAccess {
            access_token: response
                .access_token
                .ok_or_else(|| DomainError::ApiError("oauth response missing token".into()))?,
            bot_user_id: response
                .bot_user_id
                .ok_or_else(|| DomainError::ApiError("oauth response missing bot user".into()))?,
            team_id: team.id,
            team_name: team.name,
            channel: webhook.channel,
            channel_id: webhook.channel_id,
        })
    }
}

fn request_error(e: reqwest::Error) -> DomainError {
    DomainError::ApiError(e.to_string())
}

fn api_error(reason: Option<String>) -> DomainError {
    DomainError::ApiError(reason.unwrap_or_else(|| "unknown_error".to_string()))
}

#[async_trait]
impl ChatClient for SlackClient {
    #[instrument(skip(self))]
    async fn fetch_history(
        &self,
        channel: &str,
        oldest: &MessageId,
        inclusive: bool,
        cursor: Option<&str>,
    ) -> DomainResult<HistoryPage> {
        let mut query: Vec<(&str, String)> = vec![
            ("channel", channel.to_string()),
            ("oldest", oldest.as_str().to_string()),
            ("inclusive", inclusive.to_string()),
            ("limit", HISTORY_PAGE_LIMIT.to_string()),
        ];
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let response: HistoryResponse = self
            .http
            .get(self.url("conversations.history"))
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)?;

        if !response.ok {
            return Err(api_error(response.error));
        }

        let next_cursor = response.next_cursor();
        let messages = response
            .messages
            .into_iter()
            .map(crate::types::MessageItem::into_message)
            .collect::<DomainResult<Vec<_>>>()?;

        debug!(
            count = messages.len(),
            has_more = next_cursor.is_some(),
            "history page fetched"
        );

        Ok(HistoryPage {
            messages,
            next_cursor,
        })
    }

    #[instrument(skip(self))]
    async fn get_permalink(&self, channel: &str, message_id: &MessageId) -> DomainResult<String> {
        let response: PermalinkResponse = self
            .http
            .get(self.url("chat.getPermalink"))
            .bearer_auth(&self.token)
            .query(&[
                ("channel", channel),
                ("message_ts", message_id.as_str()),
            ])
            .send()
            .await
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)?;

        if !response.ok {
            return Err(api_error(response.error));
        }

        response
            .permalink
            .ok_or_else(|| DomainError::ApiError("permalink response missing link".into()))
    }

    #[instrument(skip(self, text))]
    async fn post_message(&self, channel: &str, text: &str) -> DomainResult<MessageId> {
        let response: PostMessageResponse = self
            .http
            .post(self.url("chat.postMessage"))
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "channel": channel, "text": text }))
            .send()
            .await
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)?;

        if !response.ok {
            return Err(api_error(response.error));
        }

        let ts = response
            .ts
            .ok_or_else(|| DomainError::ApiError("post response missing ts".into()))?;

        MessageId::parse(&ts)
            .map_err(|e| DomainError::ApiError(format!("unparseable posted ts: {e}")))
    }
}
