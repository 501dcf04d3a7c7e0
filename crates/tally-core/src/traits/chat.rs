//! Chat-platform port - history, permalinks, and posting

use async_trait::async_trait;

use crate::entities::ChannelMessage;
use crate::error::DomainResult;
use crate::value_objects::MessageId;

/// One page of channel history.
///
/// Messages are ordered newest-first, as delivered by the platform. When
/// `next_cursor` is present, a further page must be requested with it; the
/// cursor is opaque and only valid for the immediately following request.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub messages: Vec<ChannelMessage>,
    pub next_cursor: Option<String>,
}

impl HistoryPage {
    /// Check whether more pages are available
    #[inline]
    pub fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

/// Outbound chat-platform operations used by the engine.
///
/// Implementations must map any upstream `ok: false` response to
/// [`crate::DomainError::ApiError`] carrying the upstream reason.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Fetch one page of channel history, oldest bound by `oldest`
    /// (inclusive when `inclusive` is set), optionally continuing from a
    /// previous page's cursor.
    async fn fetch_history(
        &self,
        channel: &str,
        oldest: &MessageId,
        inclusive: bool,
        cursor: Option<&str>,
    ) -> DomainResult<HistoryPage>;

    /// Resolve the permalink for a message.
    async fn get_permalink(&self, channel: &str, message_id: &MessageId) -> DomainResult<String>;

    /// Post a message to a channel and return the id the platform assigned.
    async fn post_message(&self, channel: &str, text: &str) -> DomainResult<MessageId>;
}
