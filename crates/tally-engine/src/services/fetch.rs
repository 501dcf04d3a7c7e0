//! Range fetching
//!
//! Walks the paginated history API from the start boundary into one ordered
//! in-memory sequence of raw messages.

use tracing::{debug, instrument};

use tally_core::{Boundary, ChannelMessage, DomainError, DomainResult};

use super::context::ServiceContext;

/// Fetches the message range delimited by a boundary
pub struct RangeFetcher<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RangeFetcher<'a> {
    /// Create a new RangeFetcher
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Fetch every message in the boundary's range, excluding the bot's own
    /// posts.
    ///
    /// The initial page is requested with the start marker inclusive; its
    /// oldest entry must be the marker itself, or the divider has been
    /// deleted (or gone stale) and the fetch fails. Continuation pages are
    /// requested strictly sequentially, each driven by the cursor returned
    /// by the previous page. A failed page discards everything accumulated
    /// so far.
    #[instrument(skip(self, boundary), fields(start = %boundary.start()))]
    pub async fn fetch(
        &self,
        boundary: &Boundary,
        channel: &str,
        bot_user_id: &str,
    ) -> DomainResult<Vec<ChannelMessage>> {
        let start = boundary.start();

        let first = self
            .ctx
            .chat()
            .fetch_history(channel, start, true, None)
            .await?;

        // The oldest message (last in the page) must be the divider itself,
        // otherwise no divider was found.
        let marker_present = first.messages.last().is_some_and(|m| &m.id == start);
        if !marker_present {
            return Err(DomainError::StartBoundaryNotFound(start.clone()));
        }

        let mut messages = first.messages;
        messages.pop(); // strip the confirmed divider marker

        let mut next_cursor = first.next_cursor;
        while let Some(cursor) = next_cursor {
            let page = self
                .ctx
                .chat()
                .fetch_history(channel, start, true, Some(&cursor))
                .await?;
            messages.extend(page.messages);
            next_cursor = page.next_cursor;
        }

        // Two-boundary ranges are enforced post-hoc over the accumulated
        // sequence; the history API has no exact two-sided range filter.
        if let Some(end) = boundary.end() {
            messages.retain(|m| &m.id <= end);
        }

        messages.retain(|m| !m.is_authored_by(bot_user_id));

        debug!(count = messages.len(), "range fetched");
        Ok(messages)
    }
}
