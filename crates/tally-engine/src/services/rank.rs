//! Engagement ranking
//!
//! Converts raw messages into tally candidates ranked by distinct-reactor
//! engagement, and enriches the top slice with permalinks.

use futures::future;
use tracing::instrument;

use tally_core::{ChannelMessage, DomainResult, TallyCandidate};

use super::context::ServiceContext;

/// Size of the top slice that gets permalinks in a tally report
pub const TOP_REPORT_LIMIT: usize = 10;

/// Permalink requests issued concurrently per batch. Batches run strictly
/// in sequence relative to each other to bound outstanding request
/// concurrency.
const PERMALINK_BATCH_SIZE: usize = 4;

/// Ranks messages by distinct-reactor engagement
pub struct EngagementRanker<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EngagementRanker<'a> {
    /// Create a new EngagementRanker
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Rank messages descending by engagement count.
    ///
    /// Messages nobody reacted to are dropped. The sort is stable with no
    /// secondary key: equally-reacted posts keep the relative order the
    /// fetch produced.
    pub fn rank(messages: Vec<ChannelMessage>) -> Vec<TallyCandidate> {
        let mut candidates: Vec<TallyCandidate> = messages
            .into_iter()
            .filter_map(|message| {
                let engagement_count = message.engagement_count();
                if engagement_count == 0 {
                    return None;
                }
                Some(TallyCandidate::new(
                    message.id,
                    message.author_id,
                    engagement_count,
                ))
            })
            .collect();

        candidates.sort_by(|a, b| b.engagement_count.cmp(&a.engagement_count));
        candidates
    }

    /// Attach permalinks to the given candidates, four at a time.
    ///
    /// Requests within one batch run concurrently into independent result
    /// slots; a single failure aborts the whole enrichment. Permalinks
    /// already resolved by earlier batches are left in place, but the
    /// caller must not emit a report after a failure.
    #[instrument(skip(self, candidates), fields(count = candidates.len()))]
    pub async fn attach_permalinks(
        &self,
        channel: &str,
        candidates: &mut [TallyCandidate],
    ) -> DomainResult<()> {
        for batch in candidates.chunks_mut(PERMALINK_BATCH_SIZE) {
            let fetches = batch
                .iter()
                .map(|candidate| self.ctx.chat().get_permalink(channel, &candidate.message_id));

            let permalinks = future::try_join_all(fetches).await?;

            for (candidate, permalink) in batch.iter_mut().zip(permalinks) {
                candidate.permalink = Some(permalink);
            }
        }

        Ok(())
    }
}
