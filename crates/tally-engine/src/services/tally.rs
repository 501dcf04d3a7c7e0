//! Tally use case
//!
//! Resolves the range boundary, fetches the range, ranks it, and enriches
//! the top slice with permalinks for reporting.

use tracing::{info, instrument};

use tally_core::{DomainResult, TallyCandidate};

use super::boundary::BoundaryResolver;
use super::context::ServiceContext;
use super::fetch::RangeFetcher;
use super::rank::{EngagementRanker, TOP_REPORT_LIMIT};

/// Result of a tally run: the top slice with permalinks attached, plus how
/// many candidates had any engagement at all.
#[derive(Debug, Clone)]
pub struct TallyReport {
    pub candidates: Vec<TallyCandidate>,
    pub total_with_engagement: usize,
}

impl TallyReport {
    /// Check whether candidates beyond the reported slice exist
    #[inline]
    pub fn has_surplus(&self) -> bool {
        self.total_with_engagement > self.candidates.len()
    }
}

/// Tally use case
pub struct TallyService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TallyService<'a> {
    /// Create a new TallyService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Produce the full engagement ranking for the range described by
    /// `raw_text` (or the saved divider when empty), without permalinks.
    #[instrument(skip(self, raw_text))]
    pub async fn ranked_candidates(
        &self,
        team_id: &str,
        channel: &str,
        raw_text: Option<&str>,
    ) -> DomainResult<Vec<TallyCandidate>> {
        let boundary = BoundaryResolver::new(self.ctx)
            .resolve(raw_text, team_id)
            .await?;

        let bot_user_id = self
            .ctx
            .team_store()
            .get_bot_user_id(team_id)
            .await?
            .unwrap_or_default();

        let messages = RangeFetcher::new(self.ctx)
            .fetch(&boundary, channel, &bot_user_id)
            .await?;

        Ok(EngagementRanker::rank(messages))
    }

    /// Run a tally and build the report for the top posts.
    #[instrument(skip(self, raw_text))]
    pub async fn tally(
        &self,
        team_id: &str,
        channel: &str,
        raw_text: Option<&str>,
    ) -> DomainResult<TallyReport> {
        let mut candidates = self.ranked_candidates(team_id, channel, raw_text).await?;

        let total_with_engagement = candidates.len();
        candidates.truncate(TOP_REPORT_LIMIT);

        EngagementRanker::new(self.ctx)
            .attach_permalinks(channel, &mut candidates)
            .await?;

        info!(
            team_id,
            reported = candidates.len(),
            total = total_with_engagement,
            "tally complete"
        );

        Ok(TallyReport {
            candidates,
            total_with_engagement,
        })
    }
}
