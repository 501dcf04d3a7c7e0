//! Leaderboard aggregation
//!
//! Streams a team's historical award records and folds them into a stable
//! per-user ranking of first/second/third-place counts.

use std::collections::HashMap;

use tracing::{debug, instrument};

use tally_core::{AwardCounts, AwardCursor, DomainResult, LeaderboardEntry, UserId};

use super::context::ServiceContext;

/// Folds award records into a leaderboard
pub struct LeaderboardAggregator<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardAggregator<'a> {
    /// Create a new LeaderboardAggregator
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Aggregate all of a team's award records into a ranked leaderboard.
    ///
    /// The record cursor is closed on every exit path, including when the
    /// scan itself fails partway through.
    #[instrument(skip(self))]
    pub async fn aggregate(&self, team_id: &str) -> DomainResult<Vec<LeaderboardEntry>> {
        let mut cursor = self
            .ctx
            .award_store()
            .stream_award_records(team_id)
            .await?;

        let folded = Self::fold(cursor.as_mut()).await;
        let close_result = cursor.close().await;

        let mut entries = folded?;
        close_result?;

        // Firsts, then seconds, then thirds; remaining ties keep first-seen
        // order (stable sort over the insertion-ordered fold).
        entries.sort_by(|a, b| {
            (b.counts.firsts, b.counts.seconds, b.counts.thirds).cmp(&(
                a.counts.firsts,
                a.counts.seconds,
                a.counts.thirds,
            ))
        });

        Ok(entries)
    }

    async fn fold(cursor: &mut dyn AwardCursor) -> DomainResult<Vec<LeaderboardEntry>> {
        let mut first_seen: Vec<UserId> = Vec::new();
        let mut tally: HashMap<UserId, AwardCounts> = HashMap::new();

        while let Some(record) = cursor.next().await? {
            if record.places.len() > 3 {
                debug!(
                    team_id = %record.team_id,
                    places = record.places.len(),
                    "places beyond the first three are not included in leaderboards"
                );
            }

            for (place_index, place) in record.places.iter().take(3).enumerate() {
                for user in place {
                    if !tally.contains_key(user) {
                        first_seen.push(user.clone());
                    }
                    tally.entry(user.clone()).or_default().credit(place_index);
                }
            }
        }

        Ok(first_seen
            .into_iter()
            .map(|user_id| {
                let counts = tally.get(&user_id).copied().unwrap_or_default();
                LeaderboardEntry { user_id, counts }
            })
            .collect())
    }
}
