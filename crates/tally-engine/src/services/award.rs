//! Award extraction and the award use case
//!
//! Awards come in two mutually exclusive modes: explicit user mentions in
//! the command text, or groups derived from the current engagement ranking
//! when no text is given.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, instrument};

use tally_common::AwardConfig;
use tally_core::{AwardRecord, DomainError, DomainResult, TallyCandidate, UserId};

use super::context::ServiceContext;
use super::tally::TallyService;

/// Maximum number of award places (first, second, third)
const MAX_PLACES: usize = 3;

/// Maximum recipients per place in explicit-text mode
const MAX_PER_PLACE: usize = 3;

// A user mention as it appears in command text: a bracketed reference
// carrying the user id and a display name, e.g. `<@U123|j.paye96>`.
static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@(\w+)\|[\w.]+>").expect("mention pattern is valid"));

/// Extract 1-3 ranked recipient groups from explicit command text.
///
/// The text splits on whitespace into place tokens. Every mention embedded
/// in a token joins that place's group, deduplicated within the token in
/// first-seen order and capped at three. Tokens without mentions are
/// dropped; at most the first three non-empty groups are kept.
pub fn extract_from_text(text: &str) -> DomainResult<Vec<Vec<UserId>>> {
    let places: Vec<Vec<UserId>> = text
        .split_whitespace()
        .map(|token| {
            let mut group: Vec<UserId> = Vec::new();
            for captures in MENTION_RE.captures_iter(token) {
                let user_id = &captures[1];
                if !group.iter().any(|u| u == user_id) {
                    group.push(user_id.to_string());
                }
                if group.len() == MAX_PER_PLACE {
                    break;
                }
            }
            group
        })
        .filter(|group| !group.is_empty())
        .take(MAX_PLACES)
        .collect();

    if places.is_empty() {
        return Err(DomainError::NoAwardee);
    }

    Ok(places)
}

/// Derive 1-3 recipient groups from a ranking.
///
/// Candidates must already be ordered descending by engagement. Candidates
/// with equal counts form one co-equal group; scanning groups from highest
/// to lowest, each user is kept only at their first occurrence, so nobody
/// is awarded twice even if several of their posts ranked.
pub fn derive_from_tally(candidates: &[TallyCandidate]) -> DomainResult<Vec<Vec<UserId>>> {
    let mut groups: Vec<Vec<&UserId>> = Vec::new();
    let mut current_count: Option<usize> = None;

    for candidate in candidates {
        if current_count != Some(candidate.engagement_count) {
            groups.push(Vec::new());
            current_count = Some(candidate.engagement_count);
        }
        if let Some(group) = groups.last_mut() {
            group.push(&candidate.author_id);
        }
    }

    let mut claimed: HashSet<&str> = HashSet::new();
    let mut places: Vec<Vec<UserId>> = Vec::new();

    for group in groups {
        let kept: Vec<UserId> = group
            .into_iter()
            .filter(|user| claimed.insert(user.as_str()))
            .cloned()
            .collect();

        if !kept.is_empty() {
            places.push(kept);
        }
        if places.len() == MAX_PLACES {
            break;
        }
    }

    if places.is_empty() {
        return Err(DomainError::NoAwardee);
    }

    Ok(places)
}

/// Award use case
pub struct AwardService<'a> {
    ctx: &'a ServiceContext,
    config: &'a AwardConfig,
}

impl<'a> AwardService<'a> {
    /// Create a new AwardService.
    ///
    /// The restriction configuration is passed in explicitly rather than
    /// read from ambient state; a misconfigured restriction fails at
    /// startup, not here.
    pub fn new(ctx: &'a ServiceContext, config: &'a AwardConfig) -> Self {
        Self { ctx, config }
    }

    /// Hand out an award and persist the record.
    ///
    /// With command text, recipients come from the explicit mentions;
    /// without it, they are derived from the current tally against the
    /// saved divider.
    #[instrument(skip(self, raw_text))]
    pub async fn award(
        &self,
        team_id: &str,
        channel: &str,
        awarder_id: &str,
        raw_text: Option<&str>,
    ) -> DomainResult<Vec<Vec<UserId>>> {
        if !self.config.is_awarder_allowed(team_id, awarder_id) {
            return Err(DomainError::AwarderRestricted(awarder_id.to_string()));
        }

        let text = raw_text.unwrap_or("").trim();
        let places = if text.is_empty() {
            let candidates = TallyService::new(self.ctx)
                .ranked_candidates(team_id, channel, None)
                .await?;
            derive_from_tally(&candidates)?
        } else {
            extract_from_text(text)?
        };

        let record = AwardRecord::new(team_id, awarder_id, places.clone());
        self.ctx.award_store().save_award_record(&record).await?;

        info!(team_id, awarder_id, places = places.len(), "award saved");
        Ok(places)
    }
}
