//! Boundary resolution
//!
//! Turns free-text command input or the team's persisted divider into the
//! boundary delimiting a tally range.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, instrument};

use tally_core::{Boundary, DomainError, DomainResult, MessageId};

use super::context::ServiceContext;

// Message permalinks are of this form:
// https://example.slack.com/archives/CH2PRFQDU/p1599393257001900
// The digits after `p` in the last segment are the message id with the dot
// removed; MessageId::from_permalink_digits reinserts it.
static PERMALINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https?://[^\s/]*\.slack\.com/archives/[^\s/]+/p(\d+)")
        .expect("permalink pattern is valid")
});

/// Resolves user input into a tally-range boundary
pub struct BoundaryResolver<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BoundaryResolver<'a> {
    /// Create a new BoundaryResolver
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Resolve `raw_text` into a boundary for `team_id`.
    ///
    /// Empty or whitespace-only input falls back to the team's saved
    /// divider. Otherwise the text is scanned for permalink references: the
    /// first becomes the start, an optional second the end (positional
    /// order in the text, not numeric order); any further references are
    /// ignored.
    #[instrument(skip(self, raw_text))]
    pub async fn resolve(&self, raw_text: Option<&str>, team_id: &str) -> DomainResult<Boundary> {
        let text = raw_text.unwrap_or("").trim();

        if text.is_empty() {
            return match self.ctx.team_store().get_saved_boundary(team_id).await? {
                Some(id) => {
                    debug!(divider = %id, "using saved divider");
                    Ok(Boundary::Saved(id))
                }
                None => Err(DomainError::NoSavedBoundary(team_id.to_string())),
            };
        }

        let mut references = parse_references(text).into_iter();
        match (references.next(), references.next()) {
            (Some(start), end) => Ok(Boundary::Explicit { start, end }),
            (None, _) => Err(DomainError::ExplicitBoundaryNotFound),
        }
    }
}

/// Extract every permalink-style message reference from `text`, in
/// positional order. References whose digit run is too short to carry a
/// sub-second component are skipped.
fn parse_references(text: &str) -> Vec<MessageId> {
    PERMALINK_RE
        .captures_iter(text)
        .filter_map(|captures| MessageId::from_permalink_digits(&captures[1]).ok())
        .collect()
}
