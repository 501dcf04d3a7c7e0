//! Award record and leaderboard entities

use chrono::{DateTime, Utc};

use crate::{TeamId, UserId};

/// Persisted outcome of a ranking round: 1-3 ordered groups of recipients.
///
/// `places[0]` is first place. Each place holds one or more co-equal users,
/// deduplicated and in first-seen order. Records are append-only and never
/// mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardRecord {
    pub team_id: TeamId,
    pub awarded_at: DateTime<Utc>,
    pub awarder_id: UserId,
    pub places: Vec<Vec<UserId>>,
}

impl AwardRecord {
    /// Create a new AwardRecord stamped with the current time
    pub fn new(
        team_id: impl Into<TeamId>,
        awarder_id: impl Into<UserId>,
        places: Vec<Vec<UserId>>,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            awarded_at: Utc::now(),
            awarder_id: awarder_id.into(),
            places,
        }
    }
}

/// Per-user first/second/third-place counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AwardCounts {
    pub firsts: u32,
    pub seconds: u32,
    pub thirds: u32,
}

impl AwardCounts {
    /// Credit one award at the given place index (0 = first). Indices
    /// beyond the third place are ignored.
    pub fn credit(&mut self, place_index: usize) {
        match place_index {
            0 => self.firsts += 1,
            1 => self.seconds += 1,
            2 => self.thirds += 1,
            _ => {}
        }
    }
}

/// One ranked leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub user_id: UserId,
    pub counts: AwardCounts,
}
