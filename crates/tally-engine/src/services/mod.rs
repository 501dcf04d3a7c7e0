//! Engine services
//!
//! Data flows strictly downward: boundary resolution, range fetch,
//! engagement ranking, award extraction. The leaderboard aggregator is
//! independent and consumes only persisted award records.

mod award;
mod boundary;
mod context;
mod divider;
mod fetch;
mod leaderboard;
mod rank;
mod tally;

pub use award::AwardService;
pub use boundary::BoundaryResolver;
pub use context::ServiceContext;
pub use divider::DividerService;
pub use fetch::RangeFetcher;
pub use leaderboard::LeaderboardAggregator;
pub use rank::{EngagementRanker, TOP_REPORT_LIMIT};
pub use tally::{TallyReport, TallyService};
