//! # tally-engine
//!
//! Application layer: the engagement-tally and award-extraction engine, plus
//! the command use cases built on it. Everything here works against the port
//! traits from `tally-core`; infrastructure is injected through the
//! [`ServiceContext`].

pub mod render;
pub mod services;

pub use services::{
    AwardService, BoundaryResolver, DividerService, EngagementRanker, LeaderboardAggregator,
    RangeFetcher, ServiceContext, TallyReport, TallyService,
};
