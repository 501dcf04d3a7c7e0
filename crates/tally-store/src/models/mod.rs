//! Database models

mod award;

pub use award::AwardModel;
