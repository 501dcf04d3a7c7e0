//! Repository implementations

mod award;
mod error;
mod team;

pub use award::{PgAwardCursor, PgAwardStore};
pub use team::PgTeamStore;
