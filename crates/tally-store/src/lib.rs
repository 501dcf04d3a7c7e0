//! # tally-store
//!
//! Persistence layer implementing the storage ports from `tally-core` with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ model mappers, including normalization of historical award
//!   `places` payloads (a place may have been stored as a single user or a
//!   list; both map to a uniform group per place)
//! - Repository implementations, including the forward-only award cursor

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{PgAwardCursor, PgAwardStore, PgTeamStore};
