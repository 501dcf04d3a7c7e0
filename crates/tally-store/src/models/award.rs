//! Award record database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the awards table
///
/// `places` is the stored JSON payload. Historically a place was written
/// either as a single user id or as a list of co-equal user ids; the mapper
/// normalizes both forms.
#[derive(Debug, Clone, FromRow)]
pub struct AwardModel {
    pub id: Uuid,
    pub team_id: String,
    pub awarder_id: String,
    pub awarded_at: DateTime<Utc>,
    pub places: serde_json::Value,
}
