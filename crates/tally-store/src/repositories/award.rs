//! PostgreSQL implementation of AwardStore
//!
//! Award records are append-only. Reads go through a forward-only keyset
//! cursor that pages batches out of the table in insertion order, so a
//! team's full history never has to fit in one result set.

use std::collections::VecDeque;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use tally_core::{AwardCursor, AwardRecord, AwardStore, DomainError, DomainResult};

use crate::mappers::places_to_json;
use crate::models::AwardModel;

use super::error::map_db_error;

/// Rows fetched per cursor batch
const CURSOR_BATCH_SIZE: i64 = 100;

/// PostgreSQL implementation of AwardStore
#[derive(Clone)]
pub struct PgAwardStore {
    pool: PgPool,
}

impl PgAwardStore {
    /// Create a new PgAwardStore
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AwardStore for PgAwardStore {
    #[instrument(skip(self, record), fields(team_id = %record.team_id))]
    async fn save_award_record(&self, record: &AwardRecord) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO awards (id, team_id, awarder_id, awarded_at, places)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&record.team_id)
        .bind(&record.awarder_id)
        .bind(record.awarded_at)
        .bind(places_to_json(&record.places))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn stream_award_records(&self, team_id: &str) -> DomainResult<Box<dyn AwardCursor>> {
        Ok(Box::new(PgAwardCursor::new(self.pool.clone(), team_id)))
    }
}

/// Forward-only keyset cursor over a team's award records
pub struct PgAwardCursor {
    pool: PgPool,
    team_id: String,
    last_seen: Option<(DateTime<Utc>, Uuid)>,
    buffer: VecDeque<AwardRecord>,
    exhausted: bool,
    closed: bool,
}

impl PgAwardCursor {
    fn new(pool: PgPool, team_id: &str) -> Self {
        Self {
            pool,
            team_id: team_id.to_string(),
            last_seen: None,
            buffer: VecDeque::new(),
            exhausted: false,
            closed: false,
        }
    }

    async fn fetch_batch(&mut self) -> DomainResult<()> {
        let models: Vec<AwardModel> = match self.last_seen {
            None => {
                sqlx::query_as::<_, AwardModel>(
                    r#"
                    SELECT id, team_id, awarder_id, awarded_at, places
                    FROM awards
                    WHERE team_id = $1
                    ORDER BY awarded_at, id
                    LIMIT $2
                    "#,
                )
                .bind(&self.team_id)
                .bind(CURSOR_BATCH_SIZE)
                .fetch_all(&self.pool)
                .await
            }
            Some((awarded_at, id)) => {
                sqlx::query_as::<_, AwardModel>(
                    r#"
                    SELECT id, team_id, awarder_id, awarded_at, places
                    FROM awards
                    WHERE team_id = $1 AND (awarded_at, id) > ($2, $3)
                    ORDER BY awarded_at, id
                    LIMIT $4
                    "#,
                )
                .bind(&self.team_id)
                .bind(awarded_at)
                .bind(id)
                .bind(CURSOR_BATCH_SIZE)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(map_db_error)?;

        if (models.len() as i64) < CURSOR_BATCH_SIZE {
            self.exhausted = true;
        }
        if let Some(last) = models.last() {
            self.last_seen = Some((last.awarded_at, last.id));
        }

        for model in models {
            self.buffer.push_back(AwardRecord::try_from(model)?);
        }

        Ok(())
    }
}

#[async_trait]
impl AwardCursor for PgAwardCursor {
    async fn next(&mut self) -> DomainResult<Option<AwardRecord>> {
        if self.closed {
            return Err(DomainError::StorageError(
                "award cursor read after close".to_string(),
            ));
        }

        if self.buffer.is_empty() && !self.exhausted {
            self.fetch_batch().await?;
        }

        Ok(self.buffer.pop_front())
    }

    async fn close(mut self: Box<Self>) -> DomainResult<()> {
        self.closed = true;
        self.buffer.clear();
        Ok(())
    }
}
